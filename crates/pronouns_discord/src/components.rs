//! Outgoing responses, messages and message components.

use crate::Emoji;
use serde::{Serialize, Serializer};

/// Interaction callback types the bot answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InteractionResponseType {
    /// Acknowledge a ping.
    Pong = 1,
    /// Respond with a new message.
    ChannelMessageWithSource = 4,
    /// Acknowledge now, deliver the message later via the webhook.
    DeferredChannelMessageWithSource = 5,
    /// Edit the message the component was attached to.
    UpdateMessage = 7,
}

impl Serialize for InteractionResponseType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Message flag bits.
pub struct MessageFlags;

impl MessageFlags {
    /// Only the invoking member can see the message.
    pub const EPHEMERAL: u64 = 1 << 6;
}

/// Button color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonStyle {
    /// Blurple
    Primary = 1,
    /// Grey
    Secondary = 2,
    /// Green
    Success = 3,
    /// Red
    Danger = 4,
}

impl Serialize for ButtonStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Clickable button component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    /// Color
    pub style: ButtonStyle,
    /// Text on the button
    pub label: String,
    /// Identifier sent back when clicked
    pub custom_id: String,
    /// Optional emoji before the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
}

impl Button {
    const COMPONENT_TYPE: u8 = 2;

    /// Button without emoji.
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            kind: Self::COMPONENT_TYPE,
            style,
            label: label.into(),
            custom_id: custom_id.into(),
            emoji: None,
        }
    }

    /// Builder-style emoji assignment.
    pub fn with_emoji(mut self, emoji: Option<Emoji>) -> Self {
        self.emoji = emoji;
        self
    }
}

/// Row of up to five buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    /// Buttons in display order
    pub components: Vec<Button>,
}

impl ActionRow {
    const COMPONENT_TYPE: u8 = 1;

    /// Maximum buttons Discord accepts per row.
    pub const MAX_BUTTONS: usize = 5;

    /// Row holding the given buttons.
    pub fn new(components: Vec<Button>) -> Self {
        Self {
            kind: Self::COMPONENT_TYPE,
            components,
        }
    }
}

/// Embed footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text
    pub text: String,
}

/// Rich embed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    /// Title line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Side bar color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    /// Footer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Embed with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Builder-style footer.
    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }
}

/// Message body used for interaction responses, new messages, edits and
/// webhook follow-ups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessagePayload {
    /// Plain text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Embeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    /// Component rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    /// Message flags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessagePayload {
    /// Ephemeral plain text message.
    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            flags: Some(MessageFlags::EPHEMERAL),
            ..Self::default()
        }
    }

    /// Ephemeral message with one embed.
    pub fn ephemeral_embed(embed: Embed) -> Self {
        Self {
            embeds: Some(vec![embed]),
            flags: Some(MessageFlags::EPHEMERAL),
            ..Self::default()
        }
    }

    /// Payload replacing only the component rows.
    pub fn components(rows: Vec<ActionRow>) -> Self {
        Self {
            components: Some(rows),
            ..Self::default()
        }
    }

    /// True when the ephemeral flag is set.
    pub fn is_ephemeral(&self) -> bool {
        self.flags
            .is_some_and(|flags| flags & MessageFlags::EPHEMERAL != 0)
    }
}

/// Interaction callback body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    /// Callback type
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
    /// Message data, when the type carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessagePayload>,
}

impl InteractionResponse {
    /// Answer to a ping.
    pub fn pong() -> Self {
        Self {
            kind: InteractionResponseType::Pong,
            data: None,
        }
    }

    /// New message in the channel.
    pub fn message(data: MessagePayload) -> Self {
        Self {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(data),
        }
    }

    /// Edit of the message the pressed component belongs to.
    pub fn update(data: MessagePayload) -> Self {
        Self {
            kind: InteractionResponseType::UpdateMessage,
            data: Some(data),
        }
    }

    /// Deferred acknowledgement; the real answer follows via the webhook.
    pub fn deferred(ephemeral: bool) -> Self {
        Self {
            kind: InteractionResponseType::DeferredChannelMessageWithSource,
            data: Some(MessagePayload {
                flags: ephemeral.then_some(MessageFlags::EPHEMERAL),
                ..MessagePayload::default()
            }),
        }
    }
}
