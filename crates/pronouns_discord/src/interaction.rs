//! Incoming interaction payloads.

use crate::Member;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Interaction kinds the bot distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// Endpoint health check
    Ping,
    /// Slash command
    ApplicationCommand,
    /// Button press
    MessageComponent,
    /// Anything else (autocomplete, modals)
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            3 => Self::MessageComponent,
            other => Self::Other(other),
        }
    }
}

/// Option value (or nested subcommand) sent with a slash command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandOption {
    /// Option name
    pub name: String,
    /// Option type (1 = subcommand, 2 = subcommand group)
    #[serde(rename = "type")]
    pub kind: u8,
    /// Scalar value
    #[serde(default)]
    pub value: Option<JsonValue>,
    /// Nested options of a subcommand
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    const SUB_COMMAND: u8 = 1;
    const SUB_COMMAND_GROUP: u8 = 2;

    fn is_subcommand(&self) -> bool {
        matches!(self.kind, Self::SUB_COMMAND | Self::SUB_COMMAND_GROUP)
    }
}

/// Command or component data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InteractionData {
    /// Command name (application commands)
    #[serde(default)]
    pub name: Option<String>,
    /// Component custom id (button presses)
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Command options
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// Interaction delivered to the webhook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Interaction {
    /// Interaction snowflake
    pub id: String,
    /// Application the interaction targets
    pub application_id: String,
    /// Raw interaction type
    #[serde(rename = "type")]
    pub kind: u8,
    /// Continuation token for the webhook follow-up
    pub token: String,
    /// Guild, absent in direct messages
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Channel the interaction came from
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Invoking member, present in guilds
    #[serde(default)]
    pub member: Option<Member>,
    /// Command or component data
    #[serde(default)]
    pub data: Option<InteractionData>,
}

impl Interaction {
    /// Interaction kind.
    pub fn interaction_type(&self) -> InteractionType {
        InteractionType::from(self.kind)
    }

    /// Command name, for application commands.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref()?.name.as_deref()
    }

    /// Component custom id, for button presses.
    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref()?.custom_id.as_deref()
    }

    /// Parsed command options.
    pub fn options(&self) -> InteractionOptions {
        self.data
            .as_ref()
            .map(|data| InteractionOptions::new(&data.options))
            .unwrap_or_default()
    }
}

/// Name-indexed view over command options.
///
/// A subcommand option becomes the `subcommand` with its own nested view.
///
/// # Example
///
/// ```
/// use pronouns_discord::{CommandOption, InteractionOptions};
/// use serde_json::json;
///
/// let raw: Vec<CommandOption> = serde_json::from_value(json!([
///     {"name": "add", "type": 1, "options": [
///         {"name": "pronoun", "type": 3, "value": "Xe/Xem"}
///     ]}
/// ])).unwrap();
///
/// let options = InteractionOptions::new(&raw);
/// let (name, add) = options.subcommand().unwrap();
/// assert_eq!(name, "add");
/// assert_eq!(add.get_str("pronoun"), Some("Xe/Xem"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionOptions {
    values: HashMap<String, JsonValue>,
    subcommand: Option<(String, Box<InteractionOptions>)>,
}

impl InteractionOptions {
    /// Index a list of raw options.
    pub fn new(options: &[CommandOption]) -> Self {
        let mut parsed = Self::default();
        for option in options {
            if option.is_subcommand() {
                parsed.subcommand = Some((
                    option.name.clone(),
                    Box::new(InteractionOptions::new(&option.options)),
                ));
            } else if let Some(value) = &option.value {
                parsed.values.insert(option.name.clone(), value.clone());
            }
        }
        parsed
    }

    /// Selected subcommand and its options.
    pub fn subcommand(&self) -> Option<(&str, &InteractionOptions)> {
        self.subcommand
            .as_ref()
            .map(|(name, options)| (name.as_str(), options.as_ref()))
    }

    /// True when the option was supplied.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// String option value.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name)?.as_str()
    }

    /// Boolean option value.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name)?.as_bool()
    }
}
