//! Prompt and member picker layouts.

use crate::{ANY_KEY, ASK_KEY, GuildConfig};
use pronouns_discord::{ActionRow, Button, ButtonStyle, Embed, Emoji, MessagePayload};
use std::collections::{BTreeMap, BTreeSet};

/// Embed color of prompts and pickers.
pub const PROMPT_COLOR: u32 = 0x58_65_f2;
/// Title of the public prompt.
pub const PROMPT_TITLE: &str = "👋 Hey there! What are your pronouns?";
/// Title of the member picker.
pub const MEMBER_PICKER_TITLE: &str = "Select your preferred pronouns";

/// Custom id of the button opening the member picker.
pub const MULTI_PROMPT_ID: &str = "multi-prompt";

/// Custom id of a single-select button.
pub fn single_id(key: &str) -> String {
    format!("pronouns:{}", key)
}

/// Custom id of a multi-select button.
pub fn multi_id(key: &str) -> String {
    format!("pronouns:{}:multi", key)
}

/// Custom id of the clear button.
pub fn clear_id() -> String {
    multi_id("$clear")
}

fn into_rows(buttons: Vec<Button>) -> Vec<ActionRow> {
    buttons
        .chunks(ActionRow::MAX_BUTTONS)
        .map(|chunk| ActionRow::new(chunk.to_vec()))
        .collect()
}

/// Button rows of the public prompt.
///
/// Visible pronouns first, five per row, then a row with the meta answers
/// and, in role mode, the button opening the member picker.
pub fn render_prompt(config: &GuildConfig) -> Vec<ActionRow> {
    let buttons = config
        .pronouns
        .visible()
        .map(|(key, entry)| {
            Button::new(single_id(key), &entry.name, ButtonStyle::Primary)
                .with_emoji(entry.emoji.clone())
        })
        .collect();
    let mut rows = into_rows(buttons);

    let meta = if config.use_roles {
        vec![
            Button::new(single_id(ANY_KEY), "Any", ButtonStyle::Secondary),
            Button::new(single_id(ASK_KEY), "Ask Me", ButtonStyle::Secondary),
            Button::new(MULTI_PROMPT_ID, "Pick Multiple", ButtonStyle::Secondary),
        ]
    } else {
        vec![
            Button::new(single_id(ANY_KEY), "Any Pronouns", ButtonStyle::Secondary),
            Button::new(single_id(ASK_KEY), "Ask Me", ButtonStyle::Secondary),
        ]
    };
    rows.push(ActionRow::new(meta));
    rows
}

/// Full public prompt message.
pub fn prompt_message(config: &GuildConfig) -> MessagePayload {
    MessagePayload {
        embeds: Some(vec![
            Embed::titled(PROMPT_TITLE)
                .with_description(&config.prompt_message)
                .with_color(PROMPT_COLOR),
        ]),
        components: Some(render_prompt(config)),
        ..MessagePayload::default()
    }
}

/// Button rows of a member's multi-select picker.
///
/// Pronouns whose role the member holds are highlighted. A clear button
/// closes the layout.
pub fn render_member_picker(
    config: &GuildConfig,
    role_records: &BTreeMap<String, String>,
    member_roles: &BTreeSet<String>,
) -> Vec<ActionRow> {
    let buttons = config
        .pronouns
        .visible()
        .map(|(key, entry)| {
            let held = role_records
                .get(key)
                .is_some_and(|role_id| member_roles.contains(role_id));
            let style = if held {
                ButtonStyle::Primary
            } else {
                ButtonStyle::Secondary
            };
            Button::new(multi_id(key), &entry.name, style).with_emoji(entry.emoji.clone())
        })
        .collect();
    let mut rows = into_rows(buttons);
    rows.push(ActionRow::new(vec![
        Button::new(clear_id(), "Clear", ButtonStyle::Danger)
            .with_emoji(Some(Emoji::unicode("🗑️"))),
    ]));
    rows
}

/// Ephemeral member picker message.
pub fn member_picker_message(
    config: &GuildConfig,
    role_records: &BTreeMap<String, String>,
    member_roles: &BTreeSet<String>,
) -> MessagePayload {
    MessagePayload {
        components: Some(render_member_picker(config, role_records, member_roles)),
        ..MessagePayload::ephemeral_embed(
            Embed::titled(MEMBER_PICKER_TITLE).with_color(PROMPT_COLOR),
        )
    }
}
