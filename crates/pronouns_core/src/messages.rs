//! Member-facing replies.

use pronouns_discord::{Embed, InteractionResponse, MessagePayload};
use pronouns_error::{ValidationError, ValidationErrorKind};

/// Reply when a button press fails for an unexpected reason.
pub const GENERIC_ERROR: &str = "Uh oh, looks like something went wrong. Please try again later.";

/// Note appended when Discord refuses a pronoun role change.
pub const ROLE_WARNING: &str = ":warning: I wasn't able to assign the role. Please make sure the bot role is positioned above the members in the role list and that the pronoun roles are positioned below the bot role.";

/// Note appended when Discord refuses a pronoun nickname.
pub const NICKNAME_WARNING: &str = ":warning: I wasn't able to change your nickname. Bots can't rename the server owner or members whose top role is above the bot role.";

/// Reply to interactions outside guilds.
pub const GUILD_ONLY: &str = "Sorry! I only work in guilds.";

/// Title of the rate limit reply.
pub const RATE_LIMITED: &str = "Woah! You're going too fast, please slow down!";

/// Ephemeral plain text reply.
pub fn ephemeral_reply(content: impl Into<String>) -> InteractionResponse {
    InteractionResponse::message(MessagePayload::ephemeral_text(content))
}

/// Ephemeral reply made of one titled embed.
pub fn embed_reply(title: impl Into<String>) -> InteractionResponse {
    InteractionResponse::message(MessagePayload::ephemeral_embed(Embed::titled(title)))
}

/// Reply explaining why input was rejected.
pub fn validation_reply(err: &ValidationError) -> InteractionResponse {
    let icon = match err.kind() {
        ValidationErrorKind::InvalidEmoji => ":question:",
        _ => ":x:",
    };
    embed_reply(format!("{} {}", icon, err.kind()))
}

/// Reply for interactions outside guilds.
pub fn guild_only_reply() -> InteractionResponse {
    embed_reply(GUILD_ONLY)
}

/// Reply for members over the rate limit.
pub fn rate_limited_reply(retry_after_secs: u64) -> InteractionResponse {
    InteractionResponse::message(MessagePayload::ephemeral_embed(
        Embed::titled(RATE_LIMITED).with_footer(format!("Try again in {} seconds", retry_after_secs)),
    ))
}

/// Note appended when pronoun roles could not be created.
pub const ROLE_CREATION_WARNING: &str =
    ":warning: Hmm, it looks like I don't have permission to create roles.";

/// Follow-up sent when a prompt is posted without all pronoun roles.
pub fn missing_role_permissions_message() -> MessagePayload {
    MessagePayload::ephemeral_embed(
        Embed::titled(":warning: Missing permissions").with_description(
            "Hmm, it looks like I don't have permission to create roles.\n*[Click here to read about permissions](https://support.discord.com/hc/en-us/articles/206029707-How-do-I-set-up-Permissions-)*",
        ),
    )
}

/// Ephemeral confirmation embed, with an optional warning underneath.
pub fn confirmation_reply(title: impl Into<String>, warning: Option<&str>) -> InteractionResponse {
    let mut embed = Embed::titled(title);
    if let Some(warning) = warning {
        embed = embed.with_description(warning);
    }
    InteractionResponse::message(MessagePayload::ephemeral_embed(embed))
}
