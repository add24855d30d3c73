//! Permission gate for configuration commands.

use crate::ephemeral_reply;
use pronouns_discord::{InteractionResponse, Member, Permissions};
use tracing::debug;

/// Reply naming the permissions a command needs.
pub fn missing_permissions_reply(required: Permissions) -> InteractionResponse {
    ephemeral_reply(format!(
        "Sorry, you're missing the required permissions to execute this command! Please make sure you have access to `{}`.",
        required.names().join(", ")
    ))
}

/// `None` when the member holds `required`, else the rejection reply.
pub fn require_permissions(member: &Member, required: Permissions) -> Option<InteractionResponse> {
    if member.permissions.allows(required) {
        return None;
    }
    debug!(
        user_id = %member.user_id(),
        missing = ?member.permissions.missing(required).names(),
        "Member lacks permissions"
    );
    Some(missing_permissions_reply(required))
}
