//! Slash commands.
//!
//! - `/pronouns add|emoji|remove|reset`: manage the pronoun set
//! - `/config view|edit|reset`: display mode, owner-only flag, prompt text
//! - `/prompt`: post a prompt message in the current channel

mod config;
mod prompt;
mod pronouns;

pub use config::{CONFIG_PERMISSIONS, ConfigCommand, OWNER_ONLY_PERMISSIONS, ResetOption};
pub use prompt::{PROMPT_CREATED, PromptCommand};
pub use pronouns::PronounsCommand;

use crate::validation_reply;
use pronouns_discord::InteractionResponse;
use pronouns_error::{PronounsError, PronounsResult, ValidationError, ValidationErrorKind};

/// Answer rejected input with its explanation; keep other errors.
pub(crate) fn recover_validation(
    result: PronounsResult<InteractionResponse>,
) -> PronounsResult<InteractionResponse> {
    match result {
        Err(e) => match e.as_validation() {
            Some(invalid) => {
                tracing::debug!(reason = %invalid.kind(), "Rejected command input");
                Ok(validation_reply(invalid))
            }
            None => Err(e),
        },
        ok => ok,
    }
}

/// Error for an option the payload should have carried.
#[track_caller]
pub(crate) fn missing_option(name: &str) -> PronounsError {
    ValidationError::new(ValidationErrorKind::MissingOption(name.to_string())).into()
}

/// True for failures that should become a role warning instead of an error.
pub(crate) fn is_role_provisioning_failure(err: &PronounsError) -> bool {
    err.as_reconcile().is_some() || err.as_discord().is_some_and(|e| e.is_permission_denied())
}
