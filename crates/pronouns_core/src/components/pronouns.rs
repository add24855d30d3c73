//! Pronoun buttons (`pronouns:<key>[:multi]`).

use crate::{
    ComponentHandler, GENERIC_ERROR, InteractionContext, PronounServices, ephemeral_reply,
};
use async_trait::async_trait;
use pronouns_discord::InteractionResponse;
use pronouns_error::PronounsResult;
use tracing::{error, instrument, warn};

/// Applies pronoun button presses.
///
/// Every outcome is answered: rejected presses get their explanation, any
/// other failure the generic error.
pub struct PronounsComponent {
    services: PronounServices,
}

impl PronounsComponent {
    /// Create the handler.
    pub fn new(services: PronounServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ComponentHandler for PronounsComponent {
    fn key(&self) -> &'static str {
        "pronouns"
    }

    #[instrument(skip(self, ctx), fields(guild_id = %ctx.guild_id(), user_id = %ctx.user_id()))]
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse> {
        let custom_id = ctx.custom_id().unwrap_or_default();
        match self.services.selection().select(&ctx, custom_id).await {
            Ok(response) => Ok(response),
            Err(e) => match e.as_validation() {
                Some(invalid) => {
                    warn!(custom_id, reason = %invalid.kind(), "Rejected button press");
                    Ok(ephemeral_reply(invalid.kind().to_string()))
                }
                None => {
                    error!(custom_id, error = %e, "Failed to apply pronoun selection");
                    Ok(ephemeral_reply(GENERIC_ERROR))
                }
            },
        }
    }
}
