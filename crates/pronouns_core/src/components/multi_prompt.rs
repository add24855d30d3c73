//! "Pick Multiple" button on the shared prompt.

use crate::{
    ComponentHandler, GENERIC_ERROR, InteractionContext, MULTI_PROMPT_ID, PronounServices,
    ephemeral_reply, member_picker_message,
};
use async_trait::async_trait;
use pronouns_discord::InteractionResponse;
use pronouns_error::PronounsResult;
use tracing::{error, instrument};

/// Opens a personal picker showing which pronouns the member holds.
pub struct MultiPromptComponent {
    services: PronounServices,
}

impl MultiPromptComponent {
    /// Create the handler.
    pub fn new(services: PronounServices) -> Self {
        Self { services }
    }

    async fn picker(&self, ctx: &InteractionContext) -> PronounsResult<InteractionResponse> {
        let guild_id = ctx.guild_id();
        let config = self.services.configs().get(guild_id).await?;
        let records = self.services.roles().get_all_keyed(guild_id).await?;
        let member_roles = self.services.cache().roles(guild_id, ctx.member()).await?;
        Ok(InteractionResponse::message(member_picker_message(
            &config,
            &records,
            &member_roles,
        )))
    }
}

#[async_trait]
impl ComponentHandler for MultiPromptComponent {
    fn key(&self) -> &'static str {
        MULTI_PROMPT_ID
    }

    #[instrument(skip(self, ctx), fields(guild_id = %ctx.guild_id(), user_id = %ctx.user_id()))]
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse> {
        match self.picker(&ctx).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(error = %e, "Failed to open member picker");
                Ok(ephemeral_reply(GENERIC_ERROR))
            }
        }
    }
}
