//! `/prompt`: post a pronoun prompt in the current channel.

use super::is_role_provisioning_failure;
use crate::{
    CommandHandler, GENERIC_ERROR, InteractionContext, Picker, PronounServices,
    missing_role_permissions_message, prompt_message, require_permissions,
};
use async_trait::async_trait;
use pronouns_discord::{InteractionResponse, MessagePayload, Permissions};
use pronouns_error::PronounsResult;
use tracing::{Instrument, error, info, info_span, warn};

/// Reply once the prompt has been posted.
pub const PROMPT_CREATED: &str = ":tada: The prompt has been created";

/// Handler of `/prompt`.
///
/// Answers with a deferred ephemeral response straight away; the prompt is
/// posted in a background task that edits the deferred reply when done.
#[derive(Clone)]
pub struct PromptCommand {
    services: PronounServices,
}

impl PromptCommand {
    /// Create the handler.
    pub fn new(services: PronounServices) -> Self {
        Self { services }
    }

    /// Post the prompt and settle the deferred reply.
    ///
    /// Failures are reported to the member through the deferred reply.
    pub async fn complete(&self, ctx: &InteractionContext) {
        if let Err(e) = self.post_prompt(ctx).await {
            error!(error = %e, "Failed to create prompt");
            self.edit_reply(ctx, &MessagePayload::ephemeral_text(GENERIC_ERROR))
                .await;
        }
    }

    async fn post_prompt(&self, ctx: &InteractionContext) -> PronounsResult<()> {
        if let Some(reply) = require_permissions(ctx.member(), Permissions::MANAGE_MESSAGES) {
            self.edit_reply(ctx, &reply.data.unwrap_or_default()).await;
            return Ok(());
        }
        let Some(channel_id) = ctx.channel_id() else {
            warn!("Prompt requested without a channel");
            self.edit_reply(ctx, &MessagePayload::ephemeral_text(GENERIC_ERROR))
                .await;
            return Ok(());
        };

        let discord = self.services.discord();
        let mut config = self.services.configs().get(ctx.guild_id()).await?;

        if config.use_roles {
            if let Err(e) = self
                .services
                .reconciler()
                .ensure_roles_for(ctx.guild_id(), &config)
                .await
            {
                if !is_role_provisioning_failure(&e) {
                    return Err(e);
                }
                warn!(error = %e, "Posting prompt with missing roles");
                if let Err(e) = discord
                    .create_followup(
                        ctx.application_id(),
                        ctx.token(),
                        &missing_role_permissions_message(),
                    )
                    .await
                {
                    error!(error = %e, "Failed to send role permission warning");
                }
            }
        }

        let message = discord
            .create_message(channel_id, &prompt_message(&config))
            .await?;
        config.track_picker(Picker::new(channel_id, &message.id));
        self.services.configs().save(ctx.guild_id(), &config).await?;
        info!(channel_id, message_id = %message.id, "Posted prompt");

        self.edit_reply(ctx, &MessagePayload::ephemeral_text(PROMPT_CREATED))
            .await;
        Ok(())
    }

    async fn edit_reply(&self, ctx: &InteractionContext, message: &MessagePayload) {
        if let Err(e) = self
            .services
            .discord()
            .edit_original_response(ctx.application_id(), ctx.token(), message)
            .await
        {
            error!(error = %e, "Failed to edit deferred reply");
        }
    }
}

#[async_trait]
impl CommandHandler for PromptCommand {
    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse> {
        let command = self.clone();
        let span = info_span!("prompt", guild_id = %ctx.guild_id(), user_id = %ctx.user_id());
        tokio::spawn(async move { command.complete(&ctx).await }.instrument(span));
        Ok(InteractionResponse::deferred(true))
    }
}
