//! `/config`: view and change how the bot behaves in a guild.

use super::{is_role_provisioning_failure, missing_option, recover_validation};
use crate::{
    CommandHandler, GuildConfig, InteractionContext, PronounServices, confirmation_reply,
    default_config, missing_permissions_reply, require_permissions, ROLE_CREATION_WARNING,
};
use async_trait::async_trait;
use pronouns_discord::{Embed, InteractionOptions, InteractionResponse, MessagePayload, Permissions};
use pronouns_error::{PronounsResult, ValidationError, ValidationErrorKind};
use strum::{Display, EnumString};
use tracing::{info, instrument, warn};

/// Permissions needed to change the configuration.
pub const CONFIG_PERMISSIONS: Permissions =
    Permissions::from_bits(Permissions::MANAGE_GUILD.bits() | Permissions::MANAGE_ROLES.bits());

/// Permissions needed to touch the owner-only flag.
pub const OWNER_ONLY_PERMISSIONS: Permissions =
    Permissions::from_bits(CONFIG_PERMISSIONS.bits() | Permissions::MANAGE_MESSAGES.bits());

/// Setting restored by `/config reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ResetOption {
    /// Every setting the member may change
    All,
    /// Role or nickname mode
    UseRoles,
    /// Owner-only flag
    OwnerOnly,
    /// Prompt text
    PromptMessage,
}

/// Handler of `/config view|edit|reset`.
pub struct ConfigCommand {
    services: PronounServices,
}

impl ConfigCommand {
    /// Create the handler.
    pub fn new(services: PronounServices) -> Self {
        Self { services }
    }

    async fn run(&self, ctx: &InteractionContext) -> PronounsResult<InteractionResponse> {
        let (action, options) = ctx
            .options()
            .subcommand()
            .ok_or_else(|| missing_option("subcommand"))?;
        let config = self.services.configs().get(ctx.guild_id()).await?;

        if action == "view" {
            let authorized = ctx.member().permissions.allows(CONFIG_PERMISSIONS);
            return Ok(view(&config, authorized));
        }
        if let Some(reply) = require_permissions(ctx.member(), CONFIG_PERMISSIONS) {
            return Ok(reply);
        }

        match action {
            "edit" => self.edit(ctx, config, options).await,
            "reset" => self.reset(ctx, config, options).await,
            other => Err(missing_option(other)),
        }
    }

    async fn edit(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
        options: &InteractionOptions,
    ) -> PronounsResult<InteractionResponse> {
        if options.has("owner-only") {
            if let Some(reply) = require_permissions(ctx.member(), OWNER_ONLY_PERMISSIONS) {
                return Ok(reply);
            }
        }

        if let Some(use_roles) = options.get_bool("use-roles") {
            config.use_roles = use_roles;
        }
        if let Some(owner_only) = options.get_bool("owner-only") {
            config.only_owner_can_config = owner_only;
        }
        if let Some(message) = options.get_str("prompt-message") {
            config.set_prompt_message(message);
        }

        self.apply(ctx, config).await
    }

    async fn reset(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
        options: &InteractionOptions,
    ) -> PronounsResult<InteractionResponse> {
        let raw = options
            .get_str("option")
            .ok_or_else(|| missing_option("option"))?;
        let option: ResetOption = raw.parse().map_err(|_| {
            ValidationError::new(ValidationErrorKind::UnknownResetOption(raw.to_string()))
        })?;
        let may_reset_owner_only = ctx.member().permissions.allows(OWNER_ONLY_PERMISSIONS);
        let defaults = default_config();

        match option {
            ResetOption::UseRoles => config.use_roles = defaults.use_roles,
            ResetOption::PromptMessage => config.prompt_message = defaults.prompt_message,
            ResetOption::OwnerOnly => {
                if !may_reset_owner_only {
                    return Ok(missing_permissions_reply(OWNER_ONLY_PERMISSIONS));
                }
                config.only_owner_can_config = defaults.only_owner_can_config;
            }
            ResetOption::All => {
                config.use_roles = defaults.use_roles;
                config.prompt_message = defaults.prompt_message;
                if may_reset_owner_only {
                    config.only_owner_can_config = defaults.only_owner_can_config;
                }
            }
        }
        info!(option = %option, "Reset configuration");

        self.apply(ctx, config).await
    }

    /// Provision roles when in role mode, re-render prompts, then save.
    async fn apply(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
    ) -> PronounsResult<InteractionResponse> {
        let mut warning = None;
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
                warn!(error = %e, "Configuration saved with missing roles");
                warning = Some(ROLE_CREATION_WARNING);
            }
        }

        self.services.prompts().refresh_prompts(&mut config).await;
        self.services.configs().save(ctx.guild_id(), &config).await?;
        Ok(confirmation_reply(
            ":white_check_mark: Your config has been updated.",
            warning,
        ))
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "Enabled" } else { "Disabled" }
}

/// Embed describing the current configuration.
fn view(config: &GuildConfig, authorized: bool) -> InteractionResponse {
    let mut description = format!(
        "**Use roles**: {}\n> When enabled, pronouns are given as roles. When disabled, they are added to nicknames.\n\n\
         **Owner only**: {}\n> When enabled, only members with Manage Server can change the configuration.\n\n\
         **Prompt message**:\n> {}",
        on_off(config.use_roles),
        on_off(config.only_owner_can_config),
        config.prompt_message.replace('\n', "\n> "),
    );
    if authorized {
        description.push_str("\n\nUse `/config edit` to change these settings.");
    }
    InteractionResponse::message(MessagePayload::ephemeral_embed(
        Embed::titled("Current configuration").with_description(description),
    ))
}

#[async_trait]
impl CommandHandler for ConfigCommand {
    fn name(&self) -> &'static str {
        "config"
    }

    #[instrument(skip(self, ctx), fields(guild_id = %ctx.guild_id(), user_id = %ctx.user_id()))]
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse> {
        recover_validation(self.run(&ctx).await)
    }
}
