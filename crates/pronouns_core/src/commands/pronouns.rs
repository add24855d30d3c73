//! `/pronouns`: manage the pronoun set of a guild.

use super::{missing_option, recover_validation};
use crate::{
    CommandHandler, GuildConfig, InteractionContext, PronounServices, confirmation_reply,
    parse_emoji, pronoun_key, require_permissions, role_name, validate_name, ROLE_CREATION_WARNING,
};
use async_trait::async_trait;
use pronouns_discord::{InteractionOptions, InteractionResponse, Permissions};
use pronouns_error::{PronounsResult, ValidationError, ValidationErrorKind};
use tracing::{error, info, instrument, warn};

/// Handler of `/pronouns add|emoji|remove|reset`.
///
/// Requires Manage Roles. Every change re-renders the posted prompts before
/// the configuration is saved.
pub struct PronounsCommand {
    services: PronounServices,
}

impl PronounsCommand {
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

        if action == "reset" {
            return self.reset(ctx, config).await;
        }

        let name = options
            .get_str("pronoun")
            .ok_or_else(|| missing_option("pronoun"))?
            .trim();
        validate_name(name)?;

        match action {
            "add" => self.add(ctx, config, name, options).await,
            "emoji" => self.emoji(ctx, config, name, options).await,
            "remove" => self.remove(ctx, config, name).await,
            other => Err(missing_option(other)),
        }
    }

    async fn add(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
        name: &str,
        options: &InteractionOptions,
    ) -> PronounsResult<InteractionResponse> {
        // An unreadable emoji is dropped rather than rejected.
        let emoji = options.get_str("emoji").and_then(parse_emoji);
        let key = config.add_pronoun(name, emoji)?;

        let mut warning = None;
        if config.use_roles {
            let role = config
                .pronouns
                .get(&key)
                .map(|entry| role_name(&key, entry))
                .unwrap_or_else(|| name.to_string());
            match self
                .services
                .reconciler()
                .create_pronoun_role(ctx.guild_id(), &role)
                .await
            {
                Ok(role_id) => {
                    self.services
                        .roles()
                        .save(ctx.guild_id(), &key, &role_id)
                        .await?
                }
                Err(e) if e.is_permission_denied() => {
                    warn!(key = %key, error = %e, "Added pronoun without a role");
                    warning = Some(ROLE_CREATION_WARNING);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.commit(ctx, &mut config).await?;
        info!(key = %key, "Added pronoun");
        Ok(confirmation_reply(
            format!(":white_check_mark: `{}` has been added.", name),
            warning,
        ))
    }

    async fn emoji(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
        name: &str,
        options: &InteractionOptions,
    ) -> PronounsResult<InteractionResponse> {
        let raw = options
            .get_str("emoji")
            .ok_or_else(|| missing_option("emoji"))?;
        let key = pronoun_key(name);
        let Some(entry) = config.pronouns.get_mut(&key) else {
            return Err(ValidationError::new(ValidationErrorKind::UnknownPronoun(name.to_string())).into());
        };

        let title = if raw.trim().eq_ignore_ascii_case("none") {
            entry.emoji = None;
            format!(":wastebasket: The emoji has been removed for `{}`.", name)
        } else {
            let emoji = parse_emoji(raw)
                .ok_or_else(|| ValidationError::new(ValidationErrorKind::InvalidEmoji))?;
            if entry.emoji.as_ref() == Some(&emoji) {
                return Ok(confirmation_reply(
                    format!(
                        ":question: There was nothing to change, `{}` already has that emoji.",
                        name
                    ),
                    None,
                ));
            }
            entry.emoji = Some(emoji);
            format!(":white_check_mark: The emoji for `{}` has been changed.", name)
        };

        self.commit(ctx, &mut config).await?;
        Ok(confirmation_reply(title, None))
    }

    async fn remove(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
        name: &str,
    ) -> PronounsResult<InteractionResponse> {
        let (key, entry) = config.remove_pronoun(name)?;
        self.delete_pronoun_role(ctx.guild_id(), &key).await?;
        self.commit(ctx, &mut config).await?;
        info!(key = %key, "Removed pronoun");
        Ok(confirmation_reply(
            format!(":wastebasket: `{}` has been removed.", entry.name),
            None,
        ))
    }

    async fn reset(
        &self,
        ctx: &InteractionContext,
        mut config: GuildConfig,
    ) -> PronounsResult<InteractionResponse> {
        let removed = config.reset_pronouns();
        for key in &removed {
            self.delete_pronoun_role(ctx.guild_id(), key).await?;
        }
        self.commit(ctx, &mut config).await?;
        info!(removed = removed.len(), "Reset pronouns");
        Ok(confirmation_reply(
            ":wastebasket: All non-default pronouns have been removed.",
            None,
        ))
    }

    /// Delete the role backing a removed pronoun, then its record.
    ///
    /// A role Discord refuses to delete is logged and forgotten.
    async fn delete_pronoun_role(&self, guild_id: &str, key: &str) -> PronounsResult<()> {
        let roles = self.services.roles();
        if let Some(role_id) = roles.get(guild_id, key).await? {
            match self.services.discord().delete_role(guild_id, &role_id).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => error!(key, role_id = %role_id, error = %e, "Failed to delete pronoun role"),
            }
        }
        roles.delete(guild_id, key).await?;
        Ok(())
    }

    async fn commit(&self, ctx: &InteractionContext, config: &mut GuildConfig) -> PronounsResult<()> {
        self.services.prompts().refresh_prompts(config).await;
        self.services.configs().save(ctx.guild_id(), config).await?;
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for PronounsCommand {
    fn name(&self) -> &'static str {
        "pronouns"
    }

    #[instrument(skip(self, ctx), fields(guild_id = %ctx.guild_id(), user_id = %ctx.user_id()))]
    async fn handle(&self, ctx: InteractionContext) -> PronounsResult<InteractionResponse> {
        if let Some(reply) = require_permissions(ctx.member(), Permissions::MANAGE_ROLES) {
            return Ok(reply);
        }
        recover_validation(self.run(&ctx).await)
    }
}
