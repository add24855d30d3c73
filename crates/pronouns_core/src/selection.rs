//! Applies pronoun button presses to member roles or nicknames.
//!
//! Button ids encode the pronoun and the select mode:
//! - `pronouns:{key}`: single select, the member keeps exactly this pronoun
//! - `pronouns:{key}:multi`: toggle this pronoun on or off
//! - `pronouns:$clear:multi`: drop every pronoun role
//!
//! Presses are one-shot transitions; the member's state lives in their roles
//! (or nickname) and in the [`MemberRoleCache`], which every role change
//! updates before Discord is called and keeps when Discord refuses.

use crate::{
    ANY_KEY, ASK_KEY, GuildConfig, GuildConfigRepository, InteractionContext, MemberRoleCache,
    NICKNAME_WARNING, ROLE_WARNING, RoleRecordRepository, cleared_nickname, compose_nickname,
    ephemeral_reply, render_member_picker,
};
use pronouns_discord::{DiscordRest, InteractionResponse, MessagePayload};
use pronouns_error::{
    PronounsResult, StoreError, StoreErrorKind, ValidationError, ValidationErrorKind,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const CLEAR_KEY: &str = "$clear";

/// What a button press targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    /// Remove all pronoun roles.
    Clear,
    /// A configured pronoun, by key.
    Pronoun(String),
}

/// Single or multi select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Replace the member's pronoun with the selected one.
    Single,
    /// Toggle the selected pronoun.
    Multi,
}

/// Parsed pronoun button id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomId {
    /// Pressed pronoun or clear
    pub target: SelectionTarget,
    /// Select mode
    pub mode: SelectionMode,
}

impl CustomId {
    /// Parse `pronouns:{key}[:multi]`.
    ///
    /// ```
    /// use pronouns_core::{CustomId, SelectionMode, SelectionTarget};
    ///
    /// let id = CustomId::parse("pronouns:she_her:multi").unwrap();
    /// assert_eq!(id.target, SelectionTarget::Pronoun("she_her".into()));
    /// assert_eq!(id.mode, SelectionMode::Multi);
    /// assert!(CustomId::parse("multi-prompt").is_none());
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':');
        if parts.next()? != "pronouns" {
            return None;
        }
        let key = parts.next().filter(|key| !key.is_empty())?;
        let mode = match parts.next() {
            Some("multi") => SelectionMode::Multi,
            _ => SelectionMode::Single,
        };
        let target = if key == CLEAR_KEY {
            SelectionTarget::Clear
        } else {
            SelectionTarget::Pronoun(key.to_string())
        };
        Some(Self { target, mode })
    }
}

/// Confirmation shown after a single selection.
pub fn selection_message(key: &str, name: &str) -> String {
    if key == ASK_KEY {
        "People will be prompted to ask for your pronouns.".to_string()
    } else {
        format!("Your preferred pronoun has been set to **{}**.", name)
    }
}

/// The meta answer that cannot be held together with `key`.
fn exclusive_partner(key: &str) -> Option<&'static str> {
    match key {
        ANY_KEY => Some(ASK_KEY),
        ASK_KEY => Some(ANY_KEY),
        _ => None,
    }
}

/// Whether Discord carried out a member change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOutcome {
    /// Done, or nothing needed doing
    Applied,
    /// Refused for lack of permission
    Refused,
}

impl RoleOutcome {
    /// Refused when either step was refused.
    fn and(self, other: Self) -> Self {
        if self == Self::Refused || other == Self::Refused {
            Self::Refused
        } else {
            Self::Applied
        }
    }
}

/// `message` with `warning` appended when the change was refused.
fn with_warning(message: String, outcome: RoleOutcome, warning: &str) -> String {
    match outcome {
        RoleOutcome::Applied => message,
        RoleOutcome::Refused if message.is_empty() => warning.to_string(),
        RoleOutcome::Refused => format!("{}\n\n{}", message, warning),
    }
}

/// Turns button presses into role and nickname changes.
#[derive(Clone)]
pub struct SelectionEngine {
    discord: Arc<dyn DiscordRest>,
    configs: GuildConfigRepository,
    roles: RoleRecordRepository,
    cache: MemberRoleCache,
}

impl SelectionEngine {
    /// Create an engine.
    pub fn new(
        discord: Arc<dyn DiscordRest>,
        configs: GuildConfigRepository,
        roles: RoleRecordRepository,
        cache: MemberRoleCache,
    ) -> Self {
        Self {
            discord,
            configs,
            roles,
            cache,
        }
    }

    /// Apply a button press.
    ///
    /// Guilds in nickname mode get a nickname prefix; multi select is
    /// rejected there. Guilds in role mode get role changes, after any
    /// leftover nickname prefix is removed. Changes Discord refuses for lack
    /// of permission are answered with the reply plus a warning.
    #[instrument(skip(self, ctx), fields(guild_id = %ctx.guild_id(), user_id = %ctx.user_id()))]
    pub async fn select(
        &self,
        ctx: &InteractionContext,
        custom_id: &str,
    ) -> PronounsResult<InteractionResponse> {
        let selection = CustomId::parse(custom_id).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownPronoun(custom_id.to_string()))
        })?;
        let config = self.configs.get(ctx.guild_id()).await?;

        if !config.use_roles {
            if selection.mode == SelectionMode::Multi {
                return Err(ValidationError::new(ValidationErrorKind::MultiSelectRequiresRoles).into());
            }
            return self.select_nickname(ctx, &config, &selection.target).await;
        }

        self.clear_pronoun_nickname(ctx, &config).await;

        let key = match selection.target {
            SelectionTarget::Clear => {
                let outcome = self.clear_all_roles(ctx).await?;
                return self.member_picker_update(ctx, &config, outcome).await;
            }
            SelectionTarget::Pronoun(key) => key,
        };

        let entry = config.pronouns.get(&key).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownPronoun(key.clone()))
        })?;
        let role_id = self.roles.get(ctx.guild_id(), &key).await?.ok_or_else(|| {
            StoreError::new(StoreErrorKind::MissingValue(format!(
                "roles:{}:{}",
                ctx.guild_id(),
                key
            )))
        })?;

        match selection.mode {
            SelectionMode::Single => {
                let outcome = self.set_single_role(ctx, &role_id).await?;
                Ok(ephemeral_reply(with_warning(
                    selection_message(&key, &entry.name),
                    outcome,
                    ROLE_WARNING,
                )))
            }
            SelectionMode::Multi => {
                let outcome = self.toggle_role(ctx, &key, &role_id).await?;
                self.member_picker_update(ctx, &config, outcome).await
            }
        }
    }

    async fn select_nickname(
        &self,
        ctx: &InteractionContext,
        config: &GuildConfig,
        target: &SelectionTarget,
    ) -> PronounsResult<InteractionResponse> {
        let key = match target {
            SelectionTarget::Pronoun(key) => key.as_str(),
            SelectionTarget::Clear => CLEAR_KEY,
        };
        let entry = config.pronouns.get(key).ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnknownPronoun(key.to_string()))
        })?;

        let nick = compose_nickname(ctx.member().display_name(), config, &entry.name);
        let outcome = match self
            .discord
            .set_nickname(ctx.guild_id(), ctx.user_id(), &nick)
            .await
        {
            Ok(()) => {
                info!(key, "Set pronoun nickname");
                RoleOutcome::Applied
            }
            Err(e) if e.is_permission_denied() => {
                warn!(key, error = %e, "Nickname change refused");
                RoleOutcome::Refused
            }
            Err(e) => return Err(e.into()),
        };
        Ok(ephemeral_reply(with_warning(
            selection_message(key, &entry.name),
            outcome,
            NICKNAME_WARNING,
        )))
    }

    /// Drop a prefix left over from nickname mode. Failure is not fatal.
    async fn clear_pronoun_nickname(&self, ctx: &InteractionContext, config: &GuildConfig) {
        let Some(nick) = cleared_nickname(ctx.member().display_name(), config) else {
            return;
        };
        if let Err(e) = self
            .discord
            .set_nickname(ctx.guild_id(), ctx.user_id(), &nick)
            .await
        {
            warn!(error = %e, "Failed to clear pronoun nickname");
        }
    }

    /// Remove every pronoun role the member holds, in one request.
    ///
    /// Held roles are those the cache or the interaction payload know of.
    /// The new role list is the payload's minus every pronoun role, so roles
    /// granted or revoked outside the bot since the cache was written are
    /// left as Discord reports them. Nothing is sent when no pronoun role is
    /// held.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id()))]
    pub async fn clear_all_roles(&self, ctx: &InteractionContext) -> PronounsResult<RoleOutcome> {
        let guild_id = ctx.guild_id();
        let member = ctx.member();
        let pronoun_roles: HashSet<String> =
            self.roles.get_all(guild_id).await?.into_iter().collect();

        let mut known = self.cache.roles(guild_id, member).await?;
        known.extend(member.roles.iter().cloned());
        let held: Vec<String> = known
            .into_iter()
            .filter(|role_id| pronoun_roles.contains(role_id))
            .collect();
        if held.is_empty() {
            debug!("No pronoun roles to clear");
            return Ok(RoleOutcome::Applied);
        }

        self.cache.delete_all(guild_id, member, &held).await?;
        let remaining: Vec<String> = member
            .roles
            .iter()
            .filter(|role_id| !pronoun_roles.contains(*role_id))
            .cloned()
            .collect();
        match self
            .discord
            .set_member_roles(guild_id, ctx.user_id(), &remaining)
            .await
        {
            Ok(()) => {
                info!(cleared = held.len(), "Cleared pronoun roles");
                Ok(RoleOutcome::Applied)
            }
            Err(e) if e.is_permission_denied() => {
                warn!(error = %e, "Clearing pronoun roles refused");
                Ok(RoleOutcome::Refused)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_single_role(
        &self,
        ctx: &InteractionContext,
        role_id: &str,
    ) -> PronounsResult<RoleOutcome> {
        let cleared = self.clear_all_roles(ctx).await?;
        let granted = self.give_role(ctx, role_id).await?;
        Ok(cleared.and(granted))
    }

    async fn toggle_role(
        &self,
        ctx: &InteractionContext,
        key: &str,
        role_id: &str,
    ) -> PronounsResult<RoleOutcome> {
        let guild_id = ctx.guild_id();
        let mut outcome = RoleOutcome::Applied;

        if let Some(partner) = exclusive_partner(key) {
            if let Some(partner_role) = self.roles.get(guild_id, partner).await? {
                if self.cache.has(guild_id, ctx.member(), &partner_role).await? {
                    outcome = self.take_role(ctx, &partner_role).await?;
                }
            }
        }

        let toggled = if self.cache.has(guild_id, ctx.member(), role_id).await? {
            self.take_role(ctx, role_id).await?
        } else {
            self.give_role(ctx, role_id).await?
        };
        Ok(outcome.and(toggled))
    }

    /// Grant a role. The cache is updated first and kept even when Discord
    /// refuses.
    async fn give_role(&self, ctx: &InteractionContext, role_id: &str) -> PronounsResult<RoleOutcome> {
        self.cache.add(ctx.guild_id(), ctx.member(), role_id).await?;
        match self
            .discord
            .add_member_role(ctx.guild_id(), ctx.user_id(), role_id)
            .await
        {
            Ok(()) => Ok(RoleOutcome::Applied),
            Err(e) if e.is_permission_denied() => {
                warn!(role_id, error = %e, "Role grant refused");
                Ok(RoleOutcome::Refused)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Revoke a role. A role that is already gone counts as revoked.
    async fn take_role(&self, ctx: &InteractionContext, role_id: &str) -> PronounsResult<RoleOutcome> {
        self.cache.del(ctx.guild_id(), ctx.member(), role_id).await?;
        match self
            .discord
            .remove_member_role(ctx.guild_id(), ctx.user_id(), role_id)
            .await
        {
            Ok(()) => Ok(RoleOutcome::Applied),
            Err(e) if e.is_not_found() => {
                debug!(role_id, "Role already absent");
                Ok(RoleOutcome::Applied)
            }
            Err(e) if e.is_permission_denied() => {
                warn!(role_id, error = %e, "Role removal refused");
                Ok(RoleOutcome::Refused)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Re-rendered member picker. The content line carries the warning, or
    /// is emptied so an earlier warning does not linger.
    async fn member_picker_update(
        &self,
        ctx: &InteractionContext,
        config: &GuildConfig,
        outcome: RoleOutcome,
    ) -> PronounsResult<InteractionResponse> {
        let records = self.roles.get_all_keyed(ctx.guild_id()).await?;
        let member_roles = self.cache.roles(ctx.guild_id(), ctx.member()).await?;
        Ok(InteractionResponse::update(MessagePayload {
            content: Some(with_warning(String::new(), outcome, ROLE_WARNING)),
            ..MessagePayload::components(render_member_picker(config, &records, &member_roles))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom_ids() {
        assert_eq!(
            CustomId::parse("pronouns:he_him"),
            Some(CustomId {
                target: SelectionTarget::Pronoun("he_him".to_string()),
                mode: SelectionMode::Single,
            })
        );
        assert_eq!(
            CustomId::parse("pronouns:$clear:multi"),
            Some(CustomId {
                target: SelectionTarget::Clear,
                mode: SelectionMode::Multi,
            })
        );
        assert_eq!(CustomId::parse("pronouns:"), None);
        assert_eq!(CustomId::parse("other:he_him"), None);
    }

    #[test]
    fn test_selection_message() {
        assert_eq!(
            selection_message("ask", "Ask Me"),
            "People will be prompted to ask for your pronouns."
        );
        assert_eq!(
            selection_message("she_her", "She/Her"),
            "Your preferred pronoun has been set to **She/Her**."
        );
    }

    #[test]
    fn test_warning_follows_refusal() {
        let done = "Your preferred pronoun has been set to **He/Him**.".to_string();
        assert_eq!(with_warning(done.clone(), RoleOutcome::Applied, ROLE_WARNING), done);
        assert_eq!(
            with_warning(done.clone(), RoleOutcome::Refused, ROLE_WARNING),
            format!("{}\n\n{}", done, ROLE_WARNING)
        );
        assert_eq!(
            with_warning(String::new(), RoleOutcome::Refused, ROLE_WARNING),
            ROLE_WARNING
        );
        assert_eq!(
            RoleOutcome::Applied.and(RoleOutcome::Refused),
            RoleOutcome::Refused
        );
        assert_eq!(RoleOutcome::Applied.and(RoleOutcome::Applied), RoleOutcome::Applied);
    }
}
