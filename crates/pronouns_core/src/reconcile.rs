//! Self-healing pronoun roles.

use crate::{GuildConfig, GuildConfigRepository, RoleRecordRepository, role_name};
use pronouns_discord::{CreateRole, DiscordRest, DiscordResult};
use pronouns_error::{PronounsResult, ReconcileError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Makes sure every pronoun of a guild is backed by a live role.
///
/// A pronoun needs a new role when it has no role record, or when the
/// recorded role no longer exists in the guild (deleted by hand). Guild roles
/// are fetched once per pass.
#[derive(Clone)]
pub struct RoleReconciler {
    discord: Arc<dyn DiscordRest>,
    configs: GuildConfigRepository,
    roles: RoleRecordRepository,
}

impl RoleReconciler {
    /// Create a reconciler.
    pub fn new(
        discord: Arc<dyn DiscordRest>,
        configs: GuildConfigRepository,
        roles: RoleRecordRepository,
    ) -> Self {
        Self {
            discord,
            configs,
            roles,
        }
    }

    /// Reconcile against the stored configuration.
    pub async fn ensure_roles(&self, guild_id: &str) -> PronounsResult<()> {
        let config = self.configs.get(guild_id).await?;
        self.ensure_roles_for(guild_id, &config).await
    }

    /// Reconcile against a configuration that may not be stored yet.
    ///
    /// Every key is attempted. When some role could not be created, a
    /// `ReconcileError` naming those keys is returned after the pass; the keys
    /// that were repaired stay repaired. Store failures abort immediately.
    #[instrument(skip(self, config), fields(pronouns = config.pronouns.len()))]
    pub async fn ensure_roles_for(&self, guild_id: &str, config: &GuildConfig) -> PronounsResult<()> {
        let records = self.roles.get_all_keyed(guild_id).await?;
        let live: HashSet<String> = self
            .discord
            .guild_roles(guild_id)
            .await?
            .into_iter()
            .map(|role| role.id)
            .collect();

        let mut failed = Vec::new();
        let mut permission_denied = false;
        let mut cause = None;

        for (key, entry) in config.pronouns.iter() {
            if records.get(key).is_some_and(|role_id| live.contains(role_id)) {
                continue;
            }
            debug!(key, "Pronoun has no live role");

            match self.create_pronoun_role(guild_id, &role_name(key, entry)).await {
                Ok(role_id) => {
                    self.roles.save(guild_id, key, &role_id).await?;
                    info!(key, role_id = %role_id, "Provisioned pronoun role");
                }
                Err(e) => {
                    warn!(key, error = %e, "Failed to provision pronoun role");
                    permission_denied |= e.is_permission_denied();
                    cause.get_or_insert_with(|| e.to_string());
                    failed.push(key.to_string());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ReconcileError::new(failed, permission_denied, cause.unwrap_or_default()).into())
        }
    }

    /// Create an unmentionable guild role, returning its id.
    #[instrument(skip(self))]
    pub async fn create_pronoun_role(&self, guild_id: &str, name: &str) -> DiscordResult<String> {
        let role = self
            .discord
            .create_role(guild_id, &CreateRole::named(name))
            .await?;
        Ok(role.id)
    }
}
