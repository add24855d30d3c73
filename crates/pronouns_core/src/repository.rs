//! Guild configuration and role record persistence.

use crate::{GuildConfig, default_config};
use pronouns_error::{StoreError, StoreErrorKind};
use pronouns_store::{KeyValueStore, PutOptions, get_json, put_json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted guild configurations under `guild-config:{guild}`.
#[derive(Clone)]
pub struct GuildConfigRepository {
    store: Arc<dyn KeyValueStore>,
}

impl GuildConfigRepository {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(guild_id: &str) -> String {
        format!("guild-config:{}", guild_id)
    }

    /// Load a guild's configuration, or a fresh default when none is stored.
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: &str) -> StoreResult<GuildConfig> {
        match get_json(self.store.as_ref(), &Self::key(guild_id)).await? {
            Some(config) => Ok(config),
            None => {
                debug!("No stored config, using defaults");
                Ok(default_config())
            }
        }
    }

    /// Persist a guild's configuration.
    #[instrument(skip(self, config), fields(pronouns = config.pronouns.len(), pickers = config.pickers.len()))]
    pub async fn save(&self, guild_id: &str, config: &GuildConfig) -> StoreResult<()> {
        put_json(
            self.store.as_ref(),
            &Self::key(guild_id),
            config,
            PutOptions::default(),
        )
        .await
    }
}

/// Pronoun key to role id mapping under `roles:{guild}:{key}`.
///
/// Values are raw role ids, not JSON.
#[derive(Clone)]
pub struct RoleRecordRepository {
    store: Arc<dyn KeyValueStore>,
}

impl RoleRecordRepository {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn prefix(guild_id: &str) -> String {
        format!("roles:{}:", guild_id)
    }

    fn key(guild_id: &str, pronoun_key: &str) -> String {
        format!("roles:{}:{}", guild_id, pronoun_key)
    }

    /// Role id recorded for a pronoun.
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: &str, pronoun_key: &str) -> StoreResult<Option<String>> {
        self.store.get(&Self::key(guild_id, pronoun_key)).await
    }

    /// Every recorded role id of the guild.
    ///
    /// A listed key without a value is treated as corruption and fails the
    /// whole call.
    #[instrument(skip(self))]
    pub async fn get_all(&self, guild_id: &str) -> StoreResult<Vec<String>> {
        Ok(self.get_all_keyed(guild_id).await?.into_values().collect())
    }

    /// Every recorded role id of the guild, keyed by pronoun key.
    ///
    /// A listed key without a value is treated as corruption and fails the
    /// whole call.
    #[instrument(skip(self))]
    pub async fn get_all_keyed(&self, guild_id: &str) -> StoreResult<BTreeMap<String, String>> {
        let prefix = Self::prefix(guild_id);
        let mut records = BTreeMap::new();
        for key in self.store.list(&prefix).await? {
            let role_id = self
                .store
                .get(&key)
                .await?
                .ok_or_else(|| StoreError::new(StoreErrorKind::MissingValue(key.clone())))?;
            let pronoun_key = key.strip_prefix(&prefix).unwrap_or(&key).to_string();
            records.insert(pronoun_key, role_id);
        }
        debug!(count = records.len(), "Loaded role records");
        Ok(records)
    }

    /// Record the role backing a pronoun, replacing any previous record.
    #[instrument(skip(self))]
    pub async fn save(&self, guild_id: &str, pronoun_key: &str, role_id: &str) -> StoreResult<()> {
        self.store
            .put(
                &Self::key(guild_id, pronoun_key),
                role_id.to_string(),
                PutOptions::default(),
            )
            .await
    }

    /// Forget the role of a pronoun.
    #[instrument(skip(self))]
    pub async fn delete(&self, guild_id: &str, pronoun_key: &str) -> StoreResult<()> {
        self.store.delete(&Self::key(guild_id, pronoun_key)).await
    }
}
