//! Short-lived cache of member role sets.
//!
//! Discord's member role list lags behind writes made a moment earlier, so a
//! member pressing buttons in quick succession would otherwise act on stale
//! data. Each mutation stores the resulting set for five minutes under
//! `user-roles:{guild}:{user}`. Without an entry, the role list embedded in
//! the interaction payload is used.

use crate::StoreResult;
use pronouns_discord::Member;
use pronouns_error::StoreError;
use pronouns_store::{KeyValueStore, PutOptions, put_json};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Lifetime of a cached role set.
pub const MEMBER_ROLE_TTL: Duration = Duration::from_secs(5 * 60);

/// Advisory per-member role cache.
#[derive(Clone)]
pub struct MemberRoleCache {
    store: Arc<dyn KeyValueStore>,
}

impl MemberRoleCache {
    /// Create a cache over a store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(guild_id: &str, user_id: &str) -> String {
        format!("user-roles:{}:{}", guild_id, user_id)
    }

    /// Cached role set, `None` when unknown.
    ///
    /// An unreadable entry counts as unknown.
    #[instrument(skip(self))]
    pub async fn get(&self, guild_id: &str, user_id: &str) -> StoreResult<Option<BTreeSet<String>>> {
        let Some(raw) = self.store.get(&Self::key(guild_id, user_id)).await? else {
            debug!("Role cache miss");
            return Ok(None);
        };
        match serde_json::from_str::<BTreeSet<String>>(&raw) {
            Ok(roles) => {
                debug!(count = roles.len(), "Role cache hit");
                Ok(Some(roles))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable role cache entry");
                Ok(None)
            }
        }
    }

    /// Current role set: cached, else the interaction snapshot.
    pub async fn roles(&self, guild_id: &str, member: &Member) -> StoreResult<BTreeSet<String>> {
        Ok(self
            .get(guild_id, member.user_id())
            .await?
            .unwrap_or_else(|| member.roles.iter().cloned().collect()))
    }

    /// True when the member is believed to hold `role_id`.
    pub async fn has(&self, guild_id: &str, member: &Member, role_id: &str) -> StoreResult<bool> {
        Ok(self.roles(guild_id, member).await?.contains(role_id))
    }

    /// Record that the member gained a role.
    #[instrument(skip(self, member), fields(user_id = %member.user_id()))]
    pub async fn add(&self, guild_id: &str, member: &Member, role_id: &str) -> StoreResult<()> {
        let mut roles = self.roles(guild_id, member).await?;
        roles.insert(role_id.to_string());
        self.put(guild_id, member.user_id(), &roles).await
    }

    /// Record that the member lost a role.
    #[instrument(skip(self, member), fields(user_id = %member.user_id()))]
    pub async fn del(&self, guild_id: &str, member: &Member, role_id: &str) -> StoreResult<()> {
        let mut roles = self.roles(guild_id, member).await?;
        roles.remove(role_id);
        self.put(guild_id, member.user_id(), &roles).await
    }

    /// Record that the member lost several roles.
    #[instrument(skip(self, member, role_ids), fields(user_id = %member.user_id(), count = role_ids.len()))]
    pub async fn delete_all(
        &self,
        guild_id: &str,
        member: &Member,
        role_ids: &[String],
    ) -> StoreResult<()> {
        let mut roles = self.roles(guild_id, member).await?;
        for role_id in role_ids {
            roles.remove(role_id);
        }
        self.put(guild_id, member.user_id(), &roles).await
    }

    async fn put(
        &self,
        guild_id: &str,
        user_id: &str,
        roles: &BTreeSet<String>,
    ) -> Result<(), StoreError> {
        put_json(
            self.store.as_ref(),
            &Self::key(guild_id, user_id),
            roles,
            PutOptions::with_ttl(MEMBER_ROLE_TTL),
        )
        .await
    }
}
