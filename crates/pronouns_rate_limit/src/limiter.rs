//! KV-backed interaction counter.

use crate::RateLimitConfig;
use chrono::{DateTime, Utc};
use pronouns_error::StoreError;
use pronouns_store::{KeyValueStore, PutOptions, get_json, put_json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Counter persisted per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    /// Accepted calls in the current window
    pub calls: u32,
    /// Time of the last accepted call (Unix milliseconds)
    pub timestamp: i64,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The call may proceed; `calls` includes this one.
    Allowed {
        /// Calls counted in the window so far
        calls: u32,
    },
    /// The call must be turned away.
    Limited {
        /// Seconds shown to the user before trying again
        retry_after_secs: u64,
    },
}

impl RateLimitDecision {
    /// True for `Limited`.
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }
}

/// Per-user limiter over a shared key-value store.
///
/// Rejected calls leave the stored record untouched, so a user hammering the
/// buttons does not extend their own lockout. Records expire one window
/// after the last accepted call, when they would be reset anyway.
#[derive(Clone)]
pub struct InteractionRateLimiter {
    store: Arc<dyn KeyValueStore>,
    config: RateLimitConfig,
    started_at: DateTime<Utc>,
}

impl InteractionRateLimiter {
    /// Create a limiter; the retry hint is aligned to the current instant.
    pub fn new(store: Arc<dyn KeyValueStore>, config: RateLimitConfig) -> Self {
        Self {
            store,
            config,
            started_at: Utc::now(),
        }
    }

    /// Override the instant the retry hint is aligned to.
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn key(user_id: &str) -> String {
        format!("ratelimits:{}", user_id)
    }

    /// Check and count a call made now.
    pub async fn check(&self, user_id: &str) -> Result<RateLimitDecision, StoreError> {
        self.check_at(user_id, Utc::now()).await
    }

    /// Check and count a call made at `now`.
    #[instrument(skip(self))]
    pub async fn check_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, StoreError> {
        let key = Self::key(user_id);
        let record: Option<RateLimitRecord> = get_json(self.store.as_ref(), &key).await?;

        let window_ms = self.window_ms();
        let now_ms = now.timestamp_millis();
        let calls = match record {
            Some(record) if record.timestamp >= now_ms - window_ms => record.calls,
            _ => 0,
        };

        if calls >= *self.config.capacity() {
            let retry_after_secs = self.retry_after(now);
            debug!(calls, retry_after_secs, "Rate limit exceeded");
            return Ok(RateLimitDecision::Limited { retry_after_secs });
        }

        let updated = RateLimitRecord {
            calls: calls + 1,
            timestamp: now_ms,
        };
        let ttl = Duration::from_secs(*self.config.window_secs());
        put_json(self.store.as_ref(), &key, &updated, PutOptions::with_ttl(ttl)).await?;
        debug!(calls = updated.calls, "Rate limit check passed");
        Ok(RateLimitDecision::Allowed {
            calls: updated.calls,
        })
    }

    fn window_ms(&self) -> i64 {
        i64::try_from(*self.config.window_secs())
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000)
    }

    /// Seconds until the next window boundary, counted from `started_at`.
    fn retry_after(&self, now: DateTime<Utc>) -> u64 {
        let window = *self.config.window_secs() as f64;
        if window <= 0.0 {
            return 0;
        }
        let elapsed = (now - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;
        (window - elapsed % window).round() as u64
    }
}
