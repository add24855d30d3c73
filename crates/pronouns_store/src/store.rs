//! Storage trait definition.

use pronouns_error::StoreError;
use std::time::Duration;

/// Options for a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Record expires this long after the write.
    pub ttl: Option<Duration>,
}

impl PutOptions {
    /// Write that expires after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }
}

/// Trait for pluggable key-value backends.
///
/// Implementations are shared across concurrent requests. No transactions are
/// offered: read-modify-write sequences built on top are last-write-wins.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value, replacing any previous one.
    async fn put(&self, key: &str, value: String, options: PutOptions) -> Result<(), StoreError>;

    /// Remove a value. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// List live keys starting with `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
