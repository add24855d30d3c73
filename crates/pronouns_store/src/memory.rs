//! In-process key-value store with TTL expiry.

use crate::{KeyValueStore, PutOptions};
use pronouns_error::{StoreError, StoreErrorKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Stored value with optional expiration.
#[derive(Debug, Clone)]
struct StoreEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StoreEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    fn is_durable(&self) -> bool {
        self.expires_at.is_none()
    }
}

/// Key-value store held in memory.
///
/// Records written with a TTL vanish once it elapses. Reads skip them and
/// every write evicts them, so the map only holds live records and durable
/// ones. When opened with a snapshot path, every write to a record
/// without a TTL rewrites the snapshot so guild configuration and role
/// records survive a restart. Expiring records are never snapshotted.
///
/// Cloning is cheap and shares the underlying map.
///
/// # Example
///
/// ```
/// use pronouns_store::{KeyValueStore, MemoryStore, PutOptions};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// store.put("roles:1:he_him", "42".into(), PutOptions::default()).await?;
/// assert_eq!(store.get("roles:1:he_him").await?, Some("42".to_string()));
/// assert_eq!(store.list("roles:1:").await?, vec!["roles:1:he_him".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, StoreEntry>>>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot file.
    ///
    /// A missing file starts an empty store; it is created on the first
    /// durable write.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let mut entries = BTreeMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let durable: BTreeMap<String, String> =
                    serde_json::from_str(&raw).map_err(|e| {
                        StoreError::new(StoreErrorKind::Serialization {
                            key: path.display().to_string(),
                            reason: e.to_string(),
                        })
                    })?;
                debug!(records = durable.len(), "Loaded store snapshot");
                for (key, value) in durable {
                    entries.insert(
                        key,
                        StoreEntry {
                            value,
                            expires_at: None,
                        },
                    );
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot yet, starting empty");
            }
            Err(e) => {
                return Err(StoreError::new(StoreErrorKind::Backend(format!(
                    "Failed to read snapshot {}: {}",
                    path.display(),
                    e
                ))));
            }
        }

        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            snapshot: Some(path),
        })
    }

    /// Number of live records.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Check if the store holds no live records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Evict every expired record, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        prune(&mut entries, Instant::now())
    }

    async fn write_snapshot(&self, entries: &BTreeMap<String, StoreEntry>) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };

        let durable: BTreeMap<&str, &str> = entries
            .iter()
            .filter(|(_, entry)| entry.is_durable())
            .map(|(key, entry)| (key.as_str(), entry.value.as_str()))
            .collect();
        let raw = serde_json::to_string_pretty(&durable).map_err(|e| {
            StoreError::new(StoreErrorKind::Serialization {
                key: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        tokio::fs::write(path, raw).await.map_err(|e| {
            StoreError::new(StoreErrorKind::Backend(format!(
                "Failed to write snapshot {}: {}",
                path.display(),
                e
            )))
        })
    }
}

fn prune(entries: &mut BTreeMap<String, StoreEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    let dropped = before - entries.len();
    if dropped > 0 {
        debug!(dropped, "Evicted expired records");
    }
    dropped
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    #[instrument(skip(self, value), fields(ttl = ?options.ttl))]
    async fn put(&self, key: &str, value: String, options: PutOptions) -> Result<(), StoreError> {
        let entry = StoreEntry {
            value,
            expires_at: options.ttl.map(|ttl: Duration| Instant::now() + ttl),
        };
        let durable = entry.is_durable();

        let mut entries = self.entries.write().await;
        prune(&mut entries, Instant::now());
        let replaced_durable = entries
            .insert(key.to_string(), entry)
            .is_some_and(|old| old.is_durable());

        if durable || replaced_durable {
            self.write_snapshot(&entries).await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if let Some(old) = entries.remove(key)
            && old.is_durable()
        {
            self.write_snapshot(&entries).await?;
        }
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect())
    }
}
