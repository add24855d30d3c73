//! JSON helpers on top of the raw string store.

use crate::{KeyValueStore, PutOptions};
use pronouns_error::{StoreError, StoreErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fetch and decode a JSON value.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| {
        StoreError::new(StoreErrorKind::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Encode and store a JSON value.
pub async fn put_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    options: PutOptions,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|e| {
        StoreError::new(StoreErrorKind::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })
    })?;
    store.put(key, raw, options).await
}
