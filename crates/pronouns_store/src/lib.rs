//! Key-value storage for guild configuration, role records and caches.
//!
//! The bot keeps all of its state in a flat key-value namespace with
//! prefix listing and optional per-record expiry. The `KeyValueStore` trait
//! is the seam; `MemoryStore` is the bundled implementation, optionally
//! snapshotting its durable records to a JSON file.
//!
//! Key layout:
//! - `guild-config:{guild}`
//! - `roles:{guild}:{pronoun_key}`
//! - `user-roles:{guild}:{user}` (expires)
//! - `ratelimits:{user}`

#![warn(missing_docs)]

mod json;
mod memory;
mod store;

pub use json::{get_json, put_json};
pub use memory::MemoryStore;
pub use store::{KeyValueStore, PutOptions};
