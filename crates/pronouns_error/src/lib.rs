//! Error types for the pronouns bot.
//!
//! # Error Hierarchy
//!
//! Every concern follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! `PronounsError` is the umbrella type every crate can bubble up with `?`.
//!
//! # Examples
//!
//! ```
//! use pronouns_error::{DiscordApiError, PronounsResult};
//!
//! fn fetch_role() -> PronounsResult<String> {
//!     Err(DiscordApiError::from_status(404, "Unknown Role"))?
//! }
//!
//! assert!(fetch_role().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod discord;
mod error;
mod reconcile;
mod store;
mod validation;

pub use config::{ConfigError, ConfigErrorKind};
pub use discord::{DiscordApiError, DiscordApiErrorKind};
pub use error::{PronounsError, PronounsErrorKind, PronounsResult};
pub use reconcile::ReconcileError;
pub use store::{StoreError, StoreErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
