//! Interaction webhook server for the pronouns bot.
//!
//! Discord delivers slash commands and button presses to `POST /interaction`.
//! Interactions outside a guild or over the per-user rate limit are answered
//! directly. The rest are routed by command name or custom id.
//!
//! # Example
//!
//! ```no_run
//! use pronouns_server::{AppState, ServerConfig, serve};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::load(None)?;
//! let state = AppState::from_config(&config).await?;
//! serve(config.bind(), state).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod observability;
mod server;

pub use config::{
    DEFAULT_CONFIG_FILE, ENV_PREFIX, ServerConfig, ServerConfigBuilder, ServerConfigBuilderError,
};
pub use observability::init_tracing;
pub use server::{AppState, router, serve};
