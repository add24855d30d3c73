//! Per-user interaction rate limiting.
//!
//! Each user gets a small counter in the key-value store under
//! `ratelimits:{user}`. Calls inside the window increment it; once the
//! counter reaches capacity further calls are turned away until the window
//! has passed since the last accepted call.
//!
//! # Example
//!
//! ```no_run
//! use pronouns_rate_limit::{InteractionRateLimiter, RateLimitConfig, RateLimitDecision};
//! use pronouns_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), pronouns_error::StoreError> {
//! let limiter = InteractionRateLimiter::new(Arc::new(MemoryStore::new()), RateLimitConfig::default());
//! match limiter.check("80351110224678912").await? {
//!     RateLimitDecision::Allowed { calls } => println!("call #{}", calls),
//!     RateLimitDecision::Limited { retry_after_secs } => println!("wait {}s", retry_after_secs),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod limiter;

pub use config::{RateLimitConfig, RateLimitConfigBuilder, RateLimitConfigBuilderError};
pub use limiter::{InteractionRateLimiter, RateLimitDecision, RateLimitRecord};
