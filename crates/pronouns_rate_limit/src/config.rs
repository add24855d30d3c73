//! Rate limit configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Limits applied to each user's interactions.
///
/// A user may make `capacity` interactions; the counter starts over once the
/// last recorded interaction is older than `window_secs`.
///
/// # Example
///
/// ```
/// use pronouns_rate_limit::{RateLimitConfig, RateLimitConfigBuilder};
///
/// let config = RateLimitConfigBuilder::default()
///     .capacity(3u32)
///     .build()
///     .unwrap();
/// assert_eq!(*config.capacity(), 3);
/// assert_eq!(*config.window_secs(), 15);
///
/// let relaxed = RateLimitConfig::default().with_window_secs(60);
/// assert_eq!(*relaxed.capacity(), 8);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct RateLimitConfig {
    /// Interactions allowed per window
    #[serde(default = "default_capacity")]
    #[builder(default = "default_capacity()")]
    capacity: u32,

    /// Window length (seconds)
    #[serde(default = "default_window_secs")]
    #[builder(default = "default_window_secs()")]
    window_secs: u64,
}

fn default_capacity() -> u32 {
    8
}

fn default_window_secs() -> u64 {
    15
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            window_secs: default_window_secs(),
        }
    }
}
