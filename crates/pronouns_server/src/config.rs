//! Server configuration.

use config::{Config, Environment, File};
use derive_getters::Getters;
use pronouns_discord::DISCORD_API_BASE;
use pronouns_error::{ConfigError, ConfigErrorKind};
use pronouns_rate_limit::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Prefix of environment overrides (`PRONOUNS_BIND`, `PRONOUNS_DISCORD_TOKEN`,
/// `PRONOUNS_RATE_LIMIT__CAPACITY`, ...).
pub const ENV_PREFIX: &str = "PRONOUNS";

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "pronouns";

/// Everything the webhook server needs to run.
///
/// Sources, later ones winning: built-in defaults, a TOML file, then
/// `PRONOUNS_*` environment variables. Nested tables use a double underscore
/// in variable names.
///
/// # Example
///
/// ```
/// use pronouns_server::ServerConfigBuilder;
///
/// let config = ServerConfigBuilder::default()
///     .discord_token("secret")
///     .application_id("1046538011133095936")
///     .build()
///     .unwrap();
/// assert_eq!(config.bind(), "0.0.0.0:8787");
/// assert!(!config.redacted().contains("secret"));
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
#[builder(default, setter(into))]
pub struct ServerConfig {
    /// Socket address the webhook listens on
    #[serde(default = "default_bind")]
    bind: String,

    /// Discord REST base URL
    #[serde(default = "default_api_base")]
    discord_api_base: String,

    /// Bot token used for REST calls
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    discord_token: Option<String>,

    /// Application the interactions must target
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    application_id: Option<String>,

    /// JSON snapshot of durable store records; memory only when unset
    #[serde(default)]
    #[builder(setter(into, strip_option))]
    store_path: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    json_logs: bool,

    /// Per-user interaction limits
    #[serde(default)]
    rate_limit: RateLimitConfig,
}

fn default_bind() -> String {
    "0.0.0.0:8787".to_string()
}

fn default_api_base() -> String {
    DISCORD_API_BASE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            discord_api_base: default_api_base(),
            discord_token: None,
            application_id: None,
            store_path: None,
            log_level: default_log_level(),
            json_logs: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `path` (required when given, else an optional
    /// `pronouns.toml`) and the process environment.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_from(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                File::from(path).required(true)
            }
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Invalid(e.to_string())))
    }

    /// Bot token, required to talk to Discord.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::Missing("PRONOUNS_DISCORD_TOKEN")))
    }

    /// Application id, required to accept interactions.
    pub fn require_application_id(&self) -> Result<&str, ConfigError> {
        self.application_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::Missing("PRONOUNS_APPLICATION_ID")))
    }

    /// Pretty JSON of the configuration with the token masked.
    pub fn redacted(&self) -> String {
        let mut shown = self.clone();
        if shown.discord_token.is_some() {
            shown.discord_token = Some("********".to_string());
        }
        serde_json::to_string_pretty(&shown).unwrap_or_else(|e| format!("<unprintable: {}>", e))
    }
}
