//! Server configuration errors.

/// What went wrong while assembling the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Sources could not be read or merged
    #[display("Failed to load configuration: {}", _0)]
    Load(String),
    /// Merged values did not fit the settings
    #[display("Invalid configuration: {}", _0)]
    Invalid(String),
    /// A setting the server cannot start without, named by its variable
    #[display("{} not set", _0)]
    Missing(&'static str),
}

/// Configuration error with source location.
///
/// ```
/// use pronouns_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Missing("PRONOUNS_DISCORD_TOKEN"));
/// assert!(err.to_string().starts_with("Configuration Error: PRONOUNS_DISCORD_TOKEN not set"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create an error at the caller's location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
