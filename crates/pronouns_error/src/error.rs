//! Top-level error wrapper types.

use crate::{ConfigError, DiscordApiError, ReconcileError, StoreError, ValidationError};

/// Every error the bot can produce, grouped by concern.
///
/// # Examples
///
/// ```
/// use pronouns_error::{PronounsError, StoreError, StoreErrorKind};
///
/// let err: PronounsError = StoreError::new(StoreErrorKind::Backend("down".into())).into();
/// assert!(format!("{}", err).contains("Store Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PronounsErrorKind {
    /// Discord REST failure
    #[from(DiscordApiError)]
    Discord(DiscordApiError),
    /// Key-value store failure
    #[from(StoreError)]
    Store(StoreError),
    /// Rejected user input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Pronoun roles could not all be provisioned
    #[from(ReconcileError)]
    Reconcile(ReconcileError),
    /// Server configuration problem
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Pronouns bot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Pronouns Error: {}", _0)]
pub struct PronounsError(Box<PronounsErrorKind>);

impl PronounsError {
    /// Create a new error from a kind.
    pub fn new(kind: PronounsErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PronounsErrorKind {
        &self.0
    }

    /// The Discord error inside, if this is one.
    pub fn as_discord(&self) -> Option<&DiscordApiError> {
        match self.kind() {
            PronounsErrorKind::Discord(err) => Some(err),
            _ => None,
        }
    }

    /// The reconciliation error inside, if this is one.
    pub fn as_reconcile(&self) -> Option<&ReconcileError> {
        match self.kind() {
            PronounsErrorKind::Reconcile(err) => Some(err),
            _ => None,
        }
    }

    /// The validation error inside, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self.kind() {
            PronounsErrorKind::Validation(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to PronounsErrorKind
impl<T> From<T> for PronounsError
where
    T: Into<PronounsErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for pronouns bot operations.
pub type PronounsResult<T> = std::result::Result<T, PronounsError>;
