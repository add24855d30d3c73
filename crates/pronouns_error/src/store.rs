//! Key-value store error types.

/// Kinds of store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// The backend failed to read or write
    #[display("Store backend failure: {}", _0)]
    Backend(String),
    /// A stored value could not be encoded or decoded
    #[display("Serialization failure for '{}': {}", key, reason)]
    Serialization {
        /// Key whose value failed to (de)serialize
        key: String,
        /// Underlying serde message
        reason: String,
    },
    /// A listed key had no value behind it
    #[display("unable to fetch {}", _0)]
    MissingValue(String),
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use pronouns_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::MissingValue("roles:1:he_him".to_string()));
/// assert!(format!("{}", err).contains("roles:1:he_him"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
