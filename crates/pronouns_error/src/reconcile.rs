//! Role reconciliation errors.

/// Role reconciliation error.
///
/// Raised once every pronoun has been attempted, naming the keys whose role
/// could not be provisioned. Keys that did succeed stay repaired.
///
/// # Examples
///
/// ```
/// use pronouns_error::ReconcileError;
///
/// let err = ReconcileError::new(vec!["xe_xem".to_string()], true, "Missing Permissions");
/// assert!(err.permission_denied);
/// assert!(format!("{}", err).contains("xe_xem"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Reconcile Error: roles missing for [{}]: {} at line {} in {}",
    failed_keys.join(", "),
    cause,
    line,
    file
)]
pub struct ReconcileError {
    /// Pronoun keys still without a live role
    pub failed_keys: Vec<String>,
    /// At least one failure was a permission problem
    pub permission_denied: bool,
    /// Description of the first failure
    pub cause: String,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ReconcileError {
    /// Create a new reconcile error with caller location tracking.
    #[track_caller]
    pub fn new(failed_keys: Vec<String>, permission_denied: bool, cause: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            failed_keys,
            permission_denied,
            cause: cause.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
