//! Discord REST API error types.

/// Discord API failure classes.
///
/// The split between `NotFound`, `PermissionDenied` and everything else is what
/// callers branch on: stale references are pruned or recreated, permission
/// problems become inline warnings, the rest terminate the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DiscordApiErrorKind {
    /// The target resource (role, message, member) no longer exists.
    #[display("Not found: {}", _0)]
    NotFound(String),

    /// The bot lacks the permission or role position to act.
    #[display("Permission denied ({}): {}", status, message)]
    PermissionDenied {
        /// HTTP status returned by Discord (401 or 403)
        status: u16,
        /// Response body or description
        message: String,
    },

    /// Discord rate limited the request.
    #[display("Rate limited: {}", _0)]
    RateLimited(String),

    /// Any other non-2xx response.
    #[display("API error ({}): {}", status, message)]
    Api {
        /// HTTP status returned by Discord
        status: u16,
        /// Response body or description
        message: String,
    },

    /// The request never produced a response.
    #[display("Transport error: {}", _0)]
    Transport(String),

    /// The response body could not be decoded.
    #[display("Decode error: {}", _0)]
    Decode(String),
}

/// Discord API error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Discord API Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordApiError {
    kind: DiscordApiErrorKind,
    line: u32,
    file: &'static str,
}

impl DiscordApiError {
    /// Create a new error with caller location tracking.
    #[track_caller]
    pub fn new(kind: DiscordApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Classify a non-2xx HTTP status.
    ///
    /// # Examples
    ///
    /// ```
    /// use pronouns_error::DiscordApiError;
    ///
    /// assert!(DiscordApiError::from_status(404, "Unknown Message").is_not_found());
    /// assert!(DiscordApiError::from_status(403, "Missing Permissions").is_permission_denied());
    /// assert_eq!(DiscordApiError::from_status(500, "oops").status(), Some(500));
    /// ```
    #[track_caller]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = match status {
            404 => DiscordApiErrorKind::NotFound(message),
            401 | 403 => DiscordApiErrorKind::PermissionDenied { status, message },
            429 => DiscordApiErrorKind::RateLimited(message),
            _ => DiscordApiErrorKind::Api { status, message },
        };
        Self::new(kind)
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DiscordApiErrorKind {
        &self.kind
    }

    /// HTTP status of the failed call, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            DiscordApiErrorKind::NotFound(_) => Some(404),
            DiscordApiErrorKind::PermissionDenied { status, .. } => Some(*status),
            DiscordApiErrorKind::RateLimited(_) => Some(429),
            DiscordApiErrorKind::Api { status, .. } => Some(*status),
            DiscordApiErrorKind::Transport(_) | DiscordApiErrorKind::Decode(_) => None,
        }
    }

    /// True when the target resource was deleted.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, DiscordApiErrorKind::NotFound(_))
    }

    /// True when the bot is missing rights for the call.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind, DiscordApiErrorKind::PermissionDenied { .. })
    }
}
