//! Validation errors raised before any state is mutated.
//!
//! The display text of each kind is the message shown to the member who ran
//! the command.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Pronoun display name exceeds the length cap
    #[display("The maximum length for `name` is {} characters.", _0)]
    NameTooLong(usize),

    /// Another pronoun already normalizes to the same key
    #[display("`{}` already exists.", _0)]
    DuplicatePronoun(String),

    /// The guild already has the maximum number of pronouns
    #[display("Sorry, you can't add more than {} pronoun options.", _0)]
    CapacityExceeded(usize),

    /// No pronoun matches the given name
    #[display("`{}` doesn't exist.", _0)]
    UnknownPronoun(String),

    /// Default pronouns cannot be removed
    #[display("Sorry, you can't delete a default pronoun option.")]
    DefaultPronoun,

    /// Reset option is not one of the known choices
    #[display("Unknown option `{}`.", _0)]
    UnknownResetOption(String),

    /// Emoji argument was not recognizable
    #[display("That doesn't seem like a valid emoji.")]
    InvalidEmoji,

    /// Multi-select pressed while the guild uses nicknames
    #[display(
        "Sorry, selecting multiple pronouns is only available when the server owner has configured me to use roles."
    )]
    MultiSelectRequiresRoles,

    /// A required command option was missing from the payload
    #[display("Missing option `{}`.", _0)]
    MissingOption(String),
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    line: u32,
    file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

impl From<ValidationErrorKind> for ValidationError {
    #[track_caller]
    fn from(kind: ValidationErrorKind) -> Self {
        Self::new(kind)
    }
}
