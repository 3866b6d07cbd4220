use std::fmt;

/// Machine-readable error codes for API responses and client decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    LetterNotFound,
    LetterTypeNotFound,
    UserNotFound,
    SlugConflict,
    InvalidBlockType,
    ValidationFailed,
    InvalidCredentials,
    Unauthorized,
    SessionExpired,
    CorruptDatabase,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::LetterNotFound => "E2001",
            Self::LetterTypeNotFound => "E2002",
            Self::UserNotFound => "E2003",
            Self::SlugConflict => "E2004",
            Self::InvalidBlockType => "E2005",
            Self::ValidationFailed => "E2006",
            Self::InvalidCredentials => "E3001",
            Self::Unauthorized => "E3002",
            Self::SessionExpired => "E3003",
            Self::CorruptDatabase => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and API error bodies.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::LetterNotFound => "Letter not found or not published",
            Self::LetterTypeNotFound => "Letter type not found",
            Self::UserNotFound => "User not found",
            Self::SlugConflict => "Slug already in use",
            Self::InvalidBlockType => "Invalid content block type",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidCredentials => "Invalid credentials or not authorized",
            Self::Unauthorized => "Authentication required",
            Self::SessionExpired => "Session expired",
            Self::CorruptDatabase => "Corrupt SQLite database",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint surfaced to operators and CLI users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in missive.toml and retry."),
            Self::LetterNotFound | Self::LetterTypeNotFound | Self::UserNotFound => None,
            Self::SlugConflict => Some("Pick a different title or slug."),
            Self::InvalidBlockType => Some("Use one of: text, image, rich_text."),
            Self::ValidationFailed => Some("Check required fields and retry."),
            Self::InvalidCredentials => Some("Check the username/password and staff status."),
            Self::Unauthorized | Self::SessionExpired => {
                Some("Log in with `missive login` and retry.")
            }
            Self::CorruptDatabase => Some("Restore the database from backup."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Typed failures crossing the storage and auth boundaries.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("letter not found: {0}")]
    LetterNotFound(String),
    #[error("letter type not found: {0}")]
    LetterTypeNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("invalid block type: '{0}'")]
    InvalidBlockType(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("corrupt database row: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl CoreError {
    /// Map this error onto the stable API error-code catalog.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::LetterNotFound(_) => ErrorCode::LetterNotFound,
            Self::LetterTypeNotFound(_) => ErrorCode::LetterTypeNotFound,
            Self::UserNotFound(_) => ErrorCode::UserNotFound,
            Self::InvalidBlockType(_) => ErrorCode::InvalidBlockType,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Corrupt(_) | Self::Database(_) => ErrorCode::CorruptDatabase,
        }
    }
}
