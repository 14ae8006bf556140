// ================================================================
// File: zta-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// Rejected locally before any store access (malformed code, bad input).
    #[error("{0}")]
    Validation(String),

    #[error("Invalid code. Not found.")]
    CodeNotFound,

    #[error("This code has already been claimed!")]
    CodeAlreadyClaimed,

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for the storage-failure class that callers render as a
    /// generic "try again" message.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Io(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Parse(e.to_string())
    }
}
