// src/error.rs
// =============================================================================
// Typed errors for the snapshot pipeline.
//
// The CLI layer (main.rs) still works with anyhow::Result, but everything
// below it returns SnapshotError so callers can tell a missing repository
// apart from a rate limit or a plain network failure.
//
// Exclusion and ceiling truncation are NOT errors and never show up here.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The URL didn't look like github.com/<owner>/<repo>.
    /// Raised before any remote call is made.
    #[error("Invalid GitHub URL: {0}")]
    InvalidInput(String),

    /// The repository, or a path inside it, does not exist (HTTP 404).
    #[error("Repository or resource not found: {0}")]
    NotFound(String),

    /// HTTP 401/403/429: bad token or the API rate limit was hit.
    #[error("API rate limit exceeded or authentication required ({0})")]
    RateLimitedOrUnauthorized(String),

    /// Any other remote failure (5xx, transport error, bad JSON).
    #[error("Failed to fetch repository data: {0}")]
    Remote(String),

    /// Copying to the system clipboard failed. Fetched data is still valid.
    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(String),

    /// Writing an export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    /// True for the kinds that abort a fetch (everything remote).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SnapshotError::NotFound(_)
                | SnapshotError::RateLimitedOrUnauthorized(_)
                | SnapshotError::Remote(_)
        )
    }
}

impl From<reqwest::Error> for SnapshotError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SnapshotError::Remote("request timed out".to_string())
        } else if e.is_connect() {
            SnapshotError::Remote(format!("connection failed: {}", e))
        } else {
            SnapshotError::Remote(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
