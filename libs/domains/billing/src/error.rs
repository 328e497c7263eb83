use thiserror::Error;

/// Result type for session store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a session store backend
///
/// The session controller never propagates these: loads fall back to
/// defaults and saves are fire-and-forget, with failures logged.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file-backed stores)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be decoded
    #[error("Malformed stored state: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Store backend error: {0}")]
    Backend(String),
}
