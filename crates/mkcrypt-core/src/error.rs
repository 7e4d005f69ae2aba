//! Error types for mkcrypt core operations.
//!
//! Every variant is terminal for the current run. The CLI layer maps them
//! to a single message and a non-zero exit status.

use thiserror::Error;

/// Result type alias for mkcrypt operations.
pub type Result<T> = std::result::Result<T, MkcryptError>;

/// Core error type for mkcrypt operations.
#[derive(Debug, Error)]
pub enum MkcryptError {
    /// Terminal attributes could not be queried or applied
    #[error("Terminal unavailable: {0}")]
    TerminalUnavailable(String),

    /// Password and confirmation differ
    #[error("Passwords are different, please try again.")]
    ConfirmationMismatch,

    /// Password shorter than the policy minimum (empty input included)
    #[error("Password must be at least {min_len} characters long")]
    PolicyViolation { min_len: usize },

    /// Salt could not be produced by the hashing primitive
    #[error("{0}")]
    SaltGenerationFailed(String),

    /// The hashing primitive rejected a generated salt
    #[error("Hashing failed: {0}")]
    Hash(String),

    /// Prompt or output I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
