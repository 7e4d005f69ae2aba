//! CLI error types for structured error handling.
//!
//! Core errors are grouped by who can fix them, each mapped to an exit code.
//! Every message fits on one line.

use std::fmt;

use mkcrypt_core::MkcryptError;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// The entered password was rejected (mismatch, too short)
    Rejected(String),

    /// The terminal could not be controlled
    Terminal(String),

    /// Salt generation or hashing failed, or output could not be written
    Internal(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Rejected(message) => write!(f, "{}", message),
            CliError::Terminal(message) => {
                write!(f, "{} (run from a terminal or pipe input on stdin)", message)
            }
            CliError::Internal(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<&MkcryptError> for CliError {
    fn from(err: &MkcryptError) -> Self {
        match err {
            MkcryptError::ConfirmationMismatch | MkcryptError::PolicyViolation { .. } => {
                CliError::Rejected(err.to_string())
            }
            MkcryptError::TerminalUnavailable(_) => CliError::Terminal(err.to_string()),
            MkcryptError::SaltGenerationFailed(_)
            | MkcryptError::Hash(_)
            | MkcryptError::Io(_) => CliError::Internal(err.to_string()),
        }
    }
}

impl CliError {
    /// Map any error escaping `run` onto a CLI error.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<MkcryptError>() {
            Some(core) => CliError::from(core),
            None => CliError::Internal(format!("{:#}", err)),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::Rejected(_) | CliError::Terminal(_) | CliError::Internal(_) => {
                exit_codes::FAILURE
            }
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}
