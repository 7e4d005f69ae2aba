//! # mkcrypt core
//!
//! Reads a password twice from the terminal without echo, checks the two
//! entries agree and meet the length policy, and hashes the result with a
//! fresh random salt.
//!
//! ## Architecture
//!
//! - **terminal**: scoped echo suppression (`EchoGuard`)
//! - **buffer**: fixed-capacity, self-zeroizing `SensitiveBuffer`
//! - **reader**: one-line secret reads with in-place trimming
//! - **verify**: confirmation and minimum-length checks
//! - **crypto**: salt generation, hashing, verification
//! - **pipeline**: the `Session` state machine tying the stages together

pub mod buffer;
pub mod config;
pub mod crypto;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod terminal;
pub mod verify;

pub use buffer::{SensitiveBuffer, MAX_LEN};
pub use config::Policy;
pub use crypto::{generate_salt, hash, verify_hash, HashResult, Salt, SaltSpec, Scheme};
pub use error::{MkcryptError, Result};
pub use pipeline::{run, Session, Stage};
pub use terminal::{EchoControl, EchoGuard, Passthrough, TerminalState, Tty};
pub use verify::MIN_LEN;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
