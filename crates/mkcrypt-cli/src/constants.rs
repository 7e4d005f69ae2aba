//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// A printed hash, help or version exits 0. Every failure, whatever its
/// cause, exits with `FAILURE`.
pub mod exit_codes {
    /// Mismatch, too short, salt or terminal error.
    pub const FAILURE: i32 = 1;
}
