//! Diagnostic output on stderr.
//!
//! Stdout carries only prompts and the hash, so logs always go to stderr.
//! Nothing logged anywhere contains password or salt bytes.

use tracing::Level;

/// Install the global subscriber: warnings by default, debug with `-v`.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();
}
