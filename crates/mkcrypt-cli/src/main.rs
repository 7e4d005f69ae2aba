//! mkcrypt - read a password twice without echo and print its crypt hash.
//!
//! This is the command-line front end. The prompting, verification and
//! hashing pipeline lives in `mkcrypt-core`.

mod cli;
mod constants;
mod errors;
mod logging;

use std::io::{self, IsTerminal};

use anyhow::Context;

use mkcrypt_core::{Passthrough, Policy, Tty};

use crate::cli::{parse_args, Invocation};
use crate::errors::CliError;

fn main() {
    let cli = match parse_args(std::env::args_os()) {
        Invocation::Run(cli) => cli,
        Invocation::Exit(err) => err.exit(),
    };
    logging::init(cli.verbose);

    // Every sensitive buffer lives inside `run` and is zeroized when it
    // returns, before any exit path below.
    if let Err(err) = run() {
        CliError::from_anyhow(&err).exit()
    }
}

fn run() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    let policy = Policy::default();

    tracing::debug!(interactive, "Reading password");
    if interactive {
        mkcrypt_core::run(&mut Tty::stdin(), &mut input, &mut output, &policy)
            .context("Failed to hash password read from terminal")?;
    } else {
        mkcrypt_core::run(&mut Passthrough, &mut input, &mut output, &policy)
            .context("Failed to hash password read from stdin")?;
    }
    Ok(())
}
