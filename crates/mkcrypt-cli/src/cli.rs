use std::ffi::OsString;

use clap::{CommandFactory, Parser};

/// Read a password from a prompt, verify it, then hash it with sha512-crypt
/// and print the result to stdout.
#[derive(Parser, Debug, Default)]
#[command(name = "mkcrypt")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true, infer_long_args = true)]
#[command(after_help = "All other options are ignored.")]
pub struct Cli {
    /// Log pipeline stages to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What `main` should do after looking at the command line.
#[derive(Debug)]
pub enum Invocation {
    /// Prompt and hash.
    Run(Cli),
    /// Help was requested; print it and exit.
    Exit(clap::Error),
}

/// Parse the command line, dropping options mkcrypt does not know.
///
/// Unknown long options, unknown letters inside a short cluster, and
/// positional arguments are removed before clap sees them, so
/// `mkcrypt --frobnicate -h` still shows help. A long option may be
/// abbreviated to any unambiguous prefix (`--he`).
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = Cli::command();
    command.build();

    let known_longs: Vec<String> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long().map(str::to_string))
        .collect();
    let known_shorts: Vec<char> = command
        .get_arguments()
        .filter_map(|arg| arg.get_short())
        .collect();

    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    for arg in args {
        let Some(text) = arg.to_str() else {
            continue;
        };
        if text == "--" {
            break;
        }
        if let Some(long) = text.strip_prefix("--") {
            let name = long.split('=').next().unwrap_or(long);
            if let Some(known) = match_long(&known_longs, name) {
                kept.push(OsString::from(format!("--{}", known)));
            }
        } else if let Some(cluster) = text.strip_prefix('-') {
            let shorts: String = cluster
                .chars()
                .filter(|c| known_shorts.contains(c))
                .collect();
            if !shorts.is_empty() {
                kept.push(OsString::from(format!("-{}", shorts)));
            }
        }
    }

    match Cli::try_parse_from(kept) {
        Ok(cli) => Invocation::Run(cli),
        Err(err) if !err.use_stderr() => Invocation::Exit(err),
        Err(_) => Invocation::Run(Cli::default()),
    }
}

/// The known long option `name` spells out exactly, or abbreviates
/// unambiguously.
fn match_long<'a>(known_longs: &'a [String], name: &str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    if let Some(exact) = known_longs.iter().find(|known| *known == name) {
        return Some(exact.as_str());
    }
    let mut candidates = known_longs.iter().filter(|known| known.starts_with(name));
    match (candidates.next(), candidates.next()) {
        (Some(only), None) => Some(only.as_str()),
        _ => None,
    }
}
