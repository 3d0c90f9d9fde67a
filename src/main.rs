//! kbsync - mirror a markdown vault into a remote knowledge base
//!
//! Uploads only the documents that changed since the last successful sync,
//! tracking what was sent in a ledger file inside the vault.

mod cli;
mod commands;

use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use kbsync_core::error::KbsyncError;
use kbsync_core::logging;

fn main() -> ExitCode {
    let start = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if wants_json(std::env::args().skip(1)) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => return fail(&usage_error(&err), OutputFormat::Json, false),
        },
        Err(err) => err.exit(),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    tracing::debug!(elapsed = ?start.elapsed(), "parse_args");

    match commands::dispatch::run(&cli, start) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, cli.format, cli.quiet),
    }
}

/// Map a clap failure onto the error envelope used for `--format json`
fn usage_error(err: &clap::Error) -> KbsyncError {
    match err.kind() {
        ErrorKind::ValueValidation
        | ErrorKind::InvalidValue
        | ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::ArgumentConflict => KbsyncError::UsageError(err.to_string()),
        _ => KbsyncError::Other(err.to_string()),
    }
}

fn fail(error: &KbsyncError, format: OutputFormat, quiet: bool) -> ExitCode {
    match format {
        OutputFormat::Json => eprintln!("{}", error.to_json()),
        OutputFormat::Human if !quiet => eprintln!("error: {}", error),
        OutputFormat::Human => {}
    }
    ExitCode::from(error.exit_code() as u8)
}

/// Whether raw arguments ask for JSON output; consulted only when clap fails
fn wants_json(args: impl Iterator<Item = String>) -> bool {
    let mut previous_was_flag = false;
    for arg in args {
        if arg == "--format=json" || (previous_was_flag && arg == "json") {
            return true;
        }
        previous_was_flag = arg == "--format";
    }
    false
}
