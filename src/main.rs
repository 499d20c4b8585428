//! Binary entry point: parse the command line, set up logging, run one ledger
//! operation and turn its outcome into an exit code.
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use time_tracking::cli::{self, normalize_legacy_flags, Cli};
use time_tracking::{ledger_error, logging};

/// Domain conditions (unknown project, bad date, declined prompt) are printed
/// to stdout and end the run successfully. Only infrastructure failures such
/// as an unreadable database exit non-zero.
fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));
    logging::init(cli.verbose);

    let mut stdout = io::stdout().lock();
    match cli::run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match ledger_error(&err) {
            Some(reported) => {
                tracing::debug!(error = %reported, "operation reported a condition");
                if writeln!(stdout, "{reported}").is_err() {
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
