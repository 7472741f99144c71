//! Command-line interface for the Stopover route engine.
//!
//! `stopover solve` answers one request file; `stopover serve` answers a
//! stream of JSON lines. Both load a stop catalog for durations and values.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod engine;
mod error;
mod fs;
mod logging;
mod serve;
mod solve;

pub use engine::ValuePolicy;
pub use error::CliError;
pub use logging::{LOG_ENV, init_logging};

use serve::{ServeArgs, run_serve};
use solve::{SolveArgs, run_solve};

const ARG_SOLVE_REQUEST: &str = "request";
const ARG_CATALOG: &str = "catalog";
const ARG_EXACT_THRESHOLD: &str = "exact-threshold";
const ARG_MAX_ITERATIONS: &str = "max-iterations";
const ARG_TIME_LIMIT_MS: &str = "time-limit-ms";
const ARG_VALUE_POLICY: &str = "value-policy";
const ENV_SOLVE_REQUEST: &str = "STOPOVER_CMDS_SOLVE_REQUEST_PATH";
const ENV_SOLVE_CATALOG: &str = "STOPOVER_CMDS_SOLVE_CATALOG";
const ENV_SERVE_CATALOG: &str = "STOPOVER_CMDS_SERVE_CATALOG";

/// Run the Stopover CLI with the current process arguments and environment.
///
/// `--help` and `--version` print and exit from here.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, an
/// input cannot be read, or a `solve` fails.
pub fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(CliError::ArgumentParsing(err)),
    };
    match cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Serve(args) => run_serve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stopover",
    about = "Pick and order stops that fit a time budget",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one request read from a JSON file.
    Solve(SolveArgs),
    /// Answer JSON-lines requests from stdin.
    Serve(ServeArgs),
}

#[cfg(test)]
mod tests;
