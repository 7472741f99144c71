//! Serve command: a JSON-lines request loop over stdin and stdout.

use std::io::{BufRead, Write};
use std::panic::{AssertUnwindSafe, catch_unwind};

use camino::Utf8PathBuf;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stopover_core::wire::decode_request;
use stopover_core::{RouteResponse, SolveError, Solver};

use crate::engine::{DefaultSolverBuilder, EngineConfig, SolverBuilder, ValuePolicy};
use crate::fs::require_existing;
use crate::solve::write_reply;
use crate::{
    ARG_CATALOG, ARG_EXACT_THRESHOLD, ARG_MAX_ITERATIONS, ARG_TIME_LIMIT_MS, ARG_VALUE_POLICY,
    CliError, ENV_SERVE_CATALOG,
};

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read one JSON request per line from stdin and write one \
                 JSON reply per line to stdout. Bad requests produce an \
                 error reply and the loop carries on until end of input.",
    about = "Answer a stream of orienteering requests"
)]
#[ortho_config(prefix = "STOPOVER")]
pub(crate) struct ServeArgs {
    /// Path to the stop catalog JSON file.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Largest candidate count searched exactly.
    #[arg(long = ARG_EXACT_THRESHOLD, value_name = "count")]
    #[serde(default)]
    pub(crate) exact_threshold: Option<usize>,
    /// Cap on local-search iterations.
    #[arg(long = ARG_MAX_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_iterations: Option<u64>,
    /// Wall-clock limit per solve in milliseconds.
    #[arg(long = ARG_TIME_LIMIT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
    /// Source of stop values.
    #[arg(long = ARG_VALUE_POLICY, value_enum)]
    #[serde(default)]
    pub(crate) value_policy: Option<ValuePolicy>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServeConfig {
    pub(crate) engine: EngineConfig,
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_SERVE_CATALOG,
        })?;
        Ok(Self {
            engine: EngineConfig::from_options(
                catalog,
                args.exact_threshold,
                args.max_iterations,
                args.time_limit_ms,
                args.value_policy,
            ),
        })
    }
}

pub(crate) fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_serve_with(args, &DefaultSolverBuilder, &mut stdin, &mut stdout).map(|_| ())
}

/// Answer every request line in `reader`; returns the number answered.
///
/// Blank lines are skipped. Each other line gets exactly one reply line,
/// flushed before the next request is read.
pub(crate) fn run_serve_with(
    args: ServeArgs,
    builder: &dyn SolverBuilder,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<u64, CliError> {
    let config = args.into_config()?;
    require_existing(&config.engine.catalog, ARG_CATALOG)?;
    let solver = builder.build(&config.engine)?;
    let mut answered = 0_u64;
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).map_err(CliError::ReadInput)?;
        if read == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let result = answer(solver.as_ref(), &line);
        write_reply(writer, &result)?;
        answered += 1;
    }
    info!("served {answered} requests");
    Ok(answered)
}

/// Decode and solve one line, turning a panic into a computation failure.
fn answer(solver: &dyn Solver, line: &str) -> Result<RouteResponse, SolveError> {
    let request = decode_request(line)?;
    match catch_unwind(AssertUnwindSafe(|| solver.solve(&request))) {
        Ok(result) => result.map(|outcome| outcome.response),
        Err(_) => {
            warn!("solver panicked while answering a request");
            Err(SolveError::internal("the solver panicked"))
        }
    }
}
