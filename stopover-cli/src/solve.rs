//! Solve command implementation for the Stopover CLI.

use std::io::{Read, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stopover_core::wire::{decode_request, encode_reply};
use stopover_core::{RouteResponse, SolveError};

use crate::engine::{DefaultSolverBuilder, EngineConfig, SolverBuilder, ValuePolicy};
use crate::fs::{open_utf8_file, require_existing};
use crate::{
    ARG_CATALOG, ARG_EXACT_THRESHOLD, ARG_MAX_ITERATIONS, ARG_SOLVE_REQUEST, ARG_TIME_LIMIT_MS,
    ARG_VALUE_POLICY, CliError, ENV_SOLVE_CATALOG, ENV_SOLVE_REQUEST,
};

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve one request read from a JSON file against a stop \
                 catalog. The reply is printed as JSON; a failed solve \
                 prints an error reply and exits non-zero.",
    about = "Solve a single orienteering request"
)]
#[ortho_config(prefix = "STOPOVER")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing the request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
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

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) engine: EngineConfig,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_SOLVE_REQUEST)?;
        require_existing(&self.engine.catalog, ARG_CATALOG)?;
        Ok(())
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;
        let catalog = args.catalog.ok_or(CliError::MissingArgument {
            field: ARG_CATALOG,
            env: ENV_SOLVE_CATALOG,
        })?;
        Ok(Self {
            request_path,
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

pub(crate) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &DefaultSolverBuilder, &mut stdout)
}

/// Solve one request and write its reply.
///
/// Configuration and file errors return before anything is written. Once
/// the request is read, a reply is always written; a failed solve is then
/// also returned as [`CliError::Solve`].
pub(crate) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let payload = read_request(&config.request_path)?;
    let solver = builder.build(&config.engine)?;
    let result: Result<RouteResponse, SolveError> = decode_request(&payload)
        .and_then(|request| solver.solve(&request))
        .map(|outcome| outcome.response);
    write_reply(writer, &result)?;
    result.map(|_| ()).map_err(|source| CliError::Solve { source })
}

/// Read the request file as UTF-8 text.
pub(crate) fn read_request(path: &Utf8Path) -> Result<String, CliError> {
    let read_error = |source: std::io::Error| CliError::ReadRequest {
        path: path.to_path_buf(),
        source,
    };
    let mut file = open_utf8_file(path).map_err(read_error)?;
    let mut payload = String::new();
    file.read_to_string(&mut payload).map_err(read_error)?;
    Ok(payload)
}

pub(crate) fn write_reply(
    writer: &mut dyn Write,
    result: &Result<RouteResponse, SolveError>,
) -> Result<(), CliError> {
    let line = encode_reply(result);
    writer
        .write_all(line.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    writer.flush().map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
