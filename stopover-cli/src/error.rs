//! Error types emitted by the Stopover CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stopover_core::{CatalogError, SolveError};
use thiserror::Error;

/// Errors emitted by the Stopover CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the stop catalog failed.
    #[error("failed to open stop catalog at {path:?}: {source}")]
    OpenCatalog {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The stop catalog could not be decoded or failed validation.
    #[error("stop catalog in {path:?} is invalid: {source}")]
    InvalidCatalog {
        path: Utf8PathBuf,
        #[source]
        source: CatalogError,
    },
    /// Reading the request file failed.
    #[error("failed to read request at {path:?}: {source}")]
    ReadRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The solver rejected the request. The error reply has already been
    /// written.
    #[error("solver failed: {source}")]
    Solve { source: SolveError },
    /// Reading request lines failed.
    #[error("failed to read requests: {0}")]
    ReadInput(#[source] std::io::Error),
    /// Writing a reply failed.
    #[error("failed to write reply: {0}")]
    WriteOutput(#[source] std::io::Error),
}
