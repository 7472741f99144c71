//! Engine options shared by `solve` and `serve`, and solver construction.

use std::io::BufReader;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use stopover_core::{Solver, StopCatalog, UnitValue};
use stopover_solver::{OrienteeringSolver, OrienteeringSolverConfig};

use crate::CliError;
use crate::fs::open_utf8_file;

/// Where stop values come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Every candidate is worth one; the route maximises the stop count.
    #[default]
    Unit,
    /// Values listed in the catalog, including the start's.
    Catalog,
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EngineConfig {
    /// Path to the stop catalog JSON file.
    pub(crate) catalog: Utf8PathBuf,
    /// Value source for stops.
    pub(crate) value_policy: ValuePolicy,
    /// Solver tuning.
    pub(crate) solver: OrienteeringSolverConfig,
}

impl EngineConfig {
    /// Combine merged option values with solver defaults.
    pub(crate) fn from_options(
        catalog: Utf8PathBuf,
        exact_threshold: Option<usize>,
        max_iterations: Option<u64>,
        time_limit_ms: Option<u64>,
        value_policy: Option<ValuePolicy>,
    ) -> Self {
        let defaults = OrienteeringSolverConfig::default();
        Self {
            catalog,
            value_policy: value_policy.unwrap_or_default(),
            solver: OrienteeringSolverConfig {
                exact_threshold: exact_threshold.unwrap_or(defaults.exact_threshold),
                max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
                time_limit: time_limit_ms.map(Duration::from_millis),
            },
        }
    }
}

/// Builds a solver instance for the current invocation.
pub(crate) trait SolverBuilder {
    fn build(&self, config: &EngineConfig) -> Result<Box<dyn Solver>, CliError>;
}

/// Builds an [`OrienteeringSolver`] over the configured catalog.
pub(crate) struct DefaultSolverBuilder;

impl SolverBuilder for DefaultSolverBuilder {
    fn build(&self, config: &EngineConfig) -> Result<Box<dyn Solver>, CliError> {
        let catalog = load_catalog(&config.catalog)?;
        log::debug!(
            "loaded {} stops from {}; values from {:?}",
            catalog.len(),
            config.catalog,
            config.value_policy
        );
        let solver: Box<dyn Solver> = match config.value_policy {
            ValuePolicy::Unit => Box::new(OrienteeringSolver::with_config(
                catalog,
                UnitValue,
                config.solver.clone(),
            )),
            ValuePolicy::Catalog => {
                let values = catalog.value_model();
                Box::new(OrienteeringSolver::with_config(
                    catalog,
                    values,
                    config.solver.clone(),
                ))
            }
        };
        Ok(solver)
    }
}

/// Load and validate a JSON stop catalog.
pub(crate) fn load_catalog(path: &Utf8Path) -> Result<StopCatalog, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenCatalog {
        path: path.to_path_buf(),
        source,
    })?;
    StopCatalog::from_reader(BufReader::new(file)).map_err(|source| CliError::InvalidCatalog {
        path: path.to_path_buf(),
        source,
    })
}
