//! `OrienteeringSolver`: strategy selection around the exact and heuristic
//! searches.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use stopover_core::{
    ClaimedMetrics, Diagnostics, RouteRequest, SearchStrategy, SolveError, SolveOutcome, Solver,
    StopGraph, TravelTimeProvider, UnitValue, ValueModel, assemble,
};

use crate::deadline::Deadline;
use crate::exact::{self, MAX_EXACT_CANDIDATES};
use crate::heuristic;
use crate::objective::{Evaluated, Instance, SearchResult};
use crate::reach::Bounds;

/// Default candidate count up to which the exact search runs.
pub const DEFAULT_EXACT_THRESHOLD: usize = 16;

/// Default cap on local-search iterations.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1000;

/// Configuration for [`OrienteeringSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrienteeringSolverConfig {
    /// Largest reachable candidate count searched exactly. Values above
    /// [`MAX_EXACT_CANDIDATES`] are clamped.
    pub exact_threshold: usize,
    /// Upper bound on local-search iterations.
    pub max_iterations: u64,
    /// Wall-clock limit per solve, measured from the start of the call.
    pub time_limit: Option<Duration>,
}

impl Default for OrienteeringSolverConfig {
    fn default() -> Self {
        Self {
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_limit: None,
        }
    }
}

impl OrienteeringSolverConfig {
    /// The threshold actually applied.
    #[must_use]
    pub fn effective_exact_threshold(&self) -> usize {
        self.exact_threshold.min(MAX_EXACT_CANDIDATES)
    }
}

/// Orienteering solver over a duration source and a value model.
///
/// The solver holds no per-request state, so one instance may serve many
/// threads at once.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use stopover_core::{PairwiseTravelTime, RouteRequest, Solver, StopId};
/// use stopover_solver::OrienteeringSolver;
///
/// let legs = PairwiseTravelTime::new(|from: &StopId, to: &StopId| {
///     let secs = match (from.as_str(), to.as_str()) {
///         ("A", "B") | ("B", "A") => 2,
///         ("A", "C") | ("C", "A") => 3,
///         _ => 1,
///     };
///     Ok(Duration::from_secs(secs))
/// });
/// let solver = OrienteeringSolver::new(legs);
/// let outcome = solver.solve(&RouteRequest::new("A", ["B", "C"], 3.0))?;
/// let ids: Vec<&str> = outcome.response.route.iter().map(StopId::as_str).collect();
/// assert_eq!(ids, ["A", "B", "C"]);
/// assert_eq!(outcome.response.total_value, 2.0);
/// assert_eq!(outcome.response.total_duration, Duration::from_secs(3));
/// # Ok::<(), stopover_core::SolveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OrienteeringSolver<T, V = UnitValue>
where
    T: TravelTimeProvider,
    V: ValueModel,
{
    travel_time_provider: T,
    value_model: V,
    config: OrienteeringSolverConfig,
}

impl<T> OrienteeringSolver<T>
where
    T: TravelTimeProvider,
{
    /// Construct a solver counting every candidate as worth one.
    pub fn new(travel_time_provider: T) -> Self {
        Self::with_values(travel_time_provider, UnitValue)
    }
}

impl<T, V> OrienteeringSolver<T, V>
where
    T: TravelTimeProvider,
    V: ValueModel,
{
    /// Construct a solver with an explicit value model and default config.
    pub fn with_values(travel_time_provider: T, value_model: V) -> Self {
        Self::with_config(
            travel_time_provider,
            value_model,
            OrienteeringSolverConfig::default(),
        )
    }

    /// Construct a solver with explicit configuration.
    pub const fn with_config(
        travel_time_provider: T,
        value_model: V,
        config: OrienteeringSolverConfig,
    ) -> Self {
        Self {
            travel_time_provider,
            value_model,
            config,
        }
    }

    fn search(
        &self,
        instance: &Instance<'_>,
        bounds: &Bounds,
        active: &[usize],
        deadline: &Deadline,
    ) -> Result<(SearchStrategy, SearchResult), SolveError> {
        if active.len() <= self.config.effective_exact_threshold() {
            debug!("searching {} candidates exactly", active.len());
            let result = exact::search(instance, bounds, active, deadline)?;
            Ok((SearchStrategy::Exact, result))
        } else {
            debug!("searching {} candidates heuristically", active.len());
            let result =
                heuristic::search(instance, active, deadline, self.config.max_iterations);
            Ok((SearchStrategy::Heuristic, result))
        }
    }
}

impl<T, V> Solver for OrienteeringSolver<T, V>
where
    T: TravelTimeProvider + Send + Sync,
    V: ValueModel,
{
    fn solve_until(
        &self,
        request: &RouteRequest,
        deadline: Option<Instant>,
    ) -> Result<SolveOutcome, SolveError> {
        let started_at = Instant::now();
        let validated = request.validate()?;
        let deadline = Deadline::new(started_at, deadline, self.config.time_limit);
        let graph = StopGraph::build(&validated, &self.travel_time_provider, &self.value_model)?;
        let instance = Instance::new(&graph, &validated);

        let bounds = Bounds::new(&instance);
        let active = if instance.stop_limit() == 0 {
            Vec::new()
        } else {
            bounds.reachable(&instance)
        };
        debug!(
            "{} of {} candidates are reachable within the budget",
            active.len(),
            graph.candidate_count()
        );

        if active.is_empty() {
            let trivial = instance.trivial();
            let response = assemble(&graph, &trivial.route, &validated, claimed(&trivial))?;
            debug!("answered with the trivial route");
            return Ok(SolveOutcome {
                response,
                diagnostics: Diagnostics::trivial(started_at.elapsed()),
            });
        }

        let (strategy, result) = self.search(&instance, &bounds, &active, &deadline)?;
        if result.stopped_early {
            warn!(
                "{} search stopped at the deadline; returning the best route so far",
                strategy.as_str()
            );
        }
        let Some(best) = result.best else {
            return Err(SolveError::ComputationTimeout);
        };

        let response = assemble(&graph, &best.route, &validated, claimed(&best))?;
        let diagnostics = Diagnostics {
            solve_time: started_at.elapsed(),
            candidates_evaluated: u64::try_from(active.len()).unwrap_or(u64::MAX),
            strategy,
            iterations: result.iterations,
            stopped_early: result.stopped_early,
        };
        info!(
            "solved with {} strategy in {:?}: {} stops, value {}",
            strategy.as_str(),
            diagnostics.solve_time,
            response.route.len(),
            response.total_value
        );
        Ok(SolveOutcome {
            response,
            diagnostics,
        })
    }
}

/// Metrics the search claims for `best`, checked again on assembly.
fn claimed(best: &Evaluated) -> ClaimedMetrics {
    ClaimedMetrics {
        value: best.key.value,
        duration: Duration::from_nanos(best.key.duration),
    }
}
