//! The search-engine seam: the `Solver` trait, its outcome and its errors.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::{RequestValidationError, RouteRequest, RouteResponse, StopId, TravelTimeError};

/// Strategy a solver used to answer a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Nothing could be visited, so the route is just the start.
    Trivial,
    /// Exhaustive subset dynamic programming.
    Exact,
    /// Greedy construction followed by local search.
    Heuristic,
}

impl SearchStrategy {
    /// Lowercase label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Exact => "exact",
            Self::Heuristic => "heuristic",
        }
    }
}

/// Diagnostic information about a solve run.
///
/// Diagnostics are for logs and metrics only and never enter the wire reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// Wall-clock time spent solving.
    pub solve_time: Duration,
    /// Candidates left after reachability pruning.
    pub candidates_evaluated: u64,
    /// Strategy that produced the route.
    pub strategy: SearchStrategy,
    /// DP layers completed or local-search iterations applied.
    pub iterations: u64,
    /// `true` when a deadline cut the search short.
    pub stopped_early: bool,
}

impl Diagnostics {
    /// Diagnostics for a request answered without searching.
    #[must_use]
    pub const fn trivial(solve_time: Duration) -> Self {
        Self {
            solve_time,
            candidates_evaluated: 0,
            strategy: SearchStrategy::Trivial,
            iterations: 0,
            stopped_early: false,
        }
    }
}

/// A route together with how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// The assembled route.
    pub response: RouteResponse,
    /// Solve-time diagnostics.
    pub diagnostics: Diagnostics,
}

/// Errors returned by [`Solver::solve`].
///
/// An infeasible budget is not an error: it yields the trivial route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The request was malformed or failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] RequestValidationError),
    /// A stop id could not be resolved by the duration source.
    #[error("unknown node: {id}")]
    UnknownNode {
        /// The unresolved identifier.
        id: StopId,
    },
    /// The deadline passed before any feasible route was confirmed.
    #[error("computation timed out before a feasible route was confirmed")]
    ComputationTimeout,
    /// The duration source or the search failed for another reason.
    #[error("computation failed: {message}")]
    Internal {
        /// Human-readable detail.
        message: String,
    },
}

impl SolveError {
    /// Build an [`SolveError::Internal`] from any displayable detail.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same request with a larger deadline could help.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ComputationTimeout)
    }
}

impl From<TravelTimeError> for SolveError {
    fn from(err: TravelTimeError) -> Self {
        match err {
            TravelTimeError::UnknownStop { id } => Self::UnknownNode { id },
            other => Self::internal(other.to_string()),
        }
    }
}

/// Find the best route satisfying a request's budget.
///
/// Implementations validate the request themselves and must be `Send + Sync`
/// so one solver can serve concurrent requests.
pub trait Solver: Send + Sync {
    /// Solve a request, stopping the search at `deadline` if one is given.
    ///
    /// # Errors
    /// See [`SolveError`].
    fn solve_until(
        &self,
        request: &RouteRequest,
        deadline: Option<Instant>,
    ) -> Result<SolveOutcome, SolveError>;

    /// Solve a request without an external deadline.
    ///
    /// # Errors
    /// See [`SolveError`].
    fn solve(&self, request: &RouteRequest) -> Result<SolveOutcome, SolveError> {
        self.solve_until(request, None)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve_until(
        &self,
        request: &RouteRequest,
        deadline: Option<Instant>,
    ) -> Result<SolveOutcome, SolveError> {
        (**self).solve_until(request, deadline)
    }
}

impl<S: Solver + ?Sized> Solver for std::sync::Arc<S> {
    fn solve_until(
        &self,
        request: &RouteRequest,
        deadline: Option<Instant>,
    ) -> Result<SolveOutcome, SolveError> {
        (**self).solve_until(request, deadline)
    }
}
