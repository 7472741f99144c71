//! Turn a winning index route into a checked [`RouteResponse`].
//!
//! The assembler never trusts the search: it recomputes both metrics from
//! the graph and refuses to emit a route that breaks any route invariant.

use std::collections::HashSet;
use std::time::Duration;

use log::warn;

use crate::graph::START;
use crate::{RouteResponse, SolveError, StopGraph, ValidatedRequest};

/// Metrics the search engine reports for its route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimedMetrics {
    /// Claimed total value.
    pub value: f64,
    /// Claimed total duration.
    pub duration: Duration,
}

/// Assemble and verify the response for `route`.
///
/// # Errors
/// Returns [`SolveError::Internal`] when the route does not begin at the
/// start, repeats a stop, references an unknown index, exceeds the budget,
/// or when the recomputed metrics differ from `claimed`.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use stopover_core::{
///     ClaimedMetrics, PairwiseTravelTime, RouteRequest, StopGraph, StopId, UnitValue, assemble,
/// };
///
/// let request = RouteRequest::new("A", ["B"], 5.0).validate()?;
/// let provider = PairwiseTravelTime::new(|_: &StopId, _: &StopId| Ok(Duration::from_secs(2)));
/// let graph = StopGraph::build(&request, &provider, &UnitValue)?;
/// let claimed = ClaimedMetrics { value: 1.0, duration: Duration::from_secs(2) };
/// let response = assemble(&graph, &[0, 1], &request, claimed)?;
/// assert_eq!(response.route, vec![StopId::from("A"), StopId::from("B")]);
/// # Ok::<(), stopover_core::SolveError>(())
/// ```
pub fn assemble(
    graph: &StopGraph,
    route: &[usize],
    request: &ValidatedRequest,
    claimed: ClaimedMetrics,
) -> Result<RouteResponse, SolveError> {
    if route.first() != Some(&START) {
        return Err(inconsistent("route does not begin at the start stop"));
    }
    if route.iter().any(|&index| index >= graph.len()) {
        return Err(inconsistent("route references a stop outside the graph"));
    }
    let mut seen = HashSet::with_capacity(route.len());
    if !route.iter().all(|index| seen.insert(*index)) {
        return Err(inconsistent("route visits a stop twice"));
    }

    let total_duration = graph.route_duration(route, request.return_to_start());
    if total_duration > request.budget() {
        return Err(inconsistent("route exceeds the budget"));
    }
    let total_value = graph.route_value(route);
    if total_duration != claimed.duration || total_value.to_bits() != claimed.value.to_bits() {
        return Err(inconsistent("recomputed metrics differ from the search result"));
    }

    Ok(RouteResponse {
        route: graph.route_ids(route),
        total_value,
        total_duration,
    })
}

fn inconsistent(message: &str) -> SolveError {
    warn!("route assembly failed: {message}");
    SolveError::internal(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::test_support::UnitTravelTimeProvider;
    use crate::{RouteRequest, StopId, UnitValue};

    #[fixture]
    fn request() -> ValidatedRequest {
        RouteRequest::new("A", ["B", "C"], 2.0)
            .validate()
            .expect("valid request")
    }

    #[fixture]
    fn graph(request: ValidatedRequest) -> StopGraph {
        StopGraph::build(&request, &UnitTravelTimeProvider, &UnitValue).expect("graph builds")
    }

    fn claim(value: f64, secs: u64) -> ClaimedMetrics {
        ClaimedMetrics {
            value,
            duration: Duration::from_secs(secs),
        }
    }

    #[rstest]
    fn assembles_a_consistent_route(graph: StopGraph, request: ValidatedRequest) {
        let response = assemble(&graph, &[0, 2, 1], &request, claim(2.0, 2)).expect("consistent");
        assert_eq!(
            response.route,
            vec![StopId::from("A"), StopId::from("C"), StopId::from("B")]
        );
        assert_eq!(response.total_value, 2.0);
        assert_eq!(response.total_duration, Duration::from_secs(2));
    }

    #[rstest]
    #[case::wrong_start(vec![1, 0], claim(1.0, 1))]
    #[case::empty(vec![], claim(0.0, 0))]
    #[case::repeat(vec![0, 1, 1], claim(1.0, 1))]
    #[case::out_of_range(vec![0, 7], claim(1.0, 1))]
    #[case::value_mismatch(vec![0, 1], claim(2.0, 1))]
    #[case::duration_mismatch(vec![0, 1], claim(1.0, 2))]
    fn rejects_inconsistent_routes(
        graph: StopGraph,
        request: ValidatedRequest,
        #[case] route: Vec<usize>,
        #[case] claimed: ClaimedMetrics,
    ) {
        let err = assemble(&graph, &route, &request, claimed).expect_err("inconsistent route");
        assert!(matches!(err, SolveError::Internal { .. }));
    }

    #[rstest]
    fn rejects_over_budget_round_trip() {
        let request = RouteRequest::new("A", ["B", "C"], 2.0)
            .with_return_to_start(true)
            .validate()
            .expect("valid request");
        let graph =
            StopGraph::build(&request, &UnitTravelTimeProvider, &UnitValue).expect("graph builds");
        let err = assemble(&graph, &[0, 1, 2], &request, claim(2.0, 3)).expect_err("over budget");
        assert_eq!(err, SolveError::internal("route exceeds the budget"));
    }
}
