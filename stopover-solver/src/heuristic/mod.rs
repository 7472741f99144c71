//! Anytime heuristic for candidate sets too large to search exactly.
//!
//! Greedy insertion builds a feasible route, then local search improves it.
//! Both phases check the deadline between steps, so the current route is a
//! valid answer whenever the search stops.

mod local_search;
mod moves;

use std::cmp::Ordering;

use log::debug;
use stopover_core::graph::START;

use crate::deadline::Deadline;
use crate::objective::{Instance, SearchResult};
use local_search::{Stop, improve};
use moves::Deltas;

/// Run construction followed by local search over `active` candidates.
pub(crate) fn search(
    instance: &Instance<'_>,
    active: &[usize],
    deadline: &Deadline,
    max_iterations: u64,
) -> SearchResult {
    let (route, construction_cut) = construct(instance, active, deadline);
    let constructed = instance.evaluate(route);
    if constructed.key.duration > instance.budget() {
        log::warn!("greedy construction produced an infeasible route; falling back to the start");
        return SearchResult {
            best: Some(instance.trivial()),
            iterations: 0,
            stopped_early: construction_cut,
        };
    }
    debug!(
        "greedy construction visited {} of {} candidates",
        constructed.route.len().saturating_sub(1),
        active.len()
    );
    if construction_cut {
        return SearchResult {
            best: Some(constructed),
            iterations: 0,
            stopped_early: true,
        };
    }
    let (best, iterations, stop) = improve(instance, active, constructed, deadline, max_iterations);
    debug!("local search applied {iterations} moves and stopped at {stop:?}");
    SearchResult {
        best: Some(best),
        iterations,
        stopped_early: stop == Stop::Deadline,
    }
}

/// A candidate insertion during construction.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Insertion {
    node: usize,
    position: usize,
    value: f64,
    added: i128,
    ratio: f64,
}

impl Insertion {
    /// Best value per added duration first; a non-positive addition is an
    /// infinite ratio. Ties go to higher value, smaller addition, then the
    /// lower node and position.
    fn preference(&self, other: &Self) -> Ordering {
        other
            .ratio
            .total_cmp(&self.ratio)
            .then_with(|| other.value.total_cmp(&self.value))
            .then_with(|| self.added.cmp(&other.added))
            .then_with(|| self.node.cmp(&other.node))
            .then_with(|| self.position.cmp(&other.position))
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "insertion ranking divides a value by a duration"
)]
fn ratio(value: f64, added: i128) -> f64 {
    if added <= 0 {
        f64::INFINITY
    } else {
        value / added as f64
    }
}

/// Greedy insertion; returns the route and whether the deadline cut it short.
fn construct(instance: &Instance<'_>, active: &[usize], deadline: &Deadline) -> (Vec<usize>, bool) {
    let mut route = vec![START];
    let mut duration = 0_i128;
    let budget = i128::from(instance.budget());
    loop {
        if route.len().saturating_sub(1) >= instance.stop_limit() {
            return (route, false);
        }
        if deadline.expired() {
            return (route, true);
        }
        let deltas = Deltas::new(instance, &route);
        let mut best: Option<Insertion> = None;
        for &node in active.iter().filter(|node| !route.contains(node)) {
            let value = instance.value(node);
            for position in 1..=route.len() {
                let added = deltas.insertion(node, position);
                if duration + added > budget || (value <= 0.0 && added >= 0) {
                    continue;
                }
                let insertion = Insertion {
                    node,
                    position,
                    value,
                    added,
                    ratio: ratio(value, added),
                };
                if best
                    .as_ref()
                    .is_none_or(|incumbent| insertion.preference(incumbent).is_lt())
                {
                    best = Some(insertion);
                }
            }
        }
        let Some(chosen) = best else {
            return (route, false);
        };
        route.insert(chosen.position, chosen.node);
        duration += chosen.added;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stopover_core::test_support::{FixedMatrixTravelTimeProvider, UnitTravelTimeProvider};
    use stopover_core::{RouteRequest, StopGraph, UnitValue, WeightedValue};

    #[rstest]
    fn construction_prefers_value_density() {
        let request = RouteRequest::new("A", ["B", "C"], 4.0)
            .validate()
            .expect("valid request");
        let provider = FixedMatrixTravelTimeProvider::from_seconds(vec![
            vec![0, 1, 4],
            vec![1, 0, 9],
            vec![4, 9, 0],
        ]);
        // C is worth more but B is worth more per second.
        let values = WeightedValue::new([("B", 1.0), ("C", 2.0)]);
        let graph = StopGraph::build(&request, &provider, &values).expect("graph builds");
        let instance = Instance::new(&graph, &request);
        let (route, cut) = construct(&instance, &[1, 2], &Deadline::none());
        assert_eq!(route, vec![0, 1]);
        assert!(!cut);
    }

    #[rstest]
    fn local_search_recovers_from_greedy_choice() {
        let request = RouteRequest::new("A", ["B", "C"], 4.0)
            .validate()
            .expect("valid request");
        let provider = FixedMatrixTravelTimeProvider::from_seconds(vec![
            vec![0, 1, 4],
            vec![1, 0, 9],
            vec![4, 9, 0],
        ]);
        let values = WeightedValue::new([("B", 1.0), ("C", 2.0)]);
        let graph = StopGraph::build(&request, &provider, &values).expect("graph builds");
        let instance = Instance::new(&graph, &request);
        let result = search(&instance, &[1, 2], &Deadline::none(), 100);
        assert_eq!(result.best.map(|best| best.route), Some(vec![0, 2]));
        assert!(!result.stopped_early);
    }

    #[rstest]
    fn skips_worthless_stops_that_cost_time() {
        let request = RouteRequest::new("A", ["B", "C"], 10.0)
            .validate()
            .expect("valid request");
        let values = WeightedValue::new([("B", 0.0)]);
        let graph =
            StopGraph::build(&request, &UnitTravelTimeProvider, &values).expect("graph builds");
        let instance = Instance::new(&graph, &request);
        let (route, _) = construct(&instance, &[1, 2], &Deadline::none());
        assert_eq!(route, vec![0, 2]);
    }

    #[rstest]
    fn expired_deadline_keeps_a_feasible_route() {
        let request = RouteRequest::new("A", ["B", "C"], 10.0)
            .validate()
            .expect("valid request");
        let graph =
            StopGraph::build(&request, &UnitTravelTimeProvider, &UnitValue).expect("graph builds");
        let instance = Instance::new(&graph, &request);
        let now = std::time::Instant::now();
        let result = search(&instance, &[1, 2], &Deadline::new(now, Some(now), None), 100);
        assert!(result.stopped_early);
        assert_eq!(result.best.map(|best| best.route), Some(vec![0]));
    }
}
