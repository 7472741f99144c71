//! Search-side view of a request: integer durations and the route ordering.
//!
//! Durations are exact nanosecond counts so feasibility never depends on
//! floating-point rounding. Values are compared with `f64::total_cmp`; every
//! value is finite and non-negative by the time it reaches the search.

use std::cmp::Ordering;
use std::time::Duration;

use stopover_core::graph::START;
use stopover_core::{StopGraph, ValidatedRequest};

/// Convert a duration to nanoseconds, saturating at `u64::MAX`.
pub(crate) fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Dense integer tables for one solve.
#[derive(Debug)]
pub(crate) struct Instance<'g> {
    graph: &'g StopGraph,
    nodes: usize,
    legs: Vec<u64>,
    budget: u64,
    closing: bool,
    stop_limit: usize,
}

impl<'g> Instance<'g> {
    pub(crate) fn new(graph: &'g StopGraph, request: &ValidatedRequest) -> Self {
        let nodes = graph.len();
        let legs = (0..nodes)
            .flat_map(|from| (0..nodes).map(move |to| (from, to)))
            .map(|(from, to)| nanos(graph.leg(from, to)))
            .collect();
        Self {
            graph,
            nodes,
            legs,
            budget: nanos(request.budget()),
            closing: request.return_to_start(),
            stop_limit: request.stop_limit(graph.candidate_count()),
        }
    }

    pub(crate) const fn graph(&self) -> &'g StopGraph {
        self.graph
    }

    pub(crate) const fn nodes(&self) -> usize {
        self.nodes
    }

    pub(crate) const fn budget(&self) -> u64 {
        self.budget
    }

    pub(crate) const fn closing(&self) -> bool {
        self.closing
    }

    pub(crate) const fn stop_limit(&self) -> usize {
        self.stop_limit
    }

    /// Leg duration in nanoseconds; indices outside the graph are unusable.
    pub(crate) fn leg(&self, from: usize, to: usize) -> u64 {
        if from >= self.nodes || to >= self.nodes {
            return u64::MAX;
        }
        self.legs
            .get(from * self.nodes + to)
            .copied()
            .unwrap_or(u64::MAX)
    }

    /// Sanitised value of `node`.
    pub(crate) fn value(&self, node: usize) -> f64 {
        self.graph.values().get(node).copied().unwrap_or(0.0)
    }

    /// Leg from `last` back to the start when the route closes, else zero.
    pub(crate) fn closing_leg(&self, last: usize) -> u64 {
        if self.closing && last != START {
            self.leg(last, START)
        } else {
            0
        }
    }

    /// Exact duration of `route`, including the closing leg.
    pub(crate) fn route_duration(&self, route: &[usize]) -> u64 {
        let open = route
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(self.leg(*from, *to)),
                _ => None,
            })
            .fold(0_u64, u64::saturating_add);
        route
            .last()
            .map_or(open, |&last| open.saturating_add(self.closing_leg(last)))
    }

    /// Canonical key of `route`.
    pub(crate) fn key(&self, route: &[usize]) -> RouteKey {
        RouteKey {
            value: self.graph.route_value(route),
            duration: self.route_duration(route),
        }
    }

    /// The route holding only the start.
    pub(crate) fn trivial(&self) -> Evaluated {
        let route = vec![START];
        let key = self.key(&route);
        Evaluated { route, key }
    }

    /// Evaluate a route from scratch.
    pub(crate) fn evaluate(&self, route: Vec<usize>) -> Evaluated {
        let key = self.key(&route);
        Evaluated { route, key }
    }
}

/// Objective of a route: collected value and exact duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RouteKey {
    pub(crate) value: f64,
    pub(crate) duration: u64,
}

impl RouteKey {
    /// `Ordering::Less` when `self` is preferred over `other`.
    ///
    /// Higher value first, then lower duration.
    pub(crate) fn preference(&self, other: &Self) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then_with(|| self.duration.cmp(&other.duration))
    }
}

/// A route with its canonical key.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Evaluated {
    pub(crate) route: Vec<usize>,
    pub(crate) key: RouteKey,
}

impl Evaluated {
    /// `Ordering::Less` when `self` is preferred; the final tie-break is
    /// the lexicographically smaller index sequence.
    pub(crate) fn preference(&self, other: &Self) -> Ordering {
        self.key
            .preference(&other.key)
            .then_with(|| self.route.cmp(&other.route))
    }

    pub(crate) fn is_better_than(&self, other: &Self) -> bool {
        self.preference(other) == Ordering::Less
    }
}

/// Best route a strategy found and how far it got.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchResult {
    /// `None` only if no feasible route was confirmed.
    pub(crate) best: Option<Evaluated>,
    pub(crate) iterations: u64,
    pub(crate) stopped_early: bool,
}
