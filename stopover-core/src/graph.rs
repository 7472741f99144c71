//! Request-scoped stop graph.
//!
//! [`StopGraph`] fixes an index for every stop in a request and stores the
//! complete duration matrix densely. Index `0` is always the start and the
//! candidates follow in ascending [`StopId`] order, so comparing two index
//! sequences gives the same answer as comparing their id sequences.

use std::time::Duration;

use log::debug;

use crate::{SolveError, StopId, StopRole, TravelTimeProvider, ValidatedRequest, ValueModel};

/// Index of the start stop in every [`StopGraph`].
pub const START: usize = 0;

/// Dense duration and value tables for one request.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use stopover_core::{PairwiseTravelTime, RouteRequest, StopGraph, StopId, UnitValue};
///
/// let validated = RouteRequest::new("A", ["C", "B"], 10.0).validate()?;
/// let provider = PairwiseTravelTime::new(|from: &StopId, to: &StopId| {
///     Ok(Duration::from_secs(u64::from(from < to) + 1))
/// });
/// let graph = StopGraph::build(&validated, &provider, &UnitValue)?;
/// assert_eq!(graph.id(1).as_str(), "B");
/// assert_eq!(graph.leg(0, 1), Duration::from_secs(2));
/// assert_eq!(graph.leg(1, 0), Duration::from_secs(1));
/// assert_eq!(graph.route_duration(&[0, 1, 2], false), Duration::from_secs(4));
/// assert_eq!(graph.route_value(&[0, 2, 1]), 2.0);
/// # Ok::<(), stopover_core::SolveError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StopGraph {
    ids: Vec<StopId>,
    values: Vec<f64>,
    legs: Vec<Duration>,
}

impl StopGraph {
    /// Build the graph for a validated request.
    ///
    /// The provider is asked for one matrix covering the start followed by
    /// the candidates. Values are sanitised; self legs are forced to zero.
    ///
    /// # Errors
    /// Returns [`SolveError::UnknownNode`] when the provider cannot resolve a
    /// stop and [`SolveError::Internal`] for any other provider failure or a
    /// matrix with the wrong shape.
    pub fn build<T, V>(
        request: &ValidatedRequest,
        provider: &T,
        values: &V,
    ) -> Result<Self, SolveError>
    where
        T: TravelTimeProvider + ?Sized,
        V: ValueModel + ?Sized,
    {
        let mut ids = Vec::with_capacity(request.candidates().len() + 1);
        ids.push(request.start().clone());
        ids.extend(request.candidates().iter().cloned());
        let n = ids.len();

        let matrix = provider.get_travel_time_matrix(&ids)?;
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            return Err(SolveError::internal(format!(
                "travel time matrix must be {n}x{n}"
            )));
        }

        let mut legs = Vec::with_capacity(n * n);
        for (from, row) in matrix.into_iter().enumerate() {
            legs.extend(
                row.into_iter()
                    .enumerate()
                    .map(|(to, leg)| if from == to { Duration::ZERO } else { leg }),
            );
        }

        let node_values = ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let role = if index == START {
                    StopRole::Start
                } else {
                    StopRole::Candidate
                };
                values.sanitised_value(id, role)
            })
            .collect();

        debug!("built stop graph with {} candidates", n - 1);
        Ok(Self {
            ids,
            values: node_values,
            legs,
        })
    }

    /// Number of nodes, including the start.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false`: a graph contains at least its start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of candidate nodes.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }

    /// Identifier of node `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn id(&self, index: usize) -> &StopId {
        &self.ids[index]
    }

    /// All identifiers in index order.
    #[must_use]
    pub fn ids(&self) -> &[StopId] {
        &self.ids
    }

    /// Sanitised value of node `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Sanitised values in index order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Duration of the leg `from -> to`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[must_use]
    pub fn leg(&self, from: usize, to: usize) -> Duration {
        assert!(to < self.len(), "leg target {to} out of range");
        self.legs[from * self.len() + to]
    }

    /// Index of `id`, if the stop belongs to this graph.
    #[must_use]
    pub fn index_of(&self, id: &StopId) -> Option<usize> {
        let (start, candidates) = self.ids.split_first()?;
        if start == id {
            return Some(START);
        }
        candidates.binary_search(id).ok().map(|pos| pos + 1)
    }

    /// Total duration of `route`, adding the leg back to the start when
    /// `closing` is set. Sums saturate at [`Duration::MAX`].
    ///
    /// # Panics
    /// Panics if the route contains an index out of range.
    #[must_use]
    pub fn route_duration(&self, route: &[usize], closing: bool) -> Duration {
        let open = route
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => Some(self.leg(*from, *to)),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        match route.last() {
            Some(&last) if closing && route.len() > 1 => {
                open.saturating_add(self.leg(last, START))
            }
            _ => open,
        }
    }

    /// Total value of the stops on `route`.
    ///
    /// Candidate values are summed in ascending index order and the start is
    /// added last, so any ordering of the same stops gives the same bits.
    ///
    /// # Panics
    /// Panics if the route contains an index out of range.
    #[must_use]
    pub fn route_value(&self, route: &[usize]) -> f64 {
        let mut visited: Vec<usize> = route.iter().copied().filter(|&i| i != START).collect();
        visited.sort_unstable();
        let candidates = visited.iter().fold(0.0, |acc, &i| acc + self.values[i]);
        if route.contains(&START) {
            candidates + self.values[START]
        } else {
            candidates
        }
    }

    /// Identifiers for an index route.
    ///
    /// # Panics
    /// Panics if the route contains an index out of range.
    #[must_use]
    pub fn route_ids(&self, route: &[usize]) -> Vec<StopId> {
        route.iter().map(|&i| self.ids[i].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::test_support::{FixedMatrixTravelTimeProvider, UnitTravelTimeProvider};
    use crate::{RouteRequest, TravelTimeError, UnitValue, WeightedValue};

    fn secs(matrix: &[&[u64]]) -> Vec<Vec<Duration>> {
        matrix
            .iter()
            .map(|row| row.iter().map(|&s| Duration::from_secs(s)).collect())
            .collect()
    }

    #[fixture]
    fn request() -> ValidatedRequest {
        RouteRequest::new("A", ["C", "B"], 3.0)
            .validate()
            .expect("valid request")
    }

    #[fixture]
    fn graph(request: ValidatedRequest) -> StopGraph {
        // A, B, C with A->B=2, A->C=3, B->C=1, C->B=1.
        let provider =
            FixedMatrixTravelTimeProvider::new(secs(&[&[0, 2, 3], &[2, 0, 1], &[3, 1, 0]]));
        StopGraph::build(&request, &provider, &UnitValue).expect("graph builds")
    }

    #[rstest]
    fn orders_start_then_sorted_candidates(graph: StopGraph) {
        let ids: Vec<&str> = graph.ids().iter().map(StopId::as_str).collect();
        assert_eq!(ids, ["A", "B", "C"]);
        assert_eq!(graph.index_of(&StopId::from("C")), Some(2));
        assert_eq!(graph.index_of(&StopId::from("A")), Some(START));
        assert_eq!(graph.index_of(&StopId::from("Z")), None);
    }

    #[rstest]
    fn computes_route_metrics(graph: StopGraph) {
        assert_eq!(graph.route_duration(&[0, 1, 2], false), Duration::from_secs(3));
        assert_eq!(graph.route_duration(&[0, 1, 2], true), Duration::from_secs(6));
        assert_eq!(graph.route_duration(&[0], true), Duration::ZERO);
        assert_eq!(graph.route_value(&[0, 1, 2]), 2.0);
        assert_eq!(graph.route_value(&[0]), 0.0);
    }

    #[rstest]
    fn forces_self_legs_to_zero(request: ValidatedRequest) {
        let provider =
            FixedMatrixTravelTimeProvider::new(secs(&[&[9, 2, 3], &[2, 9, 1], &[3, 1, 9]]));
        let graph = StopGraph::build(&request, &provider, &UnitValue).expect("graph builds");
        assert!((0..graph.len()).all(|i| graph.leg(i, i) == Duration::ZERO));
    }

    #[rstest]
    fn rejects_wrongly_shaped_matrices(request: ValidatedRequest) {
        let provider = FixedMatrixTravelTimeProvider::new(secs(&[&[0, 1], &[1, 0]]));
        let err = StopGraph::build(&request, &provider, &UnitValue).expect_err("shape mismatch");
        assert!(matches!(err, SolveError::Internal { .. }));
    }

    #[rstest]
    fn maps_unknown_stops(request: ValidatedRequest) {
        struct Unknown;
        impl TravelTimeProvider for Unknown {
            fn get_travel_time_matrix(
                &self,
                _stops: &[StopId],
            ) -> Result<crate::TravelTimeMatrix, TravelTimeError> {
                Err(TravelTimeError::UnknownStop {
                    id: StopId::from("C"),
                })
            }
        }
        let err = StopGraph::build(&request, &Unknown, &UnitValue).expect_err("unknown stop");
        assert_eq!(
            err,
            SolveError::UnknownNode {
                id: StopId::from("C")
            }
        );
    }

    #[rstest]
    fn sanitises_and_counts_weighted_start(request: ValidatedRequest) {
        let model = WeightedValue::new([("A", 0.5), ("B", f64::NAN)]);
        let graph =
            StopGraph::build(&request, &UnitTravelTimeProvider, &model).expect("graph builds");
        assert_eq!(graph.values(), &[0.5, 0.0, 1.0]);
        assert_eq!(graph.route_value(&[0, 2]), 1.5);
    }

    #[rstest]
    fn value_is_order_independent() {
        let validated = RouteRequest::new("S", ["a", "b", "c", "d"], 1.0)
            .validate()
            .expect("valid request");
        let model = WeightedValue::new([("a", 0.1), ("b", 0.2), ("c", 0.3), ("d", 1e-17)]);
        let graph = StopGraph::build(&validated, &UnitTravelTimeProvider, &model)
            .expect("graph builds");
        let forward = graph.route_value(&[0, 1, 2, 3, 4]);
        let backward = graph.route_value(&[0, 4, 3, 2, 1]);
        assert_eq!(forward.to_bits(), backward.to_bits());
    }
}
