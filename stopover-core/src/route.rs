//! Routes returned to callers.

use std::time::Duration;

use crate::StopId;

/// An ordered route from the start with its recomputed metrics.
///
/// `total_duration` serialises as seconds.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use stopover_core::{RouteResponse, StopId};
///
/// let response = RouteResponse::trivial(StopId::from("DFW"), 0.0);
/// assert_eq!(response.route, vec![StopId::from("DFW")]);
/// assert_eq!(response.total_duration, Duration::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResponse {
    /// Stops visited in order; the first is always the start.
    pub route: Vec<StopId>,
    /// Sum of the values of the visited stops.
    pub total_value: f64,
    /// Sum of traversed leg durations.
    #[cfg_attr(feature = "serde", serde(with = "crate::duration_secs"))]
    pub total_duration: Duration,
}

impl RouteResponse {
    /// The route that only contains the start.
    #[must_use]
    pub fn trivial(start: StopId, start_value: f64) -> Self {
        Self {
            route: vec![start],
            total_value: start_value,
            total_duration: Duration::ZERO,
        }
    }

    /// Number of candidate stops visited, excluding the start.
    #[must_use]
    pub fn visited_candidates(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}
