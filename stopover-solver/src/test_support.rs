//! Test-only utilities for `stopover-solver`.
//!
//! The helpers in this module are available to unit tests, behavioural
//! tests and benchmarks. They are gated behind the `test-support` feature
//! (and `cfg(test)`).

use stopover_core::{RouteRequest, StopId};

pub use stopover_core::test_support::{FixedMatrixTravelTimeProvider, UnitTravelTimeProvider};

/// Zero-padded candidate identifiers (`C000`, `C001`, ...) whose byte order
/// matches their number.
#[must_use]
pub fn candidate_ids(count: usize) -> Vec<StopId> {
    (0..count).map(|i| StopId::new(format!("C{i:03}"))).collect()
}

/// A request from start `"S"` over [`candidate_ids`]. `"S"` sorts after
/// every candidate, which exercises the start-first graph layout.
#[must_use]
pub fn numbered_request(count: usize, budget_secs: f64) -> RouteRequest {
    RouteRequest::new("S", candidate_ids(count), budget_secs)
}
