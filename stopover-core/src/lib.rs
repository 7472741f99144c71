//! Core domain types for the Stopover route engine.
//!
//! The crate defines the request/response contract, the duration and value
//! seams the search engine consumes, and the request-scoped
//! [`StopGraph`] that the engine searches over. Search strategies live in
//! separate crates and implement the [`Solver`] trait.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use stopover_core::{PairwiseTravelTime, RouteRequest, StopGraph, StopId, UnitValue};
//!
//! let request = RouteRequest::new("A", ["B", "C"], 10.0);
//! let validated = request.validate()?;
//! let provider = PairwiseTravelTime::new(|_from: &StopId, _to: &StopId| {
//!     Ok(Duration::from_secs(2))
//! });
//! let graph = StopGraph::build(&validated, &provider, &UnitValue)?;
//! assert_eq!(graph.candidate_count(), 2);
//! # Ok::<(), stopover_core::SolveError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assemble;
pub mod catalog;
pub mod graph;
pub mod request;
pub mod route;
pub mod solver;
pub mod stop;
pub mod travel_time;
pub mod value;

#[cfg(feature = "serde")]
mod duration_secs;
#[cfg(feature = "serde")]
pub mod wire;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use assemble::{ClaimedMetrics, assemble};
pub use catalog::{CatalogError, CatalogStop, StopCatalog};
pub use graph::StopGraph;
pub use request::{RequestValidationError, RouteRequest, ValidatedRequest};
pub use route::RouteResponse;
pub use solver::{Diagnostics, SearchStrategy, SolveError, SolveOutcome, Solver};
pub use stop::{StopId, StopRole};
pub use travel_time::{PairwiseTravelTime, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};
pub use value::{UnitValue, ValueModel, WeightedValue, sanitise_value};
