//! Compute travel durations between stops.
//!
//! The `TravelTimeProvider` trait abstracts the retrieval of pairwise travel
//! durations between [`StopId`](crate::StopId) values. Callers supply a slice
//! of stops and receive an adjacency matrix of
//! [`Duration`](std::time::Duration) values.
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice, or when
//! a stop cannot be resolved by the backing source.

mod error;
mod pairwise;
mod provider;

pub use error::TravelTimeError;
pub use pairwise::PairwiseTravelTime;
pub use provider::{TravelTimeMatrix, TravelTimeProvider};
