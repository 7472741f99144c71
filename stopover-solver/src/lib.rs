//! Orienteering route search for Stopover.
//!
//! This crate provides [`OrienteeringSolver`], the implementation of the
//! [`Solver`](stopover_core::Solver) trait. Given a start, candidate stops
//! and a duration budget it returns the route from the start that collects
//! the most value without exceeding the budget.
//!
//! Small candidate sets, after pruning stops no feasible route can reach, are
//! solved exactly by dynamic programming over visited subsets. Larger sets use
//! greedy insertion followed by local search, which honours a deadline and
//! always holds a feasible route.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod deadline;
mod exact;
mod heuristic;
mod objective;
mod reach;
mod solver;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use exact::MAX_EXACT_CANDIDATES;
pub use solver::{
    DEFAULT_EXACT_THRESHOLD, DEFAULT_MAX_ITERATIONS, OrienteeringSolver, OrienteeringSolverConfig,
};
