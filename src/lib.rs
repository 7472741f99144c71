//! Facade crate for the Stopover route engine.
//!
//! Re-exports the core domain types. The orienteering solver is available
//! behind the `solver` feature.

#![forbid(unsafe_code)]

pub use stopover_core::{
    Diagnostics, RequestValidationError, RouteRequest, RouteResponse, SearchStrategy, SolveError,
    SolveOutcome, Solver, StopCatalog, StopId, TravelTimeError, TravelTimeMatrix,
    TravelTimeProvider, UnitValue, ValueModel, WeightedValue,
};

#[cfg(feature = "serde")]
pub use stopover_core::wire;

#[cfg(feature = "solver")]
pub use stopover_solver::{OrienteeringSolver, OrienteeringSolverConfig};
