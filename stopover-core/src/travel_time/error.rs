use thiserror::Error;

use crate::StopId;

/// Errors from [`crate::travel_time::TravelTimeProvider::get_travel_time_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    /// No stops were provided.
    ///
    /// The provider requires at least one stop to compute a matrix. The graph
    /// builder always passes the start, so this only surfaces from direct use.
    #[error("at least one stop is required")]
    EmptyInput,
    /// A stop identifier is unknown to the backing source.
    #[error("unknown stop {id}")]
    UnknownStop {
        /// The identifier that failed to resolve.
        id: StopId,
    },
    /// The backing source failed for another reason.
    #[error("travel time service error {code}: {message}")]
    ServiceError {
        /// Short machine-readable code.
        code: String,
        /// Human-readable detail.
        message: String,
    },
}
