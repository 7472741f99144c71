//! Adapter turning a `duration(a, b)` function into a matrix provider.

use std::fmt;
use std::time::Duration;

use crate::StopId;

use super::error::TravelTimeError;
use super::provider::{TravelTimeMatrix, TravelTimeProvider};

/// A [`TravelTimeProvider`] backed by a pairwise lookup function.
///
/// The function is called once for every ordered pair of distinct stops. It
/// reports unresolved identifiers with [`TravelTimeError::UnknownStop`].
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use stopover_core::{PairwiseTravelTime, StopId, TravelTimeError, TravelTimeProvider};
///
/// let provider = PairwiseTravelTime::new(|from: &StopId, to: &StopId| {
///     match (from.as_str(), to.as_str()) {
///         ("A", "B") => Ok(Duration::from_secs(2)),
///         (_, "B") | ("B", _) => Ok(Duration::from_secs(5)),
///         _ => Err(TravelTimeError::UnknownStop { id: to.clone() }),
///     }
/// });
/// let matrix = provider.get_travel_time_matrix(&[StopId::from("A"), StopId::from("B")])?;
/// assert_eq!(matrix[0][1], Duration::from_secs(2));
/// assert_eq!(matrix[1][0], Duration::from_secs(5));
/// # Ok::<(), TravelTimeError>(())
/// ```
pub struct PairwiseTravelTime<F> {
    lookup: F,
}

impl<F> PairwiseTravelTime<F>
where
    F: Fn(&StopId, &StopId) -> Result<Duration, TravelTimeError>,
{
    /// Wrap a pairwise lookup function.
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> fmt::Debug for PairwiseTravelTime<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairwiseTravelTime").finish_non_exhaustive()
    }
}

impl<F> TravelTimeProvider for PairwiseTravelTime<F>
where
    F: Fn(&StopId, &StopId) -> Result<Duration, TravelTimeError>,
{
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if stops.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        stops
            .iter()
            .map(|from| {
                stops
                    .iter()
                    .map(|to| {
                        if from == to {
                            Ok(Duration::ZERO)
                        } else {
                            (self.lookup)(from, to)
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}
