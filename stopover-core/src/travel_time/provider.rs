//! Travel-time provider trait and adjacency-matrix alias for stop pairs.

use std::sync::Arc;
use std::time::Duration;

use crate::StopId;

use super::error::TravelTimeError;

/// Adjacency matrix of travel durations.
pub type TravelTimeMatrix = Vec<Vec<Duration>>;

/// Fetch pairwise travel durations for a set of stops.
///
/// Implementers must return a square `n×n` matrix where `n == stops.len()`.
/// `matrix[i][j]` is the duration from `stops[i]` to `stops[j]`. Durations
/// need not be symmetric. Diagonal entries are ignored by the engine.
///
/// # Examples
///
/// A provider backed by per-stop positions along a line:
///
/// ```rust
/// use std::collections::BTreeMap;
/// use std::time::Duration;
/// use stopover_core::{StopId, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};
///
/// struct Corridor(BTreeMap<StopId, u64>);
///
/// impl TravelTimeProvider for Corridor {
///     fn get_travel_time_matrix(
///         &self,
///         stops: &[StopId],
///     ) -> Result<TravelTimeMatrix, TravelTimeError> {
///         if stops.is_empty() {
///             return Err(TravelTimeError::EmptyInput);
///         }
///         let positions = stops
///             .iter()
///             .map(|id| {
///                 self.0
///                     .get(id)
///                     .copied()
///                     .ok_or_else(|| TravelTimeError::UnknownStop { id: id.clone() })
///             })
///             .collect::<Result<Vec<_>, _>>()?;
///         Ok(positions
///             .iter()
///             .map(|from| {
///                 positions
///                     .iter()
///                     .map(|to| Duration::from_secs(from.abs_diff(*to)))
///                     .collect()
///             })
///             .collect())
///     }
/// }
///
/// let corridor = Corridor(BTreeMap::from([("DFW".into(), 0), ("IAH".into(), 4)]));
/// let matrix = corridor.get_travel_time_matrix(&["DFW".into(), "IAH".into()])?;
/// assert_eq!(matrix[1][0], Duration::from_secs(4));
/// assert!(corridor.get_travel_time_matrix(&["ZZZ".into()]).is_err());
/// # Ok::<(), TravelTimeError>(())
/// ```
pub trait TravelTimeProvider {
    /// Return a matrix of travel durations for `stops`.
    ///
    /// Implementations must return `Err(TravelTimeError::EmptyInput)` when
    /// `stops` is empty and `Err(TravelTimeError::UnknownStop { .. })` for an
    /// identifier they cannot resolve.
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError>;
}

impl<T: TravelTimeProvider + ?Sized> TravelTimeProvider for &T {
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        (**self).get_travel_time_matrix(stops)
    }
}

impl<T: TravelTimeProvider + ?Sized> TravelTimeProvider for Arc<T> {
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        (**self).get_travel_time_matrix(stops)
    }
}
