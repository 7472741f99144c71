//! In-memory stop catalog backing both durations and values.
//!
//! A catalog holds every stop a deployment knows about together with a full
//! duration matrix. Requests reference a subset of its stops; identifiers
//! missing from the catalog surface as [`TravelTimeError::UnknownStop`].
//!
//! With the `serde` feature the catalog loads from JSON:
//!
//! ```json
//! {
//!   "stops": [{ "id": "DFW", "value": 0.0 }, { "id": "IAH", "value": 2.5 }],
//!   "durations": [[0.0, 1.2], [1.3, 0.0]]
//! }
//! ```
//!
//! Durations are seconds; `durations[i][j]` is the leg from stop `i` to stop
//! `j`.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

use crate::{StopId, TravelTimeError, TravelTimeMatrix, TravelTimeProvider, WeightedValue};

/// A stop listed in a catalog.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogStop {
    /// Stop identifier.
    pub id: StopId,
    /// Reward for visiting the stop.
    #[cfg_attr(feature = "serde", serde(default = "default_value"))]
    pub value: f64,
}

#[cfg(feature = "serde")]
const fn default_value() -> f64 {
    WeightedValue::DEFAULT_FALLBACK
}

impl CatalogStop {
    /// Construct a catalog entry.
    pub fn new(id: impl Into<StopId>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Errors raised while building or loading a [`StopCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A stop identifier was empty.
    #[error("catalog stop identifiers must not be empty")]
    EmptyStopId,
    /// The same identifier was listed twice.
    #[error("catalog lists stop {id} more than once")]
    DuplicateStop {
        /// The repeated identifier.
        id: StopId,
    },
    /// The matrix is not square over the listed stops.
    #[error("duration matrix must be {expected}x{expected}")]
    DimensionMismatch {
        /// Number of listed stops.
        expected: usize,
    },
    /// A duration was negative, non-finite or out of range.
    #[error("invalid duration from {from} to {to}")]
    InvalidDuration {
        /// Origin of the leg.
        from: StopId,
        /// Destination of the leg.
        to: StopId,
    },
    /// A value was negative or non-finite.
    #[error("invalid value for stop {id}")]
    InvalidValue {
        /// The stop carrying the value.
        id: StopId,
    },
    /// The JSON document could not be parsed.
    #[error("malformed catalog: {0}")]
    Malformed(String),
}

/// Stops, values and durations known to a deployment.
///
/// # Examples
/// ```rust
/// use std::time::Duration;
/// use stopover_core::{CatalogStop, StopCatalog, StopId, TravelTimeProvider};
///
/// let catalog = StopCatalog::new(
///     vec![CatalogStop::new("A", 0.0), CatalogStop::new("B", 2.0)],
///     vec![
///         vec![Duration::ZERO, Duration::from_secs(4)],
///         vec![Duration::from_secs(5), Duration::ZERO],
///     ],
/// )?;
/// let matrix = catalog
///     .get_travel_time_matrix(&[StopId::from("B"), StopId::from("A")])
///     .expect("both stops are listed");
/// assert_eq!(matrix[0][1], Duration::from_secs(5));
/// # Ok::<(), stopover_core::CatalogError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StopCatalog {
    stops: Vec<CatalogStop>,
    index: HashMap<StopId, usize>,
    durations: Vec<Vec<Duration>>,
}

impl StopCatalog {
    /// Build a catalog from stops and a matrix aligned with them.
    ///
    /// # Errors
    /// Returns [`CatalogError`] for empty or duplicate ids, a non-square
    /// matrix, or a negative or non-finite value.
    pub fn new(
        stops: Vec<CatalogStop>,
        durations: Vec<Vec<Duration>>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(stops.len());
        for (position, stop) in stops.iter().enumerate() {
            if stop.id.is_empty() {
                return Err(CatalogError::EmptyStopId);
            }
            if !stop.value.is_finite() || stop.value < 0.0 {
                return Err(CatalogError::InvalidValue {
                    id: stop.id.clone(),
                });
            }
            if index.insert(stop.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateStop {
                    id: stop.id.clone(),
                });
            }
        }
        let expected = stops.len();
        if durations.len() != expected || durations.iter().any(|row| row.len() != expected) {
            return Err(CatalogError::DimensionMismatch { expected });
        }
        Ok(Self {
            stops,
            index,
            durations,
        })
    }

    /// Parse a catalog from its JSON form.
    ///
    /// # Errors
    /// Returns [`CatalogError::Malformed`] for invalid JSON,
    /// [`CatalogError::InvalidDuration`] for unusable seconds and any error
    /// from [`StopCatalog::new`].
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_json::from_str(json).map_err(|err| CatalogError::Malformed(err.to_string()))?;
        raw.into_catalog()
    }

    /// Parse a catalog from a reader yielding its JSON form.
    ///
    /// # Errors
    /// As [`StopCatalog::from_json_str`].
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_reader(reader)
            .map_err(|err| CatalogError::Malformed(err.to_string()))?;
        raw.into_catalog()
    }

    /// Number of listed stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Return `true` when the catalog lists no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// A value model reporting each listed stop's catalog value.
    #[must_use]
    pub fn value_model(&self) -> WeightedValue {
        WeightedValue::new(self.stops.iter().map(|stop| (stop.id.clone(), stop.value)))
    }

    fn position(&self, id: &StopId) -> Result<usize, TravelTimeError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TravelTimeError::UnknownStop { id: id.clone() })
    }
}

impl TravelTimeProvider for StopCatalog {
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if stops.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let positions = stops
            .iter()
            .map(|id| self.position(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions
            .iter()
            .map(|&from| {
                positions
                    .iter()
                    .map(|&to| {
                        self.durations
                            .get(from)
                            .and_then(|row| row.get(to))
                            .copied()
                            .unwrap_or(Duration::ZERO)
                    })
                    .collect()
            })
            .collect())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    stops: Vec<CatalogStop>,
    durations: Vec<Vec<f64>>,
}

#[cfg(feature = "serde")]
impl RawCatalog {
    fn into_catalog(self) -> Result<StopCatalog, CatalogError> {
        let Self { stops, durations } = self;
        let expected = stops.len();
        if durations.len() != expected || durations.iter().any(|row| row.len() != expected) {
            return Err(CatalogError::DimensionMismatch { expected });
        }
        let converted = durations
            .iter()
            .zip(&stops)
            .map(|(row, from)| {
                row.iter()
                    .zip(&stops)
                    .map(|(&secs, to)| leg_duration(secs, from, to))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        StopCatalog::new(stops, converted)
    }
}

#[cfg(feature = "serde")]
fn leg_duration(secs: f64, from: &CatalogStop, to: &CatalogStop) -> Result<Duration, CatalogError> {
    let invalid = || CatalogError::InvalidDuration {
        from: from.id.clone(),
        to: to.id.clone(),
    };
    if !secs.is_finite() || secs < 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    use crate::{StopRole, ValueModel};

    #[fixture]
    fn catalog() -> StopCatalog {
        StopCatalog::new(
            vec![
                CatalogStop::new("DFW", 0.0),
                CatalogStop::new("IAH", 2.5),
                CatalogStop::new("AUS", 1.0),
            ],
            vec![
                vec![Duration::ZERO, Duration::from_secs(1), Duration::from_secs(2)],
                vec![Duration::from_secs(3), Duration::ZERO, Duration::from_secs(4)],
                vec![Duration::from_secs(5), Duration::from_secs(6), Duration::ZERO],
            ],
        )
        .expect("valid catalog")
    }

    #[rstest]
    fn projects_requested_submatrix(catalog: StopCatalog) {
        let matrix = catalog
            .get_travel_time_matrix(&[StopId::from("AUS"), StopId::from("IAH")])
            .expect("listed stops");
        assert_eq!(
            matrix,
            vec![
                vec![Duration::ZERO, Duration::from_secs(6)],
                vec![Duration::from_secs(4), Duration::ZERO],
            ]
        );
    }

    #[rstest]
    fn reports_unlisted_stops(catalog: StopCatalog) {
        let err = catalog
            .get_travel_time_matrix(&[StopId::from("DFW"), StopId::from("LHR")])
            .expect_err("LHR is not listed");
        assert_eq!(
            err,
            TravelTimeError::UnknownStop {
                id: StopId::from("LHR")
            }
        );
    }

    #[rstest]
    fn exposes_catalog_values(catalog: StopCatalog) {
        let model = catalog.value_model();
        assert_eq!(model.value(&StopId::from("IAH"), StopRole::Candidate), 2.5);
        assert_eq!(model.value(&StopId::from("DFW"), StopRole::Start), 0.0);
    }

    #[rstest]
    fn rejects_duplicates() {
        let err = StopCatalog::new(
            vec![CatalogStop::new("A", 1.0), CatalogStop::new("A", 2.0)],
            vec![vec![Duration::ZERO; 2]; 2],
        )
        .expect_err("duplicate stop");
        assert_eq!(
            err,
            CatalogError::DuplicateStop {
                id: StopId::from("A")
            }
        );
    }

    #[rstest]
    fn rejects_ragged_matrices() {
        let err = StopCatalog::new(
            vec![CatalogStop::new("A", 1.0), CatalogStop::new("B", 2.0)],
            vec![vec![Duration::ZERO; 2], vec![Duration::ZERO]],
        )
        .expect_err("ragged matrix");
        assert_eq!(err, CatalogError::DimensionMismatch { expected: 2 });
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn loads_from_json() {
        let catalog = StopCatalog::from_json_str(
            r#"{"stops":[{"id":"A","value":0.0},{"id":"B"}],"durations":[[0,1.5],[2,0]]}"#,
        )
        .expect("valid json");
        assert_eq!(catalog.len(), 2);
        let values = catalog.value_model();
        assert_eq!(
            crate::ValueModel::value(&values, &StopId::from("B"), crate::StopRole::Candidate),
            1.0
        );
        let matrix = catalog
            .get_travel_time_matrix(&[StopId::from("A"), StopId::from("B")])
            .expect("listed stops");
        assert_eq!(matrix[0][1], Duration::from_millis(1500));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case(r#"{"stops":[{"id":"A"}],"durations":[[-1]]}"#)]
    #[case(r#"{"stops":[{"id":"A"}],"durations":[]}"#)]
    #[case(r#"{"stops":[{"id":"A","value":-2}],"durations":[[0]]}"#)]
    #[case("not json")]
    fn rejects_bad_json(#[case] json: &str) {
        assert!(StopCatalog::from_json_str(json).is_err());
    }
}
