//! Deterministic duration sources for unit, behaviour and property tests.

use std::time::Duration;

use crate::{StopId, TravelTimeError, TravelTimeMatrix, TravelTimeProvider};

/// Deterministic `TravelTimeProvider` returning one-second legs between
/// distinct stops.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelTimeProvider;

impl TravelTimeProvider for UnitTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if stops.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let n = stops.len();
        Ok((0..n)
            .map(|from| {
                (0..n)
                    .map(|to| {
                        if from == to {
                            Duration::ZERO
                        } else {
                            Duration::from_secs(1)
                        }
                    })
                    .collect()
            })
            .collect())
    }
}

/// A [`TravelTimeProvider`] returning a caller-supplied matrix verbatim.
///
/// The matrix is interpreted in graph order: the start first, then the
/// candidates in ascending id order. A matrix whose size differs from the
/// number of requested stops yields a [`TravelTimeError::ServiceError`] with
/// code `DIMENSION_MISMATCH`.
#[derive(Debug, Clone)]
pub struct FixedMatrixTravelTimeProvider {
    matrix: TravelTimeMatrix,
}

impl FixedMatrixTravelTimeProvider {
    /// Construct a provider from a pre-built matrix.
    #[must_use]
    pub const fn new(matrix: TravelTimeMatrix) -> Self {
        Self { matrix }
    }

    /// Build from whole seconds.
    #[must_use]
    pub fn from_seconds(seconds: Vec<Vec<u64>>) -> Self {
        Self::new(
            seconds
                .into_iter()
                .map(|row| row.into_iter().map(Duration::from_secs).collect())
                .collect(),
        )
    }
}

impl TravelTimeProvider for FixedMatrixTravelTimeProvider {
    fn get_travel_time_matrix(
        &self,
        stops: &[StopId],
    ) -> Result<TravelTimeMatrix, TravelTimeError> {
        if stops.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let expected = stops.len();
        if self.matrix.len() != expected {
            return Err(dimension_mismatch(format!(
                "matrix has {} rows but {expected} stops were requested",
                self.matrix.len()
            )));
        }
        if let Some((row, cols)) = self
            .matrix
            .iter()
            .enumerate()
            .find_map(|(row, cols)| (cols.len() != expected).then_some((row, cols.len())))
        {
            return Err(dimension_mismatch(format!(
                "row {row} has {cols} columns but {expected} expected"
            )));
        }
        Ok(self.matrix.clone())
    }
}

fn dimension_mismatch(message: String) -> TravelTimeError {
    TravelTimeError::ServiceError {
        code: "DIMENSION_MISMATCH".to_owned(),
        message,
    }
}
