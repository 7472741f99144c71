//! Route requests and their validation.
//!
//! A [`RouteRequest`] mirrors the inbound wire shape. The engine never
//! searches over it directly: [`RouteRequest::validate`] normalises it into a
//! [`ValidatedRequest`] first, so callers that skipped client-side checks are
//! still rejected before any computation starts.

use std::time::Duration;

use thiserror::Error;

use crate::StopId;

/// Parameters for a route request.
///
/// `budget` is expressed in seconds at this boundary. Optional fields default
/// to an open path with no cap on the number of stops.
///
/// # Examples
/// ```rust
/// use stopover_core::RouteRequest;
///
/// let request = RouteRequest::new("DFW", ["IAH", "AMS"], 14.25)
///     .with_return_to_start(true)
///     .with_max_stops(1);
/// assert_eq!(request.candidates.len(), 2);
/// assert_eq!(request.max_stops, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRequest {
    /// Fixed origin of the route.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: StopId,
    /// Stops the route may visit. Duplicates and the start itself are ignored.
    #[cfg_attr(feature = "serde", serde(default))]
    pub candidates: Vec<StopId>,
    /// Maximum total duration in seconds.
    pub budget: f64,
    /// Count the closing leg back to the start against the budget.
    #[cfg_attr(feature = "serde", serde(default))]
    pub return_to_start: bool,
    /// Upper bound on the number of candidate stops visited.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub max_stops: Option<u16>,
}

impl RouteRequest {
    /// Construct an open-path request without a stop cap.
    pub fn new<S, I, C>(start: S, candidates: I, budget: f64) -> Self
    where
        S: Into<StopId>,
        I: IntoIterator<Item = C>,
        C: Into<StopId>,
    {
        Self {
            start: start.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
            budget,
            return_to_start: false,
            max_stops: None,
        }
    }

    /// Set whether the route must close back at the start.
    #[must_use]
    pub const fn with_return_to_start(mut self, return_to_start: bool) -> Self {
        self.return_to_start = return_to_start;
        self
    }

    /// Cap the number of candidate stops the route may visit.
    #[must_use]
    pub const fn with_max_stops(mut self, max_stops: u16) -> Self {
        self.max_stops = Some(max_stops);
        self
    }

    /// Validate and normalise the request.
    ///
    /// Candidates are deduplicated, sorted and stripped of the start stop.
    ///
    /// # Errors
    /// Returns [`RequestValidationError`] when the start is missing, an
    /// identifier is empty, or the budget is negative, non-finite or too
    /// large to represent.
    ///
    /// # Examples
    /// ```rust
    /// use std::time::Duration;
    /// use stopover_core::{RequestValidationError, RouteRequest};
    ///
    /// let validated = RouteRequest::new("A", ["C", "B", "C", "A"], 1.5).validate()?;
    /// let ids: Vec<&str> = validated.candidates().iter().map(|id| id.as_str()).collect();
    /// assert_eq!(ids, ["B", "C"]);
    /// assert_eq!(validated.budget(), Duration::from_millis(1500));
    ///
    /// let err = RouteRequest::new("A", ["B"], -1.0).validate().unwrap_err();
    /// assert_eq!(err, RequestValidationError::NegativeBudget);
    /// # Ok::<(), RequestValidationError>(())
    /// ```
    pub fn validate(&self) -> Result<ValidatedRequest, RequestValidationError> {
        if self.start.is_empty() {
            return Err(RequestValidationError::MissingStart);
        }
        if self.candidates.iter().any(StopId::is_empty) {
            return Err(RequestValidationError::EmptyStopId);
        }
        let budget = budget_duration(self.budget)?;

        let mut candidates: Vec<StopId> = self
            .candidates
            .iter()
            .filter(|candidate| **candidate != self.start)
            .cloned()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        Ok(ValidatedRequest {
            start: self.start.clone(),
            candidates,
            budget,
            return_to_start: self.return_to_start,
            max_stops: self.max_stops.map(usize::from),
        })
    }
}

fn budget_duration(budget: f64) -> Result<Duration, RequestValidationError> {
    if !budget.is_finite() {
        return Err(RequestValidationError::NonFiniteBudget);
    }
    if budget < 0.0 {
        return Err(RequestValidationError::NegativeBudget);
    }
    let duration =
        Duration::try_from_secs_f64(budget).map_err(|_| RequestValidationError::BudgetTooLarge)?;
    // Budgets must leave headroom below the search's saturating nanosecond sums.
    if duration.as_nanos() >= u128::from(u64::MAX) {
        return Err(RequestValidationError::BudgetTooLarge);
    }
    Ok(duration)
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    start: StopId,
    candidates: Vec<StopId>,
    budget: Duration,
    return_to_start: bool,
    max_stops: Option<usize>,
}

impl ValidatedRequest {
    /// The fixed origin.
    #[must_use]
    pub const fn start(&self) -> &StopId {
        &self.start
    }

    /// Distinct candidates in ascending order, never containing the start.
    #[must_use]
    pub fn candidates(&self) -> &[StopId] {
        &self.candidates
    }

    /// The duration ceiling.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether the closing leg back to the start counts.
    #[must_use]
    pub const fn return_to_start(&self) -> bool {
        self.return_to_start
    }

    /// Effective stop cap given `available` candidates.
    #[must_use]
    pub fn stop_limit(&self, available: usize) -> usize {
        self.max_stops.map_or(available, |max| max.min(available))
    }
}

/// Reasons a [`RouteRequest`] is rejected before any computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// The start stop was absent or empty.
    #[error("start stop is missing")]
    MissingStart,
    /// A candidate identifier was the empty string.
    #[error("stop identifiers must not be empty")]
    EmptyStopId,
    /// The budget was below zero.
    #[error("budget must not be negative")]
    NegativeBudget,
    /// The budget was NaN or infinite.
    #[error("budget must be a finite number")]
    NonFiniteBudget,
    /// The budget exceeds the representable range.
    #[error("budget is too large")]
    BudgetTooLarge,
    /// The payload could not be decoded at all.
    #[error("malformed request: {0}")]
    Malformed(String),
}
