//! Value models assigning a reward to each stop.
//!
//! A model is consulted once per stop when the [`crate::StopGraph`] is
//! built. Every score passes through [`sanitise_value`] so the search only
//! ever sees finite, non-negative rewards.

use std::collections::HashMap;

use crate::{StopId, StopRole};

/// Produce a reward for visiting a stop.
///
/// Implementations must be thread-safe and deterministic: the same stop and
/// role always yield the same value.
///
/// # Examples
/// ```rust
/// use stopover_core::{StopId, StopRole, ValueModel};
///
/// struct LengthValue;
///
/// impl ValueModel for LengthValue {
///     fn value(&self, stop: &StopId, _role: StopRole) -> f64 {
///         stop.as_str().len() as f64
///     }
/// }
///
/// assert_eq!(LengthValue.value(&StopId::from("DFW"), StopRole::Candidate), 3.0);
/// ```
pub trait ValueModel: Send + Sync {
    /// Return the raw reward for `stop` in the given `role`.
    fn value(&self, stop: &StopId, role: StopRole) -> f64;

    /// Return the reward after [`sanitise_value`].
    fn sanitised_value(&self, stop: &StopId, role: StopRole) -> f64 {
        sanitise_value(self.value(stop, role))
    }
}

impl<T: ValueModel + ?Sized> ValueModel for &T {
    fn value(&self, stop: &StopId, role: StopRole) -> f64 {
        (**self).value(stop, role)
    }
}

impl<T: ValueModel + ?Sized> ValueModel for Box<T> {
    fn value(&self, stop: &StopId, role: StopRole) -> f64 {
        (**self).value(stop, role)
    }
}

impl<T: ValueModel + ?Sized> ValueModel for std::sync::Arc<T> {
    fn value(&self, stop: &StopId, role: StopRole) -> f64 {
        (**self).value(stop, role)
    }
}

/// Clamp a raw reward to a finite, non-negative number.
///
/// NaN, infinities and anything at or below zero become `0.0`, which also
/// folds `-0.0` into positive zero.
///
/// # Examples
/// ```rust
/// use stopover_core::sanitise_value;
///
/// assert_eq!(sanitise_value(2.5), 2.5);
/// assert_eq!(sanitise_value(f64::NAN), 0.0);
/// assert!(sanitise_value(-0.0).is_sign_positive());
/// ```
#[must_use]
pub fn sanitise_value(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// Every candidate is worth exactly one; the start is worth nothing.
///
/// Maximising value under this model maximises the number of visited stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnitValue;

impl ValueModel for UnitValue {
    fn value(&self, _stop: &StopId, role: StopRole) -> f64 {
        match role {
            StopRole::Start => 0.0,
            StopRole::Candidate => 1.0,
        }
    }
}

/// Per-stop weights with a fallback for unlisted candidates.
///
/// The start only contributes when it carries an explicit weight.
///
/// # Examples
/// ```rust
/// use stopover_core::{StopId, StopRole, ValueModel, WeightedValue};
///
/// let model = WeightedValue::new([("IAH", 3.0), ("DFW", 0.5)]);
/// assert_eq!(model.value(&StopId::from("IAH"), StopRole::Candidate), 3.0);
/// assert_eq!(model.value(&StopId::from("AMS"), StopRole::Candidate), 1.0);
/// assert_eq!(model.value(&StopId::from("DFW"), StopRole::Start), 0.5);
/// assert_eq!(model.value(&StopId::from("AMS"), StopRole::Start), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedValue {
    weights: HashMap<StopId, f64>,
    fallback: f64,
}

impl WeightedValue {
    /// Weight reported for candidates without an explicit entry.
    pub const DEFAULT_FALLBACK: f64 = 1.0;

    /// Build a model from `(stop, weight)` pairs.
    pub fn new<I, K>(weights: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<StopId>,
    {
        Self {
            weights: weights
                .into_iter()
                .map(|(stop, weight)| (stop.into(), weight))
                .collect(),
            fallback: Self::DEFAULT_FALLBACK,
        }
    }

    /// Override the weight used for unlisted candidates.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Explicit weight for `stop`, if any.
    #[must_use]
    pub fn weight(&self, stop: &StopId) -> Option<f64> {
        self.weights.get(stop).copied()
    }
}

impl Default for WeightedValue {
    fn default() -> Self {
        Self::new(std::iter::empty::<(StopId, f64)>())
    }
}

impl ValueModel for WeightedValue {
    fn value(&self, stop: &StopId, role: StopRole) -> f64 {
        match (self.weight(stop), role) {
            (Some(weight), _) => weight,
            (None, StopRole::Candidate) => self.fallback,
            (None, StopRole::Start) => 0.0,
        }
    }
}
