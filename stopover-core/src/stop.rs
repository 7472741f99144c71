//! Stop identifiers.
//!
//! Stops are addressed by opaque string identifiers supplied by the calling
//! tier (airport codes, venue keys and so on). Ordering is plain byte order,
//! which the engine relies on for deterministic tie-breaking.

use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier for a stop.
///
/// # Examples
/// ```
/// use stopover_core::StopId;
///
/// let id = StopId::from("DFW");
/// assert_eq!(id.as_str(), "DFW");
/// assert!(StopId::from("AMS") < id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StopId(String);

impl StopId {
    /// Construct an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `true` when the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for StopId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for StopId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The part a stop plays in a request.
///
/// Value models use the role to tell the origin apart from the stops that
/// earn a reward for being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopRole {
    /// The fixed origin of every route.
    Start,
    /// A stop the route may choose to visit.
    Candidate,
}
