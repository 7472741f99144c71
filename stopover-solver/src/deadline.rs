//! Wall-clock deadlines shared by both search strategies.

use std::time::{Duration, Instant};

/// The earliest of an optional caller deadline and an optional time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Combine a caller deadline with a limit measured from `started_at`.
    pub(crate) fn new(
        started_at: Instant,
        external: Option<Instant>,
        time_limit: Option<Duration>,
    ) -> Self {
        let limit = time_limit.and_then(|limit| started_at.checked_add(limit));
        let at = match (external, limit) {
            (Some(lhs), Some(rhs)) => Some(lhs.min(rhs)),
            (lhs, rhs) => lhs.or(rhs),
        };
        Self { at }
    }

    /// A deadline that never fires.
    #[cfg(test)]
    pub(crate) const fn none() -> Self {
        Self { at: None }
    }

    /// Whether the deadline has passed.
    pub(crate) fn expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }
}
