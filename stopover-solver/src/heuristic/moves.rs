//! Local-search moves and their incremental duration deltas.
//!
//! Every delta is exact integer arithmetic on nanoseconds; only the value
//! delta is a floating-point estimate, which the caller confirms by
//! re-evaluating the materialised route.

use std::cmp::Ordering;

use stopover_core::graph::START;

use crate::objective::Instance;

/// A change to the current route. Positions index the route, `0` being the
/// start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Move {
    /// Visit an unrouted `node` at `position`.
    Insert { node: usize, position: usize },
    /// Drop the stop at `position`.
    Remove { position: usize },
    /// Replace the stop at `position` with the unrouted `node`.
    Exchange { position: usize, node: usize },
    /// Swap the stops at `first < second`.
    Swap { first: usize, second: usize },
    /// Move the stop at `from` so it ends up at `to`.
    Relocate { from: usize, to: usize },
}

impl Move {
    /// The route after applying this move.
    pub(crate) fn apply(self, route: &[usize]) -> Vec<usize> {
        let mut next = route.to_vec();
        match self {
            Self::Insert { node, position } => {
                if position <= next.len() {
                    next.insert(position, node);
                }
            }
            Self::Remove { position } => {
                if position < next.len() {
                    next.remove(position);
                }
            }
            Self::Exchange { position, node } => {
                if let Some(slot) = next.get_mut(position) {
                    *slot = node;
                }
            }
            Self::Swap { first, second } => {
                if first < next.len() && second < next.len() {
                    next.swap(first, second);
                }
            }
            Self::Relocate { from, to } => {
                if from < next.len() {
                    let node = next.remove(from);
                    next.insert(to.min(next.len()), node);
                }
            }
        }
        next
    }
}

/// A move with its estimated effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scored {
    pub(crate) step: Move,
    pub(crate) value_delta: f64,
    pub(crate) duration_delta: i128,
}

impl Scored {
    /// Screening order: larger value gain first, then larger time saving.
    pub(crate) fn preference(&self, other: &Self) -> Ordering {
        other
            .value_delta
            .total_cmp(&self.value_delta)
            .then_with(|| self.duration_delta.cmp(&other.duration_delta))
    }

    /// Whether the move leaves value and duration unchanged.
    pub(crate) fn is_neutral(&self) -> bool {
        self.value_delta.total_cmp(&0.0) == Ordering::Equal && self.duration_delta == 0
    }

    /// Whether the move looks strictly better than staying put.
    pub(crate) fn improves(&self) -> bool {
        match self.value_delta.total_cmp(&0.0) {
            Ordering::Greater => true,
            Ordering::Equal => self.duration_delta < 0,
            Ordering::Less => false,
        }
    }
}

/// Incremental cost helpers over a fixed route.
pub(crate) struct Deltas<'r, 'g> {
    instance: &'r Instance<'g>,
    route: &'r [usize],
}

impl<'r, 'g> Deltas<'r, 'g> {
    pub(crate) const fn new(instance: &'r Instance<'g>, route: &'r [usize]) -> Self {
        Self { instance, route }
    }

    fn leg(&self, from: usize, to: usize) -> i128 {
        i128::from(self.instance.leg(from, to))
    }

    /// Leg into an optional successor; a missing successor costs nothing.
    fn edge(&self, from: usize, to: Option<usize>) -> i128 {
        to.map_or(0, |next| self.leg(from, next))
    }

    fn at(&self, position: usize) -> usize {
        self.route.get(position).copied().unwrap_or(START)
    }

    /// Node following `position`, or the start for the closing leg.
    fn successor(&self, position: usize) -> Option<usize> {
        self.route
            .get(position + 1)
            .copied()
            .or_else(|| self.instance.closing().then_some(START))
    }

    /// Added duration for inserting `node` at `position`.
    pub(crate) fn insertion(&self, node: usize, position: usize) -> i128 {
        let prev = self.at(position - 1);
        let next = self.successor(position - 1);
        self.leg(prev, node) + self.edge(node, next) - self.edge(prev, next)
    }

    pub(crate) fn removal(&self, position: usize) -> i128 {
        let prev = self.at(position - 1);
        let gone = self.at(position);
        let next = self.successor(position);
        self.edge(prev, next) - self.leg(prev, gone) - self.edge(gone, next)
    }

    pub(crate) fn exchange(&self, position: usize, node: usize) -> i128 {
        let prev = self.at(position - 1);
        let gone = self.at(position);
        let next = self.successor(position);
        self.leg(prev, node) + self.edge(node, next) - self.leg(prev, gone) - self.edge(gone, next)
    }

    pub(crate) fn swap(&self, first: usize, second: usize) -> i128 {
        let before = self.at(first - 1);
        let lhs = self.at(first);
        let rhs = self.at(second);
        let after = self.successor(second);
        if second == first + 1 {
            let old = self.leg(before, lhs) + self.leg(lhs, rhs) + self.edge(rhs, after);
            let new = self.leg(before, rhs) + self.leg(rhs, lhs) + self.edge(lhs, after);
            return new - old;
        }
        let lhs_next = self.at(first + 1);
        let rhs_prev = self.at(second - 1);
        let old = self.leg(before, lhs)
            + self.leg(lhs, lhs_next)
            + self.leg(rhs_prev, rhs)
            + self.edge(rhs, after);
        let new = self.leg(before, rhs)
            + self.leg(rhs, lhs_next)
            + self.leg(rhs_prev, lhs)
            + self.edge(lhs, after);
        new - old
    }

    /// Delta for moving the stop at `from` to index `to` of the result.
    pub(crate) fn relocation(&self, from: usize, to: usize) -> i128 {
        let node = self.at(from);
        let reduced = |index: usize| {
            let source = if index < from { index } else { index + 1 };
            self.route.get(source).copied()
        };
        let prev = reduced(to - 1).unwrap_or(START);
        let next = reduced(to).or_else(|| self.instance.closing().then_some(START));
        self.removal(from) + self.leg(prev, node) + self.edge(node, next) - self.edge(prev, next)
    }
}
