//! Exact search: dynamic programming over visited subsets.
//!
//! A state `(mask, j)` holds the minimum duration of a path that leaves the
//! start, visits exactly the candidates in `mask` and ends at `j`. States are
//! filled one layer (subset size) at a time. Once a layer is complete every
//! state in it is ranked by the lexicographic order of its best path, so the
//! next layer breaks equal-duration ties by comparing one integer.

use log::debug;
use stopover_core::SolveError;
use stopover_core::graph::START;

use crate::deadline::Deadline;
use crate::objective::{Instance, RouteKey, SearchResult};
use crate::reach::Bounds;

/// Largest candidate count the exact search accepts.
pub const MAX_EXACT_CANDIDATES: usize = 20;

const UNREACHED: u64 = u64::MAX;
const NO_PRED: u8 = u8::MAX;

/// Search `active` (ascending graph indices) exhaustively.
///
/// The deadline is checked before each layer; when it fires the answer is
/// the best route among the completed layers.
pub(crate) fn search(
    instance: &Instance<'_>,
    bounds: &Bounds,
    active: &[usize],
    deadline: &Deadline,
) -> Result<SearchResult, SolveError> {
    let k = active.len();
    if k > MAX_EXACT_CANDIDATES {
        return Err(SolveError::internal(format!(
            "exact search supports at most {MAX_EXACT_CANDIDATES} candidates, got {k}"
        )));
    }
    let mut tables = Tables::allocate(instance, active)?;
    let limit = instance.stop_limit().min(k);

    let mut best = instance.trivial();
    let mut layers = 0_u64;
    let mut stopped_early = false;
    for size in 1..=limit {
        if deadline.expired() {
            stopped_early = true;
            break;
        }
        let layer = tables.fill_layer(instance, bounds, size);
        layers += 1;
        match layer {
            Layer::Unreachable => break,
            Layer::Filled(None) => {}
            Layer::Filled(Some(end)) => {
                let candidate = instance.evaluate(tables.reconstruct(end));
                if candidate.is_better_than(&best) {
                    best = candidate;
                }
            }
        }
    }
    debug!("exact search completed {layers} layers over {k} candidates");
    Ok(SearchResult {
        best: Some(best),
        iterations: layers,
        stopped_early,
    })
}

/// A ranked state: `(mask, j)` flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    mask: usize,
    node: usize,
}

/// Result of filling one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    /// No state of this size is reachable, so no larger one is either.
    Unreachable,
    /// The layer's best feasible end state, if any state may end the route.
    Filled(Option<State>),
}

struct Tables<'a> {
    active: &'a [usize],
    k: usize,
    start_value: f64,
    duration: Vec<u64>,
    pred: Vec<u8>,
    rank: Vec<u32>,
    mask_value: Vec<f64>,
}

fn table<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, SolveError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|err| SolveError::internal(format!("exact search tables: {err}")))?;
    values.resize(len, fill);
    Ok(values)
}

fn members(mask: usize, k: usize) -> impl Iterator<Item = usize> {
    (0..k).filter(move |bit| mask & (1 << bit) != 0)
}

/// Every `size`-bit mask over `k` bits in ascending order.
fn masks_of_size(size: usize, k: usize) -> impl Iterator<Item = usize> {
    let full = 1_usize << k;
    let first = (1_usize << size) - 1;
    std::iter::successors(Some(first), |&mask| {
        let low = mask & mask.wrapping_neg();
        let ripple = mask + low;
        let next = (((ripple ^ mask) >> 2) >> low.trailing_zeros()) | ripple;
        Some(next)
    })
    .take_while(move |&mask| mask < full)
}

impl<'a> Tables<'a> {
    #[expect(
        clippy::indexing_slicing,
        clippy::float_arithmetic,
        reason = "masks index a table sized 2^k; values are summed in canonical order"
    )]
    fn allocate(instance: &Instance<'_>, active: &'a [usize]) -> Result<Self, SolveError> {
        let k = active.len();
        let masks = 1_usize << k;
        let states = masks * k;
        let mut mask_value = table(masks, 0.0_f64)?;
        for mask in 1..masks {
            let high = usize::BITS - 1 - mask.leading_zeros();
            let bit = high as usize;
            mask_value[mask] = mask_value[mask ^ (1 << bit)] + instance.value(active[bit]);
        }
        Ok(Self {
            active,
            k,
            start_value: instance.value(START),
            duration: table(states, UNREACHED)?,
            pred: table(states, NO_PRED)?,
            rank: table(states, 0_u32)?,
            mask_value,
        })
    }

    const fn slot(&self, mask: usize, node: usize) -> usize {
        mask * self.k + node
    }

    /// Fill every state of `size`, rank them and pick the layer's best
    /// feasible end state.
    #[expect(
        clippy::indexing_slicing,
        clippy::float_arithmetic,
        reason = "state slots are bounded by the table sizes computed in allocate"
    )]
    fn fill_layer(
        &mut self,
        instance: &Instance<'_>,
        bounds: &Bounds,
        size: usize,
    ) -> Layer {
        let budget = instance.budget();
        let mut layer: Vec<(u32, usize, usize)> = Vec::new();
        for mask in masks_of_size(size, self.k) {
            for node in members(mask, self.k) {
                let here = self.active[node];
                let prev = mask ^ (1 << node);
                let (duration, pred, pred_rank) = if prev == 0 {
                    (instance.leg(START, here), NO_PRED, 0)
                } else {
                    self.relax(instance, prev, here)
                };
                if duration == UNREACHED
                    || duration.saturating_add(bounds.remaining(here)) > budget
                {
                    continue;
                }
                let slot = self.slot(mask, node);
                self.duration[slot] = duration;
                self.pred[slot] = pred;
                layer.push((pred_rank, node, mask));
            }
        }
        if layer.is_empty() {
            return Layer::Unreachable;
        }

        layer.sort_unstable();
        let mut winner: Option<(RouteKey, u32, State)> = None;
        for (position, &(_, node, mask)) in layer.iter().enumerate() {
            let rank = u32::try_from(position).unwrap_or(u32::MAX);
            let slot = self.slot(mask, node);
            self.rank[slot] = rank;

            let total = self.duration[slot].saturating_add(instance.closing_leg(self.active[node]));
            if total > budget {
                continue;
            }
            let key = RouteKey {
                value: self.mask_value[mask] + self.start_value,
                duration: total,
            };
            let replaces = winner.as_ref().is_none_or(|(best, best_rank, _)| {
                key.preference(best).then(rank.cmp(best_rank)).is_lt()
            });
            if replaces {
                winner = Some((key, rank, State { mask, node }));
            }
        }
        Layer::Filled(winner.map(|(_, _, state)| state))
    }

    /// Best way into `here` from the layer below, preferring the lower rank
    /// on equal durations.
    #[expect(
        clippy::indexing_slicing,
        reason = "state slots are bounded by the table sizes computed in allocate"
    )]
    fn relax(&self, instance: &Instance<'_>, prev: usize, here: usize) -> (u64, u8, u32) {
        let mut best = (UNREACHED, NO_PRED, u32::MAX);
        for node in members(prev, self.k) {
            let slot = self.slot(prev, node);
            let reached = self.duration[slot];
            if reached == UNREACHED {
                continue;
            }
            let duration = reached.saturating_add(instance.leg(self.active[node], here));
            let rank = self.rank[slot];
            if duration < best.0 || (duration == best.0 && rank < best.2) {
                best = (duration, u8::try_from(node).unwrap_or(NO_PRED), rank);
            }
        }
        best
    }

    /// Walk predecessors back to the start.
    fn reconstruct(&self, end: State) -> Vec<usize> {
        let mut reversed = Vec::with_capacity(self.k + 1);
        let mut mask = end.mask;
        let mut node = end.node;
        for _ in 0..self.k {
            if let Some(&here) = self.active.get(node) {
                reversed.push(here);
            }
            let pred = self
                .pred
                .get(self.slot(mask, node))
                .copied()
                .unwrap_or(NO_PRED);
            mask ^= 1 << node;
            if pred == NO_PRED {
                break;
            }
            node = usize::from(pred);
        }
        reversed.push(START);
        reversed.reverse();
        reversed
    }
}

/// Best route by enumerating every subset and order; for cross-checking.
#[cfg(test)]
pub(crate) fn brute_force(instance: &Instance<'_>, active: &[usize]) -> crate::objective::Evaluated {
    use crate::objective::Evaluated;

    fn extend(
        instance: &Instance<'_>,
        active: &[usize],
        route: &mut Vec<usize>,
        best: &mut Evaluated,
    ) {
        let candidate = instance.evaluate(route.clone());
        if candidate.key.duration <= instance.budget() && candidate.is_better_than(best) {
            *best = candidate;
        }
        if route.len() > instance.stop_limit() {
            return;
        }
        for &node in active {
            if route.contains(&node) {
                continue;
            }
            route.push(node);
            extend(instance, active, route, best);
            route.pop();
        }
    }
    let mut best = instance.trivial();
    let mut route = vec![START];
    extend(instance, active, &mut route, &mut best);
    best
}
