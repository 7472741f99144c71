//! Shortest-path lower bounds used to prune unreachable candidates.
//!
//! Leg durations need not satisfy the triangle inequality, so a direct leg
//! is not a lower bound on reaching a stop. Dense Dijkstra over the complete
//! graph gives one.

use stopover_core::graph::START;

use crate::objective::Instance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outbound,
    Inbound,
}

/// Shortest durations from and back to the start for every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Bounds {
    from_start: Vec<u64>,
    to_start: Vec<u64>,
}

impl Bounds {
    pub(crate) fn new(instance: &Instance<'_>) -> Self {
        let from_start = shortest_paths(instance, Direction::Outbound);
        let to_start = if instance.closing() {
            shortest_paths(instance, Direction::Inbound)
        } else {
            vec![0; instance.nodes()]
        };
        Self {
            from_start,
            to_start,
        }
    }

    /// Lower bound on the duration still needed after arriving at `node`.
    pub(crate) fn remaining(&self, node: usize) -> u64 {
        self.to_start.get(node).copied().unwrap_or(u64::MAX)
    }

    /// Candidates that appear on at least one feasible route, ascending.
    pub(crate) fn reachable(&self, instance: &Instance<'_>) -> Vec<usize> {
        (1..instance.nodes())
            .filter(|&node| {
                let there = self.from_start.get(node).copied().unwrap_or(u64::MAX);
                there.saturating_add(self.remaining(node)) <= instance.budget()
            })
            .collect()
    }
}

fn shortest_paths(instance: &Instance<'_>, direction: Direction) -> Vec<u64> {
    let n = instance.nodes();
    let mut dist = vec![u64::MAX; n];
    let mut done = vec![false; n];
    if let Some(origin) = dist.get_mut(START) {
        *origin = 0;
    }
    for _ in 0..n {
        let Some(u) = (0..n)
            .filter(|&v| !done.get(v).copied().unwrap_or(true))
            .min_by_key(|&v| (dist.get(v).copied().unwrap_or(u64::MAX), v))
        else {
            break;
        };
        let du = dist.get(u).copied().unwrap_or(u64::MAX);
        if du == u64::MAX {
            break;
        }
        if let Some(flag) = done.get_mut(u) {
            *flag = true;
        }
        for v in 0..n {
            let leg = match direction {
                Direction::Outbound => instance.leg(u, v),
                Direction::Inbound => instance.leg(v, u),
            };
            if let Some(dv) = dist.get_mut(v) {
                *dv = (*dv).min(du.saturating_add(leg));
            }
        }
    }
    dist
}
