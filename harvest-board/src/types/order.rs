//! Order keys for task ordering within a lane using fractional indexing.

use super::ids::TaskId;
use super::task::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordering within a lane. Keys are real numbers sorted ascending.
///
/// A dropped task gets a key between its new neighbours, so inserting never
/// requires renumbering the rest of the lane. Keys only mean something
/// relative to other keys in the same lane.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderKey(f64);

impl OrderKey {
    /// Key given to the first task in an empty lane
    pub const ZERO: OrderKey = OrderKey(0.0);

    /// Wrap a raw key
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw key
    pub fn value(self) -> f64 {
        self.0
    }

    /// Key sorting before `first`
    pub fn before(first: OrderKey) -> Self {
        Self(first.0 - 1.0)
    }

    /// Key sorting after `last`
    pub fn after(last: OrderKey) -> Self {
        Self(last.0 + 1.0)
    }

    /// Midpoint of two keys
    pub fn between(before: OrderKey, after: OrderKey) -> Self {
        let mid = (before.0 + after.0) / 2.0;
        if mid.is_finite() {
            Self(mid)
        } else {
            // Sum overflowed; halve first.
            Self(before.0 / 2.0 + after.0 / 2.0)
        }
    }

    /// Total ordering used for sorting lanes
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for OrderKey {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the key a task should get to land at `target_index` of a lane.
///
/// `lane` is the destination lane in display order with the moved task
/// already removed. Indices past the end append.
pub fn allocate(lane: &[Task], target_index: usize) -> OrderKey {
    let (Some(first), Some(last)) = (lane.first(), lane.last()) else {
        return OrderKey::ZERO;
    };

    if target_index == 0 {
        return OrderKey::before(first.order_key);
    }
    if target_index >= lane.len() {
        return OrderKey::after(last.order_key);
    }

    OrderKey::between(
        lane[target_index - 1].order_key,
        lane[target_index].order_key,
    )
}

/// True when no distinct float remains strictly between the two keys.
pub fn is_exhausted(before: OrderKey, after: OrderKey) -> bool {
    let mid = OrderKey::between(before, after);
    !(mid > before && mid < after)
}

/// Whether inserting at `target_index` would land on an exhausted gap.
pub fn gap_exhausted(lane: &[Task], target_index: usize) -> bool {
    if target_index == 0 || target_index >= lane.len() {
        return false;
    }
    is_exhausted(
        lane[target_index - 1].order_key,
        lane[target_index].order_key,
    )
}

/// Largest magnitude at which every integer is still an exact `f64`
const MAX_EXACT_KEY: f64 = 9_007_199_254_740_992.0;

/// Renumber a lane to evenly spaced integer keys, preserving display order.
///
/// The assignments come back in the order they must be applied. New keys go
/// above every existing key (applied last to first) or, when that would pass
/// 2^53, below every existing key (applied first to last). Either way each
/// single update keeps the lane ordered, so a partially applied rebalance
/// never reorders tasks. A lane spanning both limits is renumbered from 0.
pub fn rebalance(lane: &[Task]) -> Vec<(TaskId, OrderKey)> {
    let keys = || lane.iter().map(|t| t.order_key.value());
    let (Some(min), Some(max)) = (
        keys().min_by(|a, b| a.total_cmp(b)),
        keys().max_by(|a, b| a.total_cmp(b)),
    ) else {
        return Vec::new();
    };
    let count = lane.len() as f64;

    let numbered = |start: f64| {
        lane.iter()
            .enumerate()
            .map(move |(i, t)| (t.id, OrderKey::new(start + i as f64)))
    };

    if max.floor() + count < MAX_EXACT_KEY {
        numbered(max.floor() + 1.0).rev().collect()
    } else if min.floor() - count > -MAX_EXACT_KEY {
        numbered(min.floor() - count).collect()
    } else {
        numbered(0.0).collect()
    }
}
