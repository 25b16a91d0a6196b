//! Interval-count minimization by greedy gap merging.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::debug;
use num_bigint::BigUint;

use crate::interval::Interval;
use crate::interval_set::IntervalSet;

/// A node in the merge worklist. Nodes are arena-allocated and linked by
/// index; `prev`/`next` track the surviving lexicographic neighbors as
/// merges are applied.
struct MergeNode {
    interval: Interval,
    prev: usize,
    next: Option<usize>,
    removed: bool,
}

/// Reduces `interval_set` to at most `size` intervals by merging across the
/// smallest gaps first.
///
/// The result is a superset of the input: each merge admits exactly the
/// values in the gap it closes, and gaps are consumed in ascending
/// `(distance, position)` order, so the number of newly-admitted values is
/// minimized greedily. Equal distances resolve to the earlier gap.
///
/// Already-small inputs are returned unchanged (normalized); `size == 1`
/// returns the convex hull.
///
/// # Panics
///
/// Panics if `size == 0` and the set is non-empty.
pub fn minimize_intervals(mut interval_set: IntervalSet, size: usize) -> IntervalSet {
    interval_set.normalize();

    if interval_set.number_of_intervals() <= size {
        return interval_set;
    }
    assert!(size > 0, "Cannot minimize a non-empty set to 0 intervals");
    if size == 1 {
        let mut result = IntervalSet::new(interval_set.bit_count());
        result.add_interval(interval_set.convex_hull().expect("non-empty set"));
        result.normalize();
        return result;
    }

    // Build the arena. The first interval never merges *into* anything (it
    // has no predecessor), so only nodes 1.. carry a gap and a heap entry.
    let intervals = interval_set.intervals();
    let mut nodes: Vec<MergeNode> = Vec::with_capacity(intervals.len());
    let mut heap: BinaryHeap<Reverse<(BigUint, usize)>> = BinaryHeap::new();
    for (pos, interval) in intervals.iter().enumerate() {
        nodes.push(MergeNode {
            interval: interval.clone(),
            prev: pos.wrapping_sub(1),
            next: if pos + 1 < intervals.len() { Some(pos + 1) } else { None },
            removed: false,
        });
        if pos > 0 {
            // Gap to the lexicographic predecessor. The set is normalized,
            // so this cannot underflow.
            let gap = interval.lower_bound().value() - intervals[pos - 1].upper_bound().value();
            heap.push(Reverse((gap, pos)));
        }
    }

    // Merging a node extends its predecessor's upper bound to exactly the
    // merged node's upper bound, so the gaps of all remaining nodes are
    // unaffected and the heap never needs rebuilding.
    let mut remaining = nodes.len();
    while remaining > size {
        let Reverse((gap, pos)) = heap.pop().expect("more intervals than the target size");
        debug!("minimize: merging across gap {} at position {}", gap, pos);
        let merged_hi = nodes[pos].interval.upper_bound().clone();
        let next = nodes[pos].next;
        let prev = nodes[pos].prev;
        nodes[pos].removed = true;
        let prev_lo = nodes[prev].interval.lower_bound().clone();
        nodes[prev].interval = Interval::new(prev_lo, merged_hi);
        nodes[prev].next = next;
        if let Some(next) = next {
            nodes[next].prev = prev;
        }
        remaining -= 1;
    }

    let mut result = IntervalSet::new(interval_set.bit_count());
    for node in nodes.into_iter().filter(|n| !n.removed) {
        result.add_interval(node.interval);
    }
    result.normalize();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::bits::Bits;

    fn iv(lo: u64, hi: u64, w: usize) -> Interval {
        Interval::new(Bits::from_u64(lo, w), Bits::from_u64(hi, w))
    }

    fn set(w: usize, ivs: &[(u64, u64)]) -> IntervalSet {
        IntervalSet::of(w, ivs.iter().map(|&(lo, hi)| iv(lo, hi, w)).collect())
    }

    #[test]
    fn test_small_input_unchanged() {
        let s = set(8, &[(0, 1), (10, 20)]);
        assert_eq!(minimize_intervals(s.clone(), 2), s);
        assert_eq!(minimize_intervals(s.clone(), 5), s);
    }

    #[test]
    fn test_size_one_is_convex_hull() {
        let s = set(8, &[(0, 1), (10, 20), (40, 41)]);
        assert_eq!(minimize_intervals(s, 1), set(8, &[(0, 41)]));
    }

    #[test]
    fn test_merges_smallest_gap_first() {
        // Gaps: 2 (between [0,0] and [2,2]) and 8 (between [2,2] and
        // [10,20]); the smaller gap merges first.
        let s = set(8, &[(0, 0), (2, 2), (10, 20)]);
        assert_eq!(minimize_intervals(s, 2), set(8, &[(0, 2), (10, 20)]));
    }

    #[test]
    fn test_equal_gaps_prefer_earlier() {
        // Both gaps have distance 4; the earlier one merges.
        let s = set(8, &[(0, 0), (4, 4), (8, 8)]);
        assert_eq!(minimize_intervals(s, 2), set(8, &[(0, 4), (8, 8)]));
    }

    #[test]
    fn test_chained_merges() {
        // Successive merges into the same surviving predecessor.
        let s = set(8, &[(0, 0), (2, 2), (4, 4), (100, 101)]);
        assert_eq!(minimize_intervals(s, 2), set(8, &[(0, 4), (100, 101)]));
    }

    #[test]
    fn test_result_is_superset() {
        let s = set(8, &[(0, 3), (9, 9), (17, 30), (77, 90)]);
        let m = minimize_intervals(s.clone(), 2);
        assert_eq!(m.number_of_intervals(), 2);
        for v in 0..=255u64 {
            let b = Bits::from_u64(v, 8);
            if s.covers(&b) {
                assert!(m.covers(&b), "{} lost by minimization", b);
            }
        }
    }

    #[test]
    fn test_empty_set() {
        let empty = IntervalSet::new(8);
        assert_eq!(minimize_intervals(empty.clone(), 0), empty);
        assert_eq!(minimize_intervals(empty.clone(), 3), empty);
    }

    #[test]
    #[should_panic(expected = "Cannot minimize a non-empty set to 0")]
    fn test_size_zero_panics_on_non_empty() {
        minimize_intervals(set(8, &[(1, 2), (4, 5)]), 0);
    }
}
