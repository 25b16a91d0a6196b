//! Conversions between interval sets and ternary vectors.
//!
//! The bridge gives bitwise operations an interval-set semantics: lift both
//! operands to ternary, evaluate bit by bit, and lower the result back to
//! intervals under an explicit precision budget. Every value in a set is
//! consistent with its extracted ternary vector; the reverse need not hold.

use std::collections::VecDeque;

use log::debug;

use crate::bits::Bits;
use crate::bits_ops;
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::ternary::{self, TernaryValue, TernaryVector};

/// Budget used by the bitwise transfer functions when lowering ternary
/// results: up to 4 unknown high bits are kept, so at most 16 intervals are
/// generated before normalization.
pub const DEFAULT_MAX_INTERVAL_BITS: usize = 4;

/// Known-bit information derived from an interval set: a mask of known
/// positions and their values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KnownBits {
    /// 1 where the bit is known.
    pub known_bits: Bits,
    /// The known bit values; 0 at unknown positions.
    pub known_bit_values: Bits,
}

fn extract_ternary_interval(interval: &Interval) -> TernaryVector {
    let size = interval.bit_count();
    let lcp = bits_ops::longest_common_prefix_msb(interval.lower_bound(), interval.upper_bound());
    let mut result = vec![TernaryValue::Unknown; size];
    for i in (size - lcp)..size {
        result[i] = TernaryValue::from_bool(interval.lower_bound().bit(i));
    }
    result
}

/// Extracts the per-bit knowledge shared by every value in the set.
///
/// For each interval the longest common most-significant prefix of the
/// bounds is known and the rest is unknown; intervals are folded together
/// with the ternary meet.
///
/// # Panics
///
/// Panics if the set is not normalized or is empty.
pub fn extract_ternary_vector(intervals: &IntervalSet) -> TernaryVector {
    assert!(
        intervals.is_normalized(),
        "extract_ternary_vector() requires a normalized set"
    );
    assert!(
        !intervals.is_empty(),
        "extract_ternary_vector() requires a non-empty set"
    );
    let mut result = extract_ternary_interval(&intervals.intervals()[0]);
    for interval in &intervals.intervals()[1..] {
        let t = extract_ternary_interval(interval);
        ternary::update_with_intersection(&mut result, &t);
    }
    result
}

/// Extracts the known-bits mask and values of the set.
///
/// # Panics
///
/// Panics if the set is not normalized or is empty.
pub fn extract_known_bits(intervals: &IntervalSet) -> KnownBits {
    let result = extract_ternary_vector(intervals);
    KnownBits {
        known_bits: ternary::to_known_bits(&result),
        known_bit_values: ternary::to_known_bits_values(&result),
    }
}

/// Converts a ternary vector to an interval set.
///
/// `max_interval_bits` bounds how many unknown bits outside the low
/// unknown run are preserved exactly; the result has at most
/// `2^max_interval_bits` intervals before normalization. Unknown bits beyond
/// the budget are absorbed into the contiguous low run, widening each
/// interval instead of multiplying the interval count.
pub fn from_ternary(tern: &[TernaryValue], max_interval_bits: usize) -> IntervalSet {
    if ternary::is_fully_known(tern) {
        return IntervalSet::precise(ternary::to_known_bits_values(tern));
    }
    // Count of trailing unknown bits; these form the low run and define the
    // size of each generated interval.
    let mut lsb_xs = tern
        .iter()
        .position(|t| t.is_known())
        .unwrap_or(tern.len());
    // Slide a window over the remaining unknown positions; on overflow the
    // oldest position falls out and will be absorbed into the low run.
    let mut x_locations: VecDeque<usize> = VecDeque::new();
    for (i, t) in tern.iter().enumerate().skip(lsb_xs) {
        if t.is_unknown() {
            x_locations.push_back(i);
            if x_locations.len() > max_interval_bits + 1 {
                x_locations.pop_front();
            }
        }
    }
    if x_locations.len() > max_interval_bits {
        // Extend the low run upward so the oldest retained unknown bit (and
        // everything below it) is covered by interval width instead.
        lsb_xs = x_locations.pop_front().unwrap() + 1;
        debug!(
            "from_ternary: budget {} exceeded, low run extended to {} bits",
            max_interval_bits, lsb_xs
        );
    }

    let mut result = IntervalSet::new(tern.len());
    if x_locations.is_empty() {
        // Everything below `lsb_xs` is unknown; above it all bits are known.
        let high_bits = ternary::to_known_bits_values(&tern[lsb_xs..]);
        result.add_interval(Interval::new(
            bits_ops::concat(&[high_bits.clone(), Bits::zero(lsb_xs)]),
            bits_ops::concat(&[high_bits, Bits::all_ones(lsb_xs)]),
        ));
        result.normalize();
        return result;
    }

    let high: TernaryVector = tern[lsb_xs..].to_vec();
    let low_zeros = Bits::zero(lsb_xs);
    let low_ones = Bits::all_ones(lsb_xs);
    for v in ternary::all_bits_values(&high) {
        result.add_interval(Interval::new(
            bits_ops::concat(&[v.clone(), low_zeros.clone()]),
            bits_ops::concat(&[v, low_ones.clone()]),
        ));
    }
    result.normalize();
    result
}

/// Collapses a 1-bit set to a single ternary value.
pub(crate) fn one_bit_range_to_ternary(set: &IntervalSet) -> TernaryValue {
    assert_eq!(set.bit_count(), 1, "Expected a 1-bit set");
    if set.is_precise() {
        if set.covers_zero() {
            TernaryValue::KnownZero
        } else {
            TernaryValue::KnownOne
        }
    } else {
        TernaryValue::Unknown
    }
}

/// Lifts a single ternary value to a 1-bit set.
pub(crate) fn ternary_to_one_bit_range(value: TernaryValue) -> IntervalSet {
    match value {
        TernaryValue::KnownZero => IntervalSet::precise(Bits::zero(1)),
        TernaryValue::KnownOne => IntervalSet::precise(Bits::from_u64(1, 1)),
        TernaryValue::Unknown => IntervalSet::maximal(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn iv(lo: u64, hi: u64, w: usize) -> Interval {
        Interval::new(Bits::from_u64(lo, w), Bits::from_u64(hi, w))
    }

    fn set(w: usize, ivs: &[(u64, u64)]) -> IntervalSet {
        IntervalSet::of(w, ivs.iter().map(|&(lo, hi)| iv(lo, hi, w)).collect())
    }

    // Parses an MSB-first string like "X10" into an (LSB-first) vector.
    fn tv(s: &str) -> TernaryVector {
        s.chars()
            .rev()
            .map(|c| match c {
                '0' => TernaryValue::KnownZero,
                '1' => TernaryValue::KnownOne,
                'X' => TernaryValue::Unknown,
                _ => panic!("bad ternary char {c}"),
            })
            .collect()
    }

    #[test]
    fn test_extract_single_interval() {
        // [8, 11] = 0b10_00 .. 0b10_11: top two bits known.
        assert_eq!(extract_ternary_vector(&set(4, &[(8, 11)])), tv("10XX"));
        // A precise set is fully known.
        assert_eq!(
            extract_ternary_vector(&IntervalSet::precise(Bits::from_u64(9, 4))),
            tv("1001")
        );
    }

    #[test]
    fn test_extract_folds_intervals() {
        // {4..5} gives 010X, {12..13} gives 110X; meet is X10X.
        assert_eq!(extract_ternary_vector(&set(4, &[(4, 5), (12, 13)])), tv("X10X"));
    }

    #[test]
    fn test_extract_maximal_is_all_unknown() {
        assert_eq!(extract_ternary_vector(&IntervalSet::maximal(3)), tv("XXX"));
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn test_extract_empty_panics() {
        extract_ternary_vector(&IntervalSet::new(4));
    }

    #[test]
    fn test_extract_known_bits() {
        let kb = extract_known_bits(&set(4, &[(8, 11)]));
        assert_eq!(kb.known_bits, Bits::from_u64(0b1100, 4));
        assert_eq!(kb.known_bit_values, Bits::from_u64(0b1000, 4));
    }

    #[test]
    fn test_from_ternary_fully_known() {
        assert_eq!(
            from_ternary(&tv("1010"), DEFAULT_MAX_INTERVAL_BITS),
            IntervalSet::precise(Bits::from_u64(10, 4))
        );
    }

    #[test]
    fn test_from_ternary_low_run_only() {
        // 10XX: low two bits unknown, one interval.
        assert_eq!(
            from_ternary(&tv("10XX"), DEFAULT_MAX_INTERVAL_BITS),
            set(4, &[(8, 11)])
        );
    }

    #[test]
    fn test_from_ternary_high_unknowns_enumerate() {
        // XX01 with room in the budget: four precise values.
        assert_eq!(
            from_ternary(&tv("XX01"), DEFAULT_MAX_INTERVAL_BITS),
            set(4, &[(1, 1), (5, 5), (9, 9), (13, 13)])
        );
    }

    #[test]
    fn test_from_ternary_budget_absorbs_into_low_run() {
        // X0X1 with budget 1: the lower interior unknown (bit 1) falls out
        // of the window, extending the low run to cover bits 0..2.
        assert_eq!(from_ternary(&tv("X0X1"), 1), set(4, &[(0, 3), (8, 11)]));
        // Budget 0 absorbs every unknown: one interval spanning the hull of
        // the consistent values.
        assert_eq!(from_ternary(&tv("X0X1"), 0), set(4, &[(0, 15)]));
    }

    #[test]
    fn test_from_ternary_all_unknown() {
        assert_eq!(from_ternary(&tv("XXXX"), 2), IntervalSet::maximal(4));
    }

    #[test]
    fn test_round_trip_superset() {
        // Extraction then lowering may lose precision but never values.
        let s = set(4, &[(3, 5), (9, 9)]);
        let back = from_ternary(&extract_ternary_vector(&s), 4);
        for v in 0..16u64 {
            let b = Bits::from_u64(v, 4);
            if s.covers(&b) {
                assert!(back.covers(&b), "{} lost in round trip", b);
            }
        }
    }

    #[test]
    fn test_round_trip_tight_for_prefix_interval() {
        // A single interval whose bounds share an MSB prefix and whose
        // suffix spans the full range is exactly ternary-representable.
        let s = set(4, &[(8, 11)]);
        let back = from_ternary(&extract_ternary_vector(&s), 4);
        assert_eq!(back, s);
    }

    #[test]
    fn test_one_bit_range_helpers() {
        use TernaryValue::*;
        assert_eq!(one_bit_range_to_ternary(&IntervalSet::precise(Bits::zero(1))), KnownZero);
        assert_eq!(
            one_bit_range_to_ternary(&IntervalSet::precise(Bits::from_u64(1, 1))),
            KnownOne
        );
        assert_eq!(one_bit_range_to_ternary(&IntervalSet::maximal(1)), Unknown);
        assert_eq!(ternary_to_one_bit_range(KnownZero), IntervalSet::precise(Bits::zero(1)));
        assert_eq!(ternary_to_one_bit_range(Unknown), IntervalSet::maximal(1));
    }
}
