//! Comparison, gating, and one-hot transfer functions.
//!
//! Comparisons produce 1-bit interval sets: precise zero, precise one, or
//! maximal (unknown). Unsigned comparisons work on convex hulls; signed
//! comparisons reduce to unsigned ones, either directly when both operands
//! sit in a single sign class or by biasing both sides with `2^(w-1)`.

use crate::arith::add;
use crate::bits::Bits;
use crate::bits_ops;
use crate::bitwise::not;
use crate::convert::{extract_ternary_vector, from_ternary, ternary_to_one_bit_range};
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::ternary::{self, TernaryValue};

/// Which end of the input a one-hot encoding prioritizes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LsbOrMsb {
    Lsb,
    Msb,
}

fn assert_same_width(lhs: &IntervalSet, rhs: &IntervalSet) {
    assert_eq!(
        lhs.bit_count(),
        rhs.bit_count(),
        "Operand widths differ: {} vs {}",
        lhs.bit_count(),
        rhs.bit_count()
    );
}

/// Abstract equality test.
pub fn eq(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    if lhs.is_precise() && rhs.is_precise() {
        let equal = lhs.precise_value() == rhs.precise_value();
        return ternary_to_one_bit_range(TernaryValue::from_bool(equal));
    }
    if IntervalSet::disjoint(lhs, rhs) {
        ternary_to_one_bit_range(TernaryValue::KnownZero)
    } else {
        ternary_to_one_bit_range(TernaryValue::Unknown)
    }
}

/// Abstract inequality test.
pub fn ne(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    not(&eq(lhs, rhs))
}

/// Abstract unsigned less-than.
///
/// Decidable exactly when the convex hulls are disjoint.
pub fn ult(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    let lhs_hull = lhs.convex_hull().expect("ult() requires non-empty operands");
    let rhs_hull = rhs.convex_hull().expect("ult() requires non-empty operands");
    if Interval::disjoint(&lhs_hull, &rhs_hull) {
        ternary_to_one_bit_range(TernaryValue::from_bool(lhs_hull < rhs_hull))
    } else {
        ternary_to_one_bit_range(TernaryValue::Unknown)
    }
}

/// Abstract unsigned greater-than.
pub fn ugt(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    let lhs_hull = lhs.convex_hull().expect("ugt() requires non-empty operands");
    let rhs_hull = rhs.convex_hull().expect("ugt() requires non-empty operands");
    if Interval::disjoint(&lhs_hull, &rhs_hull) {
        ternary_to_one_bit_range(TernaryValue::from_bool(lhs_hull > rhs_hull))
    } else {
        ternary_to_one_bit_range(TernaryValue::Unknown)
    }
}

fn is_all_negative(set: &IntervalSet) -> bool {
    set.lower_bound().expect("non-empty set").msb() && set.upper_bound().expect("non-empty set").msb()
}

fn is_all_positive(set: &IntervalSet) -> bool {
    !set.lower_bound().expect("non-empty set").msb()
        && !set.upper_bound().expect("non-empty set").msb()
}

/// The signed bias `2^(w-1)` as a precise set.
fn signed_offset(width: usize) -> IntervalSet {
    IntervalSet::precise(bits_ops::concat(&[Bits::from_u64(1, 1), Bits::zero(width - 1)]))
}

/// Abstract signed less-than.
///
/// When both operands lie entirely in one sign class the unsigned order
/// agrees with the signed one. Otherwise both sides are biased by
/// `2^(w-1)`, which maps signed order onto unsigned order; the bias goes
/// through the interval [`add`], so it may coarsen precision.
pub fn slt(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    assert!(lhs.is_normalized() && rhs.is_normalized(), "slt() requires normalized sets");
    if (is_all_positive(lhs) && is_all_positive(rhs))
        || (is_all_negative(lhs) && is_all_negative(rhs))
    {
        return ult(lhs, rhs);
    }
    let offset = signed_offset(lhs.bit_count());
    ult(&add(lhs, &offset), &add(rhs, &offset))
}

/// Abstract signed greater-than.
pub fn sgt(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    assert!(lhs.is_normalized() && rhs.is_normalized(), "sgt() requires normalized sets");
    if (is_all_positive(lhs) && is_all_positive(rhs))
        || (is_all_negative(lhs) && is_all_negative(rhs))
    {
        return ugt(lhs, rhs);
    }
    let offset = signed_offset(lhs.bit_count());
    ugt(&add(lhs, &offset), &add(rhs, &offset))
}

/// Abstract gate: a 1-bit condition masking a value.
///
/// A zero condition forces a zero result; a nonzero condition passes the
/// value through unchanged.
pub fn gate(cond: &IntervalSet, val: &IntervalSet) -> IntervalSet {
    assert_eq!(cond.bit_count(), 1, "Gate condition must be 1 bit");
    if cond.is_precise() {
        if cond.covers_zero() {
            return IntervalSet::precise(Bits::zero(val.bit_count()));
        }
        return val.clone();
    }
    if cond.covers_zero() {
        // The condition may be zero or one, so the result may be gated off.
        return IntervalSet::combine(val, &IntervalSet::precise(Bits::zero(val.bit_count())));
    }
    val.clone()
}

/// Abstract one-hot encoding.
///
/// The result has `val.bit_count() + 1` bits; the extra top bit fires when
/// the input is all zeros. `max_interval_bits` bounds the precision of the
/// lowering exactly as in [`from_ternary`].
pub fn one_hot(val: &IntervalSet, priority: LsbOrMsb, max_interval_bits: usize) -> IntervalSet {
    let src = extract_ternary_vector(val);
    let result = match priority {
        LsbOrMsb::Lsb => ternary::one_hot_lsb_to_msb(&src),
        LsbOrMsb::Msb => ternary::one_hot_msb_to_lsb(&src),
    };
    from_ternary(&result, max_interval_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::interval::Interval;

    fn iv(lo: u64, hi: u64, w: usize) -> Interval {
        Interval::new(Bits::from_u64(lo, w), Bits::from_u64(hi, w))
    }

    fn set(w: usize, ivs: &[(u64, u64)]) -> IntervalSet {
        IntervalSet::of(w, ivs.iter().map(|&(lo, hi)| iv(lo, hi, w)).collect())
    }

    fn precise(v: u64, w: usize) -> IntervalSet {
        IntervalSet::precise(Bits::from_u64(v, w))
    }

    fn known_one() -> IntervalSet {
        precise(1, 1)
    }

    fn known_zero() -> IntervalSet {
        precise(0, 1)
    }

    #[test]
    fn test_eq() {
        assert_eq!(eq(&precise(5, 8), &precise(5, 8)), known_one());
        assert_eq!(eq(&precise(5, 8), &precise(6, 8)), known_zero());
        // Disjoint sets can never be equal.
        assert_eq!(eq(&set(8, &[(0, 3)]), &set(8, &[(5, 9)])), known_zero());
        // Overlapping imprecise sets are undecided.
        assert_eq!(eq(&set(8, &[(0, 5)]), &set(8, &[(5, 9)])), IntervalSet::maximal(1));
    }

    #[test]
    fn test_ne() {
        assert_eq!(ne(&precise(5, 8), &precise(5, 8)), known_zero());
        assert_eq!(ne(&set(8, &[(0, 3)]), &set(8, &[(5, 9)])), known_one());
        assert_eq!(ne(&set(8, &[(0, 5)]), &set(8, &[(5, 9)])), IntervalSet::maximal(1));
    }

    #[test]
    fn test_ult_disjoint_hulls() {
        assert_eq!(ult(&set(8, &[(0, 3)]), &set(8, &[(10, 20)])), known_one());
        assert_eq!(ult(&set(8, &[(10, 20)]), &set(8, &[(0, 3)])), known_zero());
    }

    #[test]
    fn test_ult_overlapping_hulls() {
        // Hulls overlap even though the sets are disjoint.
        assert_eq!(
            ult(&set(8, &[(0, 0), (9, 9)]), &set(8, &[(4, 5)])),
            IntervalSet::maximal(1)
        );
    }

    #[test]
    fn test_ugt() {
        assert_eq!(ugt(&set(8, &[(10, 20)]), &set(8, &[(0, 3)])), known_one());
        assert_eq!(ugt(&set(8, &[(0, 3)]), &set(8, &[(10, 20)])), known_zero());
        assert_eq!(ugt(&set(8, &[(0, 5)]), &set(8, &[(3, 9)])), IntervalSet::maximal(1));
    }

    #[test]
    fn test_slt_crossing_sign_classes() {
        // 0xFF is -1 signed and 0x01 is 1. Biasing 0xFF by 0x80 overflows
        // on both corners, so the biased operand collapses to maximal and
        // the comparison stays undecided.
        assert_eq!(slt(&precise(0xFF, 8), &precise(0x01, 8)), IntervalSet::maximal(1));
        assert_eq!(sgt(&precise(0xFF, 8), &precise(0x01, 8)), IntervalSet::maximal(1));
    }

    #[test]
    fn test_slt_same_sign_class_uses_unsigned() {
        // Both negative: 0x80 (-128) < 0xFF (-1).
        assert_eq!(slt(&precise(0x80, 8), &precise(0xFF, 8)), known_one());
        // Both positive.
        assert_eq!(slt(&precise(3, 8), &precise(100, 8)), known_one());
        assert_eq!(slt(&precise(100, 8), &precise(3, 8)), known_zero());
    }

    #[test]
    fn test_slt_undecided() {
        assert_eq!(
            slt(&set(8, &[(0, 200)]), &set(8, &[(5, 10)])),
            IntervalSet::maximal(1)
        );
    }

    #[test]
    fn test_gate_precise_conditions() {
        let val = set(8, &[(5, 9)]);
        assert_eq!(gate(&known_zero(), &val), precise(0, 8));
        assert_eq!(gate(&known_one(), &val), val);
    }

    #[test]
    fn test_gate_unknown_condition_mixes_in_zero() {
        let val = set(8, &[(5, 9)]);
        assert_eq!(
            gate(&IntervalSet::maximal(1), &val),
            set(8, &[(0, 0), (5, 9)])
        );
    }

    #[test]
    fn test_one_hot_precise() {
        // Lowest set bit of 0b0110 is bit 1.
        assert_eq!(
            one_hot(&precise(0b0110, 4), LsbOrMsb::Lsb, 4),
            precise(0b00010, 5)
        );
        // Highest set bit of 0b0110 is bit 2.
        assert_eq!(
            one_hot(&precise(0b0110, 4), LsbOrMsb::Msb, 4),
            precise(0b00100, 5)
        );
        // All-zero input fires the extra top bit.
        assert_eq!(
            one_hot(&precise(0, 4), LsbOrMsb::Lsb, 4),
            precise(0b10000, 5)
        );
    }

    #[test]
    fn test_one_hot_has_widened_output() {
        let result = one_hot(&set(4, &[(0, 15)]), LsbOrMsb::Lsb, 4);
        assert_eq!(result.bit_count(), 5);
        // Every one-hot output of a 4-bit input is covered.
        for v in [1u64, 2, 4, 8, 16] {
            assert!(result.covers(&Bits::from_u64(v, 5)));
        }
    }
}
