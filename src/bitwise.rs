//! Bitwise and reduction transfer functions.
//!
//! Bitwise operations have no monotone structure across bit positions, so
//! they are evaluated through the ternary bridge: lift each operand to a
//! ternary vector, evaluate per bit, and lower the result back to intervals.
//! One-bit operands take a fast path that avoids vector allocations.

use crate::bits_ops;
use crate::convert::{
    extract_ternary_vector, from_ternary, one_bit_range_to_ternary, ternary_to_one_bit_range,
    DEFAULT_MAX_INTERVAL_BITS,
};
use crate::interval_set::IntervalSet;
use crate::ternary::{self, TernaryValue};

fn assert_same_width(lhs: &IntervalSet, rhs: &IntervalSet) {
    assert_eq!(
        lhs.bit_count(),
        rhs.bit_count(),
        "Operand widths differ: {} vs {}",
        lhs.bit_count(),
        rhs.bit_count()
    );
}

/// Abstract bitwise complement.
pub fn not(arg: &IntervalSet) -> IntervalSet {
    if arg.bit_count() == 1 {
        return ternary_to_one_bit_range(ternary::not_value(one_bit_range_to_ternary(arg)));
    }
    let vec = extract_ternary_vector(arg);
    from_ternary(&ternary::bitwise_not(&vec), DEFAULT_MAX_INTERVAL_BITS)
}

/// Abstract bitwise and.
pub fn and(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    if lhs.bit_count() == 1 {
        return ternary_to_one_bit_range(ternary::and_value(
            one_bit_range_to_ternary(lhs),
            one_bit_range_to_ternary(rhs),
        ));
    }
    let result = ternary::bitwise_and(&extract_ternary_vector(lhs), &extract_ternary_vector(rhs));
    from_ternary(&result, DEFAULT_MAX_INTERVAL_BITS)
}

/// Abstract bitwise or.
pub fn or(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    if lhs.bit_count() == 1 {
        return ternary_to_one_bit_range(ternary::or_value(
            one_bit_range_to_ternary(lhs),
            one_bit_range_to_ternary(rhs),
        ));
    }
    let result = ternary::bitwise_or(&extract_ternary_vector(lhs), &extract_ternary_vector(rhs));
    from_ternary(&result, DEFAULT_MAX_INTERVAL_BITS)
}

/// Abstract bitwise xor.
pub fn xor(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    if lhs.bit_count() == 1 {
        return ternary_to_one_bit_range(ternary::xor_value(
            one_bit_range_to_ternary(lhs),
            one_bit_range_to_ternary(rhs),
        ));
    }
    let result = ternary::bitwise_xor(&extract_ternary_vector(lhs), &extract_ternary_vector(rhs));
    from_ternary(&result, DEFAULT_MAX_INTERVAL_BITS)
}

/// Abstract and-reduction: 1 iff every bit of the input is one.
///
/// Unless the set covers the all-ones value the reduction must be zero; a
/// precise set covering it must reduce to one.
pub fn and_reduce(arg: &IntervalSet) -> IntervalSet {
    if !arg.covers_max() {
        return ternary_to_one_bit_range(TernaryValue::KnownZero);
    }
    if arg.is_precise() {
        return ternary_to_one_bit_range(TernaryValue::KnownOne);
    }
    ternary_to_one_bit_range(TernaryValue::Unknown)
}

/// Abstract or-reduction: 1 iff any bit of the input is one.
///
/// Unless the set covers zero the reduction must be one; a precise set
/// covering zero must reduce to zero.
pub fn or_reduce(arg: &IntervalSet) -> IntervalSet {
    if !arg.covers_zero() {
        return ternary_to_one_bit_range(TernaryValue::KnownOne);
    }
    if arg.is_precise() {
        return ternary_to_one_bit_range(TernaryValue::KnownZero);
    }
    ternary_to_one_bit_range(TernaryValue::Unknown)
}

/// Abstract xor-reduction: the parity of the set bits.
///
/// Incrementing a value always flips its parity, so any imprecise interval
/// forces an unknown result. When every interval is a singleton the
/// parities can be compared directly.
pub fn xor_reduce(arg: &IntervalSet) -> IntervalSet {
    let intervals = arg.intervals();
    let first = match intervals.first() {
        Some(interval) if interval.is_precise() => interval,
        _ => return ternary_to_one_bit_range(TernaryValue::Unknown),
    };
    let output = bits_ops::xor_reduce(first.precise_value().expect("precise interval"));
    for interval in &intervals[1..] {
        match interval.precise_value() {
            Some(value) if bits_ops::xor_reduce(value) == output => {}
            _ => return ternary_to_one_bit_range(TernaryValue::Unknown),
        }
    }
    ternary_to_one_bit_range(TernaryValue::from_bool(output.is_one()))
}
