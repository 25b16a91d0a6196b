//! Arithmetic and width-changing transfer functions.
//!
//! Each function maps operand interval sets to an interval set that covers
//! every result the concrete operation can produce on values drawn from the
//! operands. All results are normalized.

use crate::bits::Bits;
use crate::bits_ops;
use crate::harness::{perform_binary_op, perform_unary_op, perform_variadic_op, OverflowResult, Tonicity};
use crate::interval::Interval;
use crate::interval_set::IntervalSet;

fn assert_same_width(lhs: &IntervalSet, rhs: &IntervalSet) {
    assert_eq!(
        lhs.bit_count(),
        rhs.bit_count(),
        "Operand widths differ: {} vs {}",
        lhs.bit_count(),
        rhs.bit_count()
    );
}

/// Abstract wrap-around addition.
pub fn add(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    perform_binary_op(
        |l, r| {
            // Add in w+1 bits; the padded MSB is the carry out of bit w.
            let padded_size = l.bit_count().max(r.bit_count()) + 1;
            let padded = bits_ops::add(
                &bits_ops::zero_extend(l, padded_size),
                &bits_ops::zero_extend(r, padded_size),
            );
            OverflowResult {
                result: bits_ops::truncate(&padded, padded_size - 1),
                first_overflow_bit: padded.get_from_msb(0),
                second_overflow_bit: false,
            }
        },
        lhs,
        Tonicity::Monotone,
        rhs,
        Tonicity::Monotone,
        lhs.bit_count(),
    )
}

/// Abstract wrap-around subtraction.
pub fn sub(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    perform_binary_op(
        |l, r| OverflowResult {
            // x - y borrows exactly when x < y.
            result: bits_ops::sub(l, r),
            first_overflow_bit: bits_ops::ult(l, r),
            second_overflow_bit: false,
        },
        lhs,
        Tonicity::Monotone,
        rhs,
        Tonicity::Antitone,
        lhs.bit_count(),
    )
}

/// Abstract two's complement negation.
pub fn neg(arg: &IntervalSet) -> IntervalSet {
    perform_unary_op(
        |b| OverflowResult::exact(bits_ops::negate(b)),
        arg,
        Tonicity::Antitone,
        arg.bit_count(),
    )
}

/// Abstract unsigned multiplication with an explicit output width.
pub fn umul(lhs: &IntervalSet, rhs: &IntervalSet, output_bit_count: usize) -> IntervalSet {
    perform_binary_op(
        |l, r| {
            let product = bits_ops::umul(l, r);
            let msb_set_bit = product.highest_set_bit();
            OverflowResult {
                result: Bits::from_biguint_truncating(product.value().clone(), output_bit_count),
                first_overflow_bit: msb_set_bit.is_some_and(|m| m >= output_bit_count),
                second_overflow_bit: msb_set_bit.is_some_and(|m| m >= output_bit_count + 1),
            }
        },
        lhs,
        Tonicity::Monotone,
        rhs,
        Tonicity::Monotone,
        output_bit_count,
    )
}

/// Abstract unsigned division.
///
/// Division is antitone in the divisor for every divisor except zero, and
/// division by zero is defined to produce the all-ones value. A divisor set
/// covering zero is split: the nonzero part goes through the ordinary
/// transfer and the result of dividing by zero is unioned in afterwards.
pub fn udiv(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
    assert_same_width(lhs, rhs);
    let calc = |l: &Bits, r: &Bits| OverflowResult::exact(bits_ops::udiv(l, r));
    if !rhs.covers_zero() {
        return perform_binary_op(
            calc,
            lhs,
            Tonicity::Monotone,
            rhs,
            Tonicity::Antitone,
            lhs.bit_count(),
        );
    }
    let nonzero_divisor = IntervalSet::intersect(rhs, &IntervalSet::nonzero(rhs.bit_count()));
    let mut results = IntervalSet::new(lhs.bit_count());
    if !nonzero_divisor.is_empty() {
        results = perform_binary_op(
            calc,
            lhs,
            Tonicity::Monotone,
            &nonzero_divisor,
            Tonicity::Antitone,
            lhs.bit_count(),
        );
    }
    results.add_interval(Interval::precise(Bits::all_ones(lhs.bit_count())));
    results.normalize();
    results
}

/// Abstract sign extension to `width` bits.
pub fn sign_extend(arg: &IntervalSet, width: usize) -> IntervalSet {
    perform_unary_op(
        |b| OverflowResult::exact(bits_ops::sign_extend(b, width)),
        arg,
        Tonicity::Monotone,
        width,
    )
}

/// Abstract zero extension to `width` bits.
pub fn zero_extend(arg: &IntervalSet, width: usize) -> IntervalSet {
    perform_unary_op(
        |b| OverflowResult::exact(bits_ops::zero_extend(b, width)),
        arg,
        Tonicity::Monotone,
        width,
    )
}

/// Abstract truncation to the low `width` bits.
///
/// An interval spanning at least `2^width` values covers every truncated
/// value, so the result collapses to maximal. Otherwise each interval
/// truncates bound-wise; a truncated interval may wrap (become improper)
/// and is split by normalization.
pub fn truncate(arg: &IntervalSet, width: usize) -> IntervalSet {
    assert!(
        width <= arg.bit_count(),
        "Cannot truncate from {} to {} bits",
        arg.bit_count(),
        width
    );
    let mut result = IntervalSet::new(width);
    let output_space = Bits::all_ones(width);
    for interval in arg.intervals() {
        let span = bits_ops::sub(interval.upper_bound(), interval.lower_bound());
        if span.value() > output_space.value() {
            return IntervalSet::maximal(width);
        }
        result.add_interval(Interval::new(
            interval.lower_bound().slice(0, width),
            interval.upper_bound().slice(0, width),
        ));
    }
    result.normalize();
    result
}

/// Abstract concatenation, first operand most significant.
///
/// Prepending high bits preserves unsigned order, so concatenation is
/// monotone in every operand.
pub fn concat(sets: &[IntervalSet]) -> IntervalSet {
    let result_width = sets.iter().map(|s| s.bit_count()).sum();
    perform_variadic_op(
        |bits| OverflowResult::exact(bits_ops::concat(bits)),
        &vec![Tonicity::Monotone; sets.len()],
        sets,
        result_width,
    )
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

    fn precise(v: u64, w: usize) -> IntervalSet {
        IntervalSet::precise(Bits::from_u64(v, w))
    }

    #[test]
    fn test_add_shifts_interval() {
        // Precise(5) + [3, 7] = [8, 12].
        assert_eq!(add(&precise(5, 8), &set(8, &[(3, 7)])), set(8, &[(8, 12)]));
    }

    #[test]
    fn test_add_of_singletons_is_exact() {
        assert_eq!(add(&precise(3, 8), &precise(4, 8)), precise(7, 8));
    }

    #[test]
    fn test_add_both_corners_overflow_is_maximal() {
        // Both corners carry out of bit 8, so the result is unconstrained.
        assert_eq!(
            add(&precise(0xFF, 8), &set(8, &[(0x80, 0x90)])),
            IntervalSet::maximal(8)
        );
    }

    #[test]
    fn test_add_one_sided_overflow_wraps() {
        // [250, 255] + [0, 10]: only the upper corner carries.
        let result = add(&set(8, &[(250, 255)]), &set(8, &[(0, 10)]));
        assert_eq!(result, set(8, &[(0, 9), (250, 255)]));
    }

    #[test]
    fn test_sub_both_corners_borrow_is_maximal() {
        // 10-25 and 12-20 both borrow, so the result is unconstrained.
        assert_eq!(
            sub(&set(8, &[(10, 12)]), &set(8, &[(20, 25)])),
            IntervalSet::maximal(8)
        );
    }

    #[test]
    fn test_sub_straddling_zero() {
        // [5, 5] - [3, 7]: borrows only when the subtrahend exceeds 5.
        assert_eq!(sub(&precise(5, 8), &set(8, &[(3, 7)])), set(8, &[(0, 2), (254, 255)]));
    }

    #[test]
    fn test_neg() {
        assert_eq!(neg(&precise(0, 8)), precise(0, 8));
        assert_eq!(neg(&precise(10, 8)), precise(246, 8));
        // -[10, 20] = [236, 246].
        assert_eq!(neg(&set(8, &[(10, 20)])), set(8, &[(236, 246)]));
        // Negating a range through zero splits at the wrap.
        assert_eq!(neg(&set(8, &[(0, 5)])), set(8, &[(0, 0), (251, 255)]));
    }

    #[test]
    fn test_umul_fits() {
        // [2, 3] * [2, 3] at width 4: products 4..9 all fit.
        assert_eq!(umul(&set(4, &[(2, 3)]), &set(4, &[(2, 3)]), 4), set(4, &[(4, 9)]));
    }

    #[test]
    fn test_umul_one_sided_overflow() {
        // At width 3 only the upper corner (9) overflows: the image wraps
        // into [4, 7] and [0, 1].
        assert_eq!(umul(&set(4, &[(2, 3)]), &set(4, &[(2, 3)]), 3), set(3, &[(0, 1), (4, 7)]));
    }

    #[test]
    fn test_umul_double_overflow_is_maximal() {
        // 15 * 15 = 225 needs 8 bits; at width 4 the corners lap the space.
        assert_eq!(umul(&set(4, &[(0, 15)]), &set(4, &[(0, 15)]), 4), IntervalSet::maximal(4));
    }

    #[test]
    fn test_udiv_simple() {
        assert_eq!(udiv(&set(8, &[(10, 20)]), &precise(2, 8)), set(8, &[(5, 10)]));
    }

    #[test]
    fn test_udiv_by_exactly_zero() {
        assert_eq!(udiv(&set(8, &[(10, 20)]), &precise(0, 8)), precise(255, 8));
    }

    #[test]
    fn test_udiv_divisor_covering_zero() {
        // Divisor {0, 1, 2}: nonzero part gives [5, 20], dividing by zero
        // adds {255}.
        assert_eq!(
            udiv(&set(8, &[(10, 20)]), &set(8, &[(0, 2)])),
            set(8, &[(5, 20), (255, 255)])
        );
    }

    #[test]
    fn test_extends() {
        assert_eq!(zero_extend(&set(4, &[(3, 9)]), 8), set(8, &[(3, 9)]));
        // [0b0010, 0b1010] sign-extends to [0b0000_0010, 0b1111_1010]; the
        // negative half maps above the positive half.
        assert_eq!(sign_extend(&set(4, &[(2, 10)]), 8), set(8, &[(2, 250)]));
        assert_eq!(sign_extend(&precise(0b1010, 4), 8), precise(0b1111_1010, 8));
    }

    #[test]
    fn test_truncate_narrow_interval() {
        assert_eq!(truncate(&set(8, &[(5, 9)]), 4), set(4, &[(5, 9)]));
    }

    #[test]
    fn test_truncate_wrapping_interval() {
        // [14, 17] truncated to 4 bits becomes the improper [14, 1], which
        // splits at the wrap.
        assert_eq!(truncate(&set(8, &[(14, 17)]), 4), set(4, &[(0, 1), (14, 15)]));
    }

    #[test]
    fn test_truncate_wide_interval_is_maximal() {
        // [0, 200] spans more than 2^4 values.
        assert_eq!(truncate(&set(8, &[(0, 200)]), 4), IntervalSet::maximal(4));
    }

    #[test]
    fn test_concat() {
        // {1} ++ [0, 3] over u2/u4 = [0b01_0000, 0b01_0011].
        assert_eq!(
            concat(&[precise(1, 2), set(4, &[(0, 3)])]),
            set(6, &[(16, 19)])
        );
    }

    #[test]
    fn test_concat_multiple_intervals() {
        let result = concat(&[set(2, &[(0, 0), (2, 2)]), set(2, &[(1, 1)])]);
        assert_eq!(result, set(4, &[(1, 1), (9, 9)]));
    }

    #[test]
    #[should_panic(expected = "Operand widths differ")]
    fn test_add_width_mismatch_panics() {
        add(&precise(1, 4), &precise(1, 8));
    }
}
