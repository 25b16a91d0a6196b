//! Shared machinery for arithmetic transfer functions.
//!
//! Most arithmetic operations are monotone or antitone in each operand, so
//! their image over a box of intervals is determined by corner values. The
//! harness enumerates one interval per operand (a mixed-radix counter over
//! the operand interval lists), evaluates the concrete operation at the
//! tonicity-directed corners, and classifies the per-corner overflow
//! behavior into output intervals.

use log::debug;

use crate::bits::Bits;
use crate::bits_ops;
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::minimize::minimize_intervals;

/// Direction of monotonicity of an operation in one operand.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Tonicity {
    /// Non-decreasing: larger operand, larger (or equal) result.
    Monotone,
    /// Non-increasing: larger operand, smaller (or equal) result.
    Antitone,
}

/// The concrete result of an operation at one corner, with overflow flags.
#[derive(Debug, Clone)]
pub struct OverflowResult {
    /// The operation result, truncated to the output width.
    pub result: Bits,
    /// Set if the un-truncated result would carry into bit `w + 1`.
    pub first_overflow_bit: bool,
    /// Set if the un-truncated result would carry into bit `w + 2`.
    pub second_overflow_bit: bool,
}

impl OverflowResult {
    /// Wraps a result that cannot overflow.
    pub fn exact(result: Bits) -> Self {
        Self {
            result,
            first_overflow_bit: false,
            second_overflow_bit: false,
        }
    }
}

/// Maximum number of intervals retained per operand (for the first twelve
/// operands; later operands are collapsed to their convex hull). Caps the
/// corner enumeration at `5^12` combinations.
const MAX_INTERVALS_PER_OPERAND: usize = 5;
const WIDE_OPERAND_LIMIT: usize = 12;

/// Maximum number of intervals in a harness result.
const MAX_RESULT_INTERVALS: usize = 16;

/// Iterates the mixed-radix space `[0, radix[0]) × ... × [0, radix[n-1])`.
///
/// The callback returns true to short-circuit; the function returns true if
/// it did. A zero radix anywhere makes the space empty.
pub fn mixed_radix_iterate(radix: &[usize], mut f: impl FnMut(&[usize]) -> bool) -> bool {
    if radix.iter().any(|&r| r == 0) {
        return false;
    }
    let mut indexes = vec![0usize; radix.len()];
    loop {
        if f(&indexes) {
            return true;
        }
        let mut position = 0;
        loop {
            if position == radix.len() {
                return false;
            }
            indexes[position] += 1;
            if indexes[position] < radix[position] {
                break;
            }
            indexes[position] = 0;
            position += 1;
        }
    }
}

/// Applies a concrete operation abstractly over any number of operands.
///
/// `calc` evaluates the operation on one concrete value per operand and
/// reports overflow; `tonicities` gives the operation's direction in each
/// operand. The result is normalized and holds at most 16 intervals.
///
/// Any empty operand set yields an empty result.
///
/// # Panics
///
/// Panics if `tonicities` and `input_operands` have different lengths.
pub fn perform_variadic_op<F>(
    calc: F,
    tonicities: &[Tonicity],
    input_operands: &[IntervalSet],
    result_bit_count: usize,
) -> IntervalSet
where
    F: Fn(&[Bits]) -> OverflowResult,
{
    assert_eq!(
        input_operands.len(),
        tonicities.len(),
        "One tonicity is required per operand"
    );

    let operands: Vec<IntervalSet> = input_operands
        .iter()
        .enumerate()
        .map(|(i, set)| {
            let budget = if i < WIDE_OPERAND_LIMIT {
                MAX_INTERVALS_PER_OPERAND
            } else {
                1
            };
            minimize_intervals(set.clone(), budget)
        })
        .collect();

    let radix: Vec<usize> = operands.iter().map(|s| s.number_of_intervals()).collect();

    let mut result_intervals = IntervalSet::new(result_bit_count);

    // Each iteration explores one choice of intervals, one per operand.
    mixed_radix_iterate(&radix, |indexes| {
        let mut lower_bounds = Vec::with_capacity(indexes.len());
        let mut upper_bounds = Vec::with_capacity(indexes.len());
        for (i, &index) in indexes.iter().enumerate() {
            let interval = &operands[i].intervals()[index];
            match tonicities[i] {
                // A monotone operand maps `[x, y]` to `[f(x, .), f(y, .)]`.
                Tonicity::Monotone => {
                    lower_bounds.push(interval.lower_bound().clone());
                    upper_bounds.push(interval.upper_bound().clone());
                }
                // An antitone operand maps `[x, y]` to `[f(y, .), f(x, .)]`.
                Tonicity::Antitone => {
                    lower_bounds.push(interval.upper_bound().clone());
                    upper_bounds.push(interval.lower_bound().clone());
                }
            }
        }
        let lower = calc(&lower_bounds);
        let upper = calc(&upper_bounds);
        if !lower.first_overflow_bit && !upper.first_overflow_bit {
            result_intervals.add_interval(Interval::new(lower.result, upper.result));
            return false;
        }
        // Overflows that cover the entire output space: both corners
        // overflowed, either overflowed twice, or the upper corner still
        // exceeds the lower after a one-sided overflow (it wrapped all the
        // way around the other bound). Unconstrained, so stop enumerating.
        if (lower.first_overflow_bit && upper.first_overflow_bit)
            || lower.second_overflow_bit
            || upper.second_overflow_bit
            || bits_ops::ugt(&upper.result, &lower.result)
        {
            debug!("variadic op: output unconstrained, short-circuiting");
            result_intervals.add_interval(Interval::maximal(result_bit_count));
            return true;
        }
        // One corner overflowed but did not pass the other bound: the image
        // wraps, covering the top of the space from the lower corner and
        // the bottom up to the upper corner.
        result_intervals.add_interval(Interval::new(
            lower.result,
            Bits::all_ones(result_bit_count),
        ));
        result_intervals.add_interval(Interval::new(Bits::zero(result_bit_count), upper.result));
        false
    });

    result_intervals.normalize();
    minimize_intervals(result_intervals, MAX_RESULT_INTERVALS)
}

/// Binary specialization of [`perform_variadic_op`].
pub fn perform_binary_op<F>(
    calc: F,
    lhs: &IntervalSet,
    lhs_tonicity: Tonicity,
    rhs: &IntervalSet,
    rhs_tonicity: Tonicity,
    result_bit_count: usize,
) -> IntervalSet
where
    F: Fn(&Bits, &Bits) -> OverflowResult,
{
    perform_variadic_op(
        |bits| {
            debug_assert_eq!(bits.len(), 2);
            calc(&bits[0], &bits[1])
        },
        &[lhs_tonicity, rhs_tonicity],
        &[lhs.clone(), rhs.clone()],
        result_bit_count,
    )
}

/// Unary specialization of [`perform_variadic_op`].
pub fn perform_unary_op<F>(
    calc: F,
    arg: &IntervalSet,
    tonicity: Tonicity,
    result_bit_count: usize,
) -> IntervalSet
where
    F: Fn(&Bits) -> OverflowResult,
{
    perform_variadic_op(
        |bits| {
            debug_assert_eq!(bits.len(), 1);
            calc(&bits[0])
        },
        &[tonicity],
        &[arg.clone()],
        result_bit_count,
    )
}
