//! Concrete arithmetic and bit manipulation over [`Bits`] values.
//!
//! These are the exact (wrap-around) semantics of the operations the
//! abstract transfer functions approximate. Width requirements are checked
//! with assertions; a mismatch is a programming error.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bits::{low_mask, Bits};

fn assert_same_width(lhs: &Bits, rhs: &Bits) {
    assert_eq!(
        lhs.bit_count(),
        rhs.bit_count(),
        "Operand widths differ: {} vs {}",
        lhs.bit_count(),
        rhs.bit_count()
    );
}

/// Wrap-around addition: `(lhs + rhs) mod 2^w`.
pub fn add(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    Bits::from_biguint_truncating(lhs.value() + rhs.value(), lhs.bit_count())
}

/// Wrap-around subtraction: `(lhs - rhs) mod 2^w`.
pub fn sub(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    let w = lhs.bit_count();
    let modulus = BigUint::one() << w;
    Bits::from_biguint_truncating(modulus + lhs.value() - rhs.value(), w)
}

/// Two's complement negation: `(2^w - x) mod 2^w`.
pub fn negate(arg: &Bits) -> Bits {
    sub(&Bits::zero(arg.bit_count()), arg)
}

/// Full-width unsigned multiplication.
///
/// The result has `lhs.bit_count() + rhs.bit_count()` bits, so the true
/// product is always representable.
pub fn umul(lhs: &Bits, rhs: &Bits) -> Bits {
    let width = lhs.bit_count() + rhs.bit_count();
    Bits::from_biguint(lhs.value() * rhs.value(), width)
}

/// Unsigned division. Division by zero yields the all-ones value.
pub fn udiv(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    if rhs.is_zero() {
        return Bits::all_ones(lhs.bit_count());
    }
    Bits::from_biguint(lhs.value() / rhs.value(), lhs.bit_count())
}

/// Widens `arg` to `width` bits by filling with zeros.
pub fn zero_extend(arg: &Bits, width: usize) -> Bits {
    assert!(
        width >= arg.bit_count(),
        "Cannot zero-extend from {} to {} bits",
        arg.bit_count(),
        width
    );
    Bits::from_biguint(arg.value().clone(), width)
}

/// Widens `arg` to `width` bits by replicating the most significant bit.
pub fn sign_extend(arg: &Bits, width: usize) -> Bits {
    assert!(
        width >= arg.bit_count(),
        "Cannot sign-extend from {} to {} bits",
        arg.bit_count(),
        width
    );
    if !arg.msb() {
        return Bits::from_biguint(arg.value().clone(), width);
    }
    let fill = low_mask(width) ^ low_mask(arg.bit_count());
    Bits::from_biguint(arg.value() | fill, width)
}

/// Keeps the low `width` bits of `arg`.
pub fn truncate(arg: &Bits, width: usize) -> Bits {
    assert!(
        width <= arg.bit_count(),
        "Cannot truncate from {} to {} bits",
        arg.bit_count(),
        width
    );
    arg.slice(0, width)
}

/// Concatenates values, first operand most significant.
pub fn concat(operands: &[Bits]) -> Bits {
    let mut value = BigUint::zero();
    let mut width = 0;
    for operand in operands {
        value = (value << operand.bit_count()) | operand.value();
        width += operand.bit_count();
    }
    Bits::from_biguint(value, width)
}

/// Bitwise complement.
pub fn not(arg: &Bits) -> Bits {
    let w = arg.bit_count();
    Bits::from_biguint(arg.value() ^ low_mask(w), w)
}

/// Bitwise and.
pub fn and(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    Bits::from_biguint(lhs.value() & rhs.value(), lhs.bit_count())
}

/// Bitwise or.
pub fn or(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    Bits::from_biguint(lhs.value() | rhs.value(), lhs.bit_count())
}

/// Bitwise xor.
pub fn xor(lhs: &Bits, rhs: &Bits) -> Bits {
    assert_same_width(lhs, rhs);
    Bits::from_biguint(lhs.value() ^ rhs.value(), lhs.bit_count())
}

/// Parity of the set bits, as a 1-bit value.
pub fn xor_reduce(arg: &Bits) -> Bits {
    let parity = arg.value().count_ones() % 2;
    Bits::from_u64(parity as u64, 1)
}

/// Unsigned comparison.
pub fn ucmp(lhs: &Bits, rhs: &Bits) -> Ordering {
    lhs.ucmp(rhs)
}

/// Unsigned `lhs < rhs`.
pub fn ult(lhs: &Bits, rhs: &Bits) -> bool {
    lhs.ucmp(rhs) == Ordering::Less
}

/// Unsigned `lhs > rhs`.
pub fn ugt(lhs: &Bits, rhs: &Bits) -> bool {
    lhs.ucmp(rhs) == Ordering::Greater
}

/// Unsigned `lhs <= rhs`.
pub fn ule(lhs: &Bits, rhs: &Bits) -> bool {
    lhs.ucmp(rhs) != Ordering::Greater
}

/// Unsigned minimum.
pub fn umin(lhs: &Bits, rhs: &Bits) -> Bits {
    if ule(lhs, rhs) {
        lhs.clone()
    } else {
        rhs.clone()
    }
}

/// Unsigned maximum.
pub fn umax(lhs: &Bits, rhs: &Bits) -> Bits {
    if ule(lhs, rhs) {
        rhs.clone()
    } else {
        lhs.clone()
    }
}

/// Length of the longest run of most-significant bits on which `lhs` and
/// `rhs` agree.
pub fn longest_common_prefix_msb(lhs: &Bits, rhs: &Bits) -> usize {
    assert_same_width(lhs, rhs);
    let w = lhs.bit_count();
    let diff = lhs.value() ^ rhs.value();
    if diff.is_zero() {
        return w;
    }
    // The first disagreement is the highest set bit of the xor.
    w - diff.bits() as usize
}
