//! Per-bit three-valued logic.
//!
//! A [`TernaryVector`] tracks each bit of a value as known-zero, known-one,
//! or unknown (⊤). Bitwise operations evaluate per bit with unknown
//! absorbing, which makes arbitrary bitwise structure tractable where
//! interval arithmetic is not. Index 0 is the least significant bit.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::bits::Bits;

/// The value of a single bit: known-zero, known-one, or unknown.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TernaryValue {
    KnownZero,
    KnownOne,
    Unknown,
}

/// A vector of per-bit ternary values, least significant bit first.
pub type TernaryVector = Vec<TernaryValue>;

impl TernaryValue {
    /// Returns true unless the bit is unknown.
    pub fn is_known(self) -> bool {
        self != TernaryValue::Unknown
    }

    /// Returns true if the bit is unknown.
    pub fn is_unknown(self) -> bool {
        self == TernaryValue::Unknown
    }

    /// Lifts a concrete bit.
    pub fn from_bool(b: bool) -> Self {
        if b {
            TernaryValue::KnownOne
        } else {
            TernaryValue::KnownZero
        }
    }
}

impl fmt::Display for TernaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            TernaryValue::KnownZero => '0',
            TernaryValue::KnownOne => '1',
            TernaryValue::Unknown => 'X',
        };
        write!(f, "{}", c)
    }
}

/// Renders a vector most-significant bit first, e.g. `0bX10`.
pub fn to_string(tern: &[TernaryValue]) -> String {
    let mut s = String::with_capacity(tern.len() + 2);
    s.push_str("0b");
    for t in tern.iter().rev() {
        s.push(match t {
            TernaryValue::KnownZero => '0',
            TernaryValue::KnownOne => '1',
            TernaryValue::Unknown => 'X',
        });
    }
    s
}

/// Returns true if every bit is known.
pub fn is_fully_known(tern: &[TernaryValue]) -> bool {
    tern.iter().all(|t| t.is_known())
}

/// Ternary complement of a single bit.
pub fn not_value(a: TernaryValue) -> TernaryValue {
    match a {
        TernaryValue::KnownZero => TernaryValue::KnownOne,
        TernaryValue::KnownOne => TernaryValue::KnownZero,
        TernaryValue::Unknown => TernaryValue::Unknown,
    }
}

/// Ternary conjunction of a single bit pair. A known zero absorbs unknown.
pub fn and_value(a: TernaryValue, b: TernaryValue) -> TernaryValue {
    use TernaryValue::*;
    match (a, b) {
        (KnownZero, _) | (_, KnownZero) => KnownZero,
        (KnownOne, KnownOne) => KnownOne,
        _ => Unknown,
    }
}

/// Ternary disjunction of a single bit pair. A known one absorbs unknown.
pub fn or_value(a: TernaryValue, b: TernaryValue) -> TernaryValue {
    use TernaryValue::*;
    match (a, b) {
        (KnownOne, _) | (_, KnownOne) => KnownOne,
        (KnownZero, KnownZero) => KnownZero,
        _ => Unknown,
    }
}

/// Ternary exclusive-or of a single bit pair. Any unknown input poisons the
/// result.
pub fn xor_value(a: TernaryValue, b: TernaryValue) -> TernaryValue {
    use TernaryValue::*;
    match (a, b) {
        (Unknown, _) | (_, Unknown) => Unknown,
        (x, y) => TernaryValue::from_bool(x != y),
    }
}

fn assert_same_len(lhs: &[TernaryValue], rhs: &[TernaryValue]) {
    assert_eq!(
        lhs.len(),
        rhs.len(),
        "Ternary vector lengths differ: {} vs {}",
        lhs.len(),
        rhs.len()
    );
}

/// Per-bit complement.
pub fn bitwise_not(tern: &[TernaryValue]) -> TernaryVector {
    tern.iter().map(|&t| not_value(t)).collect()
}

/// Per-bit conjunction.
pub fn bitwise_and(lhs: &[TernaryValue], rhs: &[TernaryValue]) -> TernaryVector {
    assert_same_len(lhs, rhs);
    lhs.iter().zip(rhs).map(|(&a, &b)| and_value(a, b)).collect()
}

/// Per-bit disjunction.
pub fn bitwise_or(lhs: &[TernaryValue], rhs: &[TernaryValue]) -> TernaryVector {
    assert_same_len(lhs, rhs);
    lhs.iter().zip(rhs).map(|(&a, &b)| or_value(a, b)).collect()
}

/// Per-bit exclusive-or.
pub fn bitwise_xor(lhs: &[TernaryValue], rhs: &[TernaryValue]) -> TernaryVector {
    assert_same_len(lhs, rhs);
    lhs.iter().zip(rhs).map(|(&a, &b)| xor_value(a, b)).collect()
}

/// Meets `lhs` with `rhs` in place: bits on which the vectors disagree (or
/// either is unknown) become unknown.
pub fn update_with_intersection(lhs: &mut TernaryVector, rhs: &[TernaryValue]) {
    assert_same_len(lhs, rhs);
    for (l, &r) in lhs.iter_mut().zip(rhs) {
        if *l != r {
            *l = TernaryValue::Unknown;
        }
    }
}

/// The mask of known bit positions.
pub fn to_known_bits(tern: &[TernaryValue]) -> Bits {
    let mut value = BigUint::zero();
    for (i, t) in tern.iter().enumerate() {
        if t.is_known() {
            value.set_bit(i as u64, true);
        }
    }
    Bits::from_biguint(value, tern.len())
}

/// The known bit values, with zero at unknown positions.
pub fn to_known_bits_values(tern: &[TernaryValue]) -> Bits {
    let mut value = BigUint::zero();
    for (i, t) in tern.iter().enumerate() {
        if *t == TernaryValue::KnownOne {
            value.set_bit(i as u64, true);
        }
    }
    Bits::from_biguint(value, tern.len())
}

/// Iterator over every concrete value consistent with a ternary vector.
///
/// A vector with `k` unknown bits yields `2^k` values.
pub struct AllBitsValues {
    base: BigUint,
    unknown_positions: Vec<usize>,
    width: usize,
    counter: BigUint,
    limit: BigUint,
}

impl Iterator for AllBitsValues {
    type Item = Bits;

    fn next(&mut self) -> Option<Bits> {
        if self.counter >= self.limit {
            return None;
        }
        let mut value = self.base.clone();
        for (i, &pos) in self.unknown_positions.iter().enumerate() {
            if self.counter.bit(i as u64) {
                value.set_bit(pos as u64, true);
            }
        }
        self.counter += 1u32;
        Some(Bits::from_biguint(value, self.width))
    }
}

/// Enumerates all concrete fillings of the unknown bits of `tern`.
pub fn all_bits_values(tern: &[TernaryValue]) -> AllBitsValues {
    let unknown_positions: Vec<usize> = tern
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_unknown())
        .map(|(i, _)| i)
        .collect();
    AllBitsValues {
        base: to_known_bits_values(tern).value().clone(),
        limit: BigUint::from(1u32) << unknown_positions.len(),
        unknown_positions,
        width: tern.len(),
        counter: BigUint::zero(),
    }
}

/// Abstract one-hot with least-significant-bit priority.
///
/// Output bit `i` is one iff input bit `i` is set and no lower bit is; the
/// extra top bit is one iff the input is all zeros. Output length is
/// `tern.len() + 1`.
pub fn one_hot_lsb_to_msb(tern: &[TernaryValue]) -> TernaryVector {
    let mut result = TernaryVector::with_capacity(tern.len() + 1);
    // Tracks "every bit scanned so far is zero".
    let mut all_zero = TernaryValue::KnownOne;
    for &t in tern {
        result.push(and_value(all_zero, t));
        all_zero = and_value(all_zero, not_value(t));
    }
    result.push(all_zero);
    result
}

/// Abstract one-hot with most-significant-bit priority.
///
/// Output bit `i` is one iff input bit `i` is set and no higher bit is; the
/// extra top bit is one iff the input is all zeros. Output length is
/// `tern.len() + 1`.
pub fn one_hot_msb_to_lsb(tern: &[TernaryValue]) -> TernaryVector {
    let mut result = vec![TernaryValue::KnownZero; tern.len() + 1];
    let mut all_zero = TernaryValue::KnownOne;
    for i in (0..tern.len()).rev() {
        result[i] = and_value(all_zero, tern[i]);
        all_zero = and_value(all_zero, not_value(tern[i]));
    }
    result[tern.len()] = all_zero;
    result
}
