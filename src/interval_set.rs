//! Width-tagged unions of disjoint intervals.
//!
//! An [`IntervalSet`] over-approximates the set of values a `w`-bit
//! expression may take. After [`normalize`][IntervalSet::normalize] the
//! representation is canonical: intervals are proper, sorted by lower bound,
//! and no two intervals overlap or are adjacent. The empty set and the
//! maximal set are both representable and distinct.

use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::One;

use crate::bits::Bits;
use crate::bits_ops;
use crate::interval::Interval;

/// A sorted union of non-overlapping intervals over one bit width.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IntervalSet {
    bit_count: usize,
    intervals: Vec<Interval>,
    normalized: bool,
}

impl IntervalSet {
    /// Creates an empty set of the given width.
    pub fn new(width: usize) -> Self {
        Self {
            bit_count: width,
            intervals: Vec::new(),
            normalized: true,
        }
    }

    /// Creates the set containing exactly `value`.
    pub fn precise(value: Bits) -> Self {
        let width = value.bit_count();
        Self {
            bit_count: width,
            intervals: vec![Interval::precise(value)],
            normalized: true,
        }
    }

    /// Creates the set of every `width`-bit value.
    pub fn maximal(width: usize) -> Self {
        Self {
            bit_count: width,
            intervals: vec![Interval::maximal(width)],
            normalized: true,
        }
    }

    /// Creates the set of every nonzero `width`-bit value.
    ///
    /// # Panics
    ///
    /// Panics if `width == 0`; a zero-width value is always zero.
    pub fn nonzero(width: usize) -> Self {
        assert!(width > 0, "nonzero() requires a positive width");
        Self {
            bit_count: width,
            intervals: vec![Interval::new(Bits::from_u64(1, width), Bits::all_ones(width))],
            normalized: true,
        }
    }

    /// Builds a normalized set from arbitrary (possibly improper,
    /// overlapping, unsorted) intervals of the given width.
    pub fn of(width: usize, intervals: Vec<Interval>) -> Self {
        let mut set = Self::new(width);
        for interval in intervals {
            set.add_interval(interval);
        }
        set.normalize();
        set
    }

    /// Returns the width of every value in the set.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Returns the intervals in their current order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Returns the number of intervals.
    pub fn number_of_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Returns true if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns true if the set is in canonical form.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Appends an interval; the set is no longer canonical afterwards.
    ///
    /// # Panics
    ///
    /// Panics if the interval's width differs from the set's width.
    pub fn add_interval(&mut self, interval: Interval) {
        assert_eq!(
            interval.bit_count(),
            self.bit_count,
            "Interval width {} does not match set width {}",
            interval.bit_count(),
            self.bit_count
        );
        self.intervals.push(interval);
        self.normalized = false;
    }

    /// Replaces the intervals wholesale; the set is no longer canonical.
    pub fn set_intervals(&mut self, intervals: Vec<Interval>) {
        self.intervals.clear();
        self.normalized = false;
        for interval in intervals {
            self.add_interval(interval);
        }
    }

    /// Transforms the set into canonical form: improper intervals are split
    /// at the wrap-around point, intervals are sorted by lower bound, and
    /// overlapping or adjacent intervals are merged.
    ///
    /// Idempotent; the result is the unique canonical representation of the
    /// denoted value set.
    pub fn normalize(&mut self) {
        if self.normalized {
            return;
        }
        let width = self.bit_count;
        let mut proper: Vec<Interval> = Vec::with_capacity(self.intervals.len());
        for interval in self.intervals.drain(..) {
            if interval.is_improper() {
                proper.push(Interval::new(interval.lower_bound().clone(), Bits::all_ones(width)));
                proper.push(Interval::new(Bits::zero(width), interval.upper_bound().clone()));
            } else {
                proper.push(interval);
            }
        }
        proper.sort();

        let mut merged: Vec<Interval> = Vec::with_capacity(proper.len());
        for interval in proper {
            // Merge when `next.lo <= cur.hi + 1`; the +1 is computed in
            // unbounded arithmetic so it cannot wrap.
            let touches_last = merged.last().is_some_and(|last| {
                interval.lower_bound().value() <= &(last.upper_bound().value() + BigUint::one())
            });
            if touches_last {
                let last = merged.last_mut().expect("non-empty");
                if bits_ops::ugt(interval.upper_bound(), last.upper_bound()) {
                    let lo = last.lower_bound().clone();
                    *last = Interval::new(lo, interval.upper_bound().clone());
                }
            } else {
                merged.push(interval);
            }
        }
        debug!("normalize: {} interval(s) after merging", merged.len());
        self.intervals = merged;
        self.normalized = true;
    }

    /// Returns true if the set contains exactly one value.
    ///
    /// # Panics
    ///
    /// Panics if the set is not normalized.
    pub fn is_precise(&self) -> bool {
        assert!(self.normalized, "is_precise() requires a normalized set");
        self.intervals.len() == 1 && self.intervals[0].is_precise()
    }

    /// Returns the single contained value, if the set is precise.
    pub fn precise_value(&self) -> Option<&Bits> {
        if self.is_precise() {
            self.intervals[0].precise_value()
        } else {
            None
        }
    }

    /// Returns true if the set contains every `width`-bit value.
    pub fn is_maximal(&self) -> bool {
        assert!(self.normalized, "is_maximal() requires a normalized set");
        self.intervals.len() == 1
            && self.intervals[0].lower_bound().is_zero()
            && self.intervals[0].upper_bound().is_all_ones()
    }

    /// Returns true if `value` is contained in some interval.
    pub fn covers(&self, value: &Bits) -> bool {
        assert!(self.normalized, "covers() requires a normalized set");
        self.intervals.iter().any(|i| i.covers(value))
    }

    /// Returns true if the set contains zero.
    pub fn covers_zero(&self) -> bool {
        self.covers(&Bits::zero(self.bit_count))
    }

    /// Returns true if the set contains the all-ones value.
    pub fn covers_max(&self) -> bool {
        self.covers(&Bits::all_ones(self.bit_count))
    }

    /// Returns the least contained value, or `None` for the empty set.
    pub fn lower_bound(&self) -> Option<&Bits> {
        assert!(self.normalized, "lower_bound() requires a normalized set");
        self.intervals.first().map(|i| i.lower_bound())
    }

    /// Returns the greatest contained value, or `None` for the empty set.
    pub fn upper_bound(&self) -> Option<&Bits> {
        assert!(self.normalized, "upper_bound() requires a normalized set");
        self.intervals.last().map(|i| i.upper_bound())
    }

    /// Returns the smallest single interval containing the whole set, or
    /// `None` for the empty set.
    pub fn convex_hull(&self) -> Option<Interval> {
        assert!(self.normalized, "convex_hull() requires a normalized set");
        Some(Interval::new(
            self.lower_bound()?.clone(),
            self.upper_bound()?.clone(),
        ))
    }

    /// The union of two sets over the same width, normalized.
    pub fn combine(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
        assert_eq!(
            lhs.bit_count, rhs.bit_count,
            "Cannot combine sets of widths {} and {}",
            lhs.bit_count, rhs.bit_count
        );
        let mut result = IntervalSet::new(lhs.bit_count);
        for interval in lhs.intervals.iter().chain(rhs.intervals.iter()) {
            result.add_interval(interval.clone());
        }
        result.normalize();
        result
    }

    /// The intersection of two normalized sets over the same width.
    pub fn intersect(lhs: &IntervalSet, rhs: &IntervalSet) -> IntervalSet {
        assert_eq!(
            lhs.bit_count, rhs.bit_count,
            "Cannot intersect sets of widths {} and {}",
            lhs.bit_count, rhs.bit_count
        );
        assert!(
            lhs.normalized && rhs.normalized,
            "intersect() requires normalized sets"
        );
        let mut result = IntervalSet::new(lhs.bit_count);
        let (mut i, mut j) = (0, 0);
        while i < lhs.intervals.len() && j < rhs.intervals.len() {
            let a = &lhs.intervals[i];
            let b = &rhs.intervals[j];
            let lo = bits_ops::umax(a.lower_bound(), b.lower_bound());
            let hi = bits_ops::umin(a.upper_bound(), b.upper_bound());
            if bits_ops::ule(&lo, &hi) {
                result.add_interval(Interval::new(lo, hi));
            }
            // Advance whichever interval ends first.
            if bits_ops::ult(a.upper_bound(), b.upper_bound()) {
                i += 1;
            } else if bits_ops::ult(b.upper_bound(), a.upper_bound()) {
                j += 1;
            } else {
                i += 1;
                j += 1;
            }
        }
        result.normalize();
        result
    }

    /// Returns true if the two sets share no value.
    pub fn disjoint(lhs: &IntervalSet, rhs: &IntervalSet) -> bool {
        IntervalSet::intersect(lhs, rhs).is_empty()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, interval) in self.intervals.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "[{}, {}]",
                interval.lower_bound().value(),
                interval.upper_bound().value()
            )?;
        }
        write!(f, "}}:u{}", self.bit_count)
    }
}
