//! # range-rs: Bit-Vector Range Analysis in Rust
//!
//! **`range-rs`** is an abstract-interpretation library over sets of
//! bit-vector intervals. It is the analytical core of a compiler
//! middle-end: given the possible values of each operand of a fixed-width
//! operation, it computes a compact over-approximation of the possible
//! results, expressed as a union of closed intervals. Downstream passes
//! consume the approximations for constant folding, dead-code elimination,
//! bit-width narrowing, and comparison simplification.
//!
//! ## What is an interval set?
//!
//! An [`IntervalSet`][crate::interval_set::IntervalSet] is a width-tagged,
//! sorted union of disjoint closed intervals over unsigned `w`-bit values.
//! It is **canonical** after normalization --- every representable value set
//! has exactly one normalized form --- which makes equality checks,
//! containment queries, and set algebra cheap and deterministic.
//!
//! ## Key Features
//!
//! - **Sound by construction**: every transfer function returns a superset
//!   of the concretely reachable results. When precision runs out, the
//!   fallback is the maximal set, never a wrong one.
//! - **Bounded representations**: operand sets are capped before corner
//!   enumeration and results are capped afterwards
//!   ([`minimize_intervals`][crate::minimize::minimize_intervals]), so no
//!   operation allocates without bound.
//! - **Ternary bridge**: bitwise operations, which have no useful interval
//!   structure, are evaluated through a per-bit known/unknown lattice
//!   ([`ternary`]) and lowered back under an explicit precision budget.
//! - **Pure and deterministic**: no shared state, no I/O; results depend
//!   only on operand values, widths, and explicit budgets. Callers may run
//!   transfer functions from any number of threads.
//!
//! ## Basic Usage
//!
//! ```rust
//! use range_rs::bits::Bits;
//! use range_rs::interval::Interval;
//! use range_rs::interval_set::IntervalSet;
//! use range_rs::{arith, compare};
//!
//! // The analyzed expression: x + 5 where x is known to be in [3, 7].
//! let x = IntervalSet::of(
//!     8,
//!     vec![Interval::new(Bits::from_u64(3, 8), Bits::from_u64(7, 8))],
//! );
//! let five = IntervalSet::precise(Bits::from_u64(5, 8));
//!
//! let sum = arith::add(&x, &five);
//! assert_eq!(sum.lower_bound(), Some(&Bits::from_u64(8, 8)));
//! assert_eq!(sum.upper_bound(), Some(&Bits::from_u64(12, 8)));
//!
//! // The comparison x + 5 < 100 folds to a constant.
//! let hundred = IntervalSet::precise(Bits::from_u64(100, 8));
//! assert_eq!(
//!     compare::ult(&sum, &hundred),
//!     IntervalSet::precise(Bits::from_u64(1, 1))
//! );
//! ```
//!
//! ## Core Components
//!
//! - **[`bits`] / [`bits_ops`]**: fixed-width unsigned values and their
//!   concrete (wrap-around) algebra.
//! - **[`interval`] / [`interval_set`]**: the interval domain and its
//!   normalization and set algebra.
//! - **[`ternary`] / [`convert`]**: the per-bit lattice and the bridge
//!   between it and interval sets.
//! - **[`minimize`]**: greedy gap-merging that caps set cardinality.
//! - **[`harness`]**: corner enumeration shared by the arithmetic ops.
//! - **[`arith`] / [`bitwise`] / [`compare`]**: the transfer functions.
//!
//! Width mismatches and similar misuse are programming errors and panic;
//! see the module docs for the precise preconditions of each operation.

pub mod arith;
pub mod bits;
pub mod bits_ops;
pub mod bitwise;
pub mod compare;
pub mod convert;
pub mod harness;
pub mod interval;
pub mod interval_set;
pub mod minimize;
pub mod ternary;
