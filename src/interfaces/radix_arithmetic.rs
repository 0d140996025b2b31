// ============================================================================
// Radix Arithmetic Interface
// The operation set shared by the engine and the layers wrapping it
// ============================================================================

use super::radix_helper::RadixMathHelper;
use crate::context::PrecisionContext;
use crate::numeric::MathResult;
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Full arithmetic operation set over one number type.
///
/// Implemented by the core engine and by each wrapping layer
/// (`SimpleRadixMath`, `TrappableRadixMath`), so layers compose freely.
/// Every operation returns its result with the signals it raised.
pub trait RadixArithmetic: Send + Sync {
    type Value: Clone + Debug;
    type Helper: RadixMathHelper<Value = Self::Value>;

    /// The helper describing the number type
    fn helper(&self) -> &Self::Helper;

    /// Layer name for logging
    fn name(&self) -> &str;

    fn radix(&self) -> u32 {
        self.helper().radix()
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn add(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn subtract(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn multiply(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// `a * b + c` with a single rounding.
    fn multiply_and_add(
        &self,
        a: &Self::Value,
        b: &Self::Value,
        c: &Self::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    fn divide(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// Quotient with a fixed result exponent, rounded with the context's mode.
    fn divide_to_exponent(
        &self,
        a: &Self::Value,
        b: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Integer part of the quotient at its natural exponent.
    fn divide_to_integer_natural_scale(
        &self,
        a: &Self::Value,
        b: &Self::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Integer part of the quotient at exponent zero.
    fn divide_to_integer_zero_scale(
        &self,
        a: &Self::Value,
        b: &Self::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// `a - b * trunc(a / b)`
    fn remainder(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// `a - b * n` where `n` is `a / b` rounded to nearest, ties to even.
    fn remainder_near(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    // ========================================================================
    // Rounding and Exponents
    // ========================================================================

    fn round_to_precision(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn abs(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn negate(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// `value` rescaled to exactly the exponent of `target`.
    fn quantize(&self, value: &Self::Value, target: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// Rounds to `exponent`; discarding a nonzero digit is invalid.
    fn round_to_exponent_exact(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Rounds to `exponent`, reporting inexact and rounded.
    fn round_to_exponent_simple(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Rounds to `exponent` without reporting inexact or rounded.
    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Rounds, then strips trailing zeros.
    fn reduce(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn next_plus(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn next_minus(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn next_toward(&self, value: &Self::Value, target: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    // ========================================================================
    // Transcendental
    // ========================================================================

    fn square_root(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn ln(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn log10(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn exp(&self, value: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn power(&self, base: &Self::Value, exponent: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn pi(&self, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    // ========================================================================
    // Comparison
    // ========================================================================

    fn max(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn min(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn max_magnitude(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    fn min_magnitude(&self, a: &Self::Value, b: &Self::Value, ctx: &PrecisionContext) -> MathResult<Self::Value>;

    /// -1, 0 or 1 as a value; NaN operands propagate.
    fn compare_to_with_context(
        &self,
        a: &Self::Value,
        b: &Self::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<Self::Value>;

    /// Total order over numeric value; NaN sorts above everything and equals NaN.
    fn compare_to(&self, a: &Self::Value, b: &Self::Value) -> Ordering;
}
