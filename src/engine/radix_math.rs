// ============================================================================
// Radix Math Engine
// Radix-independent arithmetic over any RadixMathHelper
// ============================================================================
//
// The engine computes exact intermediate results with big integers and hands
// them to `round_fields` (rounding.rs). Division, exponent manipulation and
// transcendental functions live in sibling files as further impl blocks.

use super::division::DivisionMode;
use super::rounding::adjusted_exponent;
use crate::context::{PrecisionContext, RoundingMode, SignalSet};
use crate::interfaces::{RadixArithmetic, RadixMathHelper};
use crate::numeric::{digit_count, radix_power, ContractError, MathResult, Outcome};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

/// Extra digits kept below the precision window when a far operand is collapsed.
const FAR_OPERAND_GUARD: u64 = 8;

/// Finite value split into sign, magnitude and exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Parts {
    pub negative: bool,
    pub magnitude: BigInt,
    pub exponent: BigInt,
}

impl Parts {
    pub(crate) fn new(negative: bool, magnitude: BigInt, exponent: BigInt) -> Self {
        Self {
            negative,
            magnitude,
            exponent,
        }
    }
}

/// NaN rule shared by the engine and the simplified layer: the first
/// signaling NaN wins (quieted, with Invalid), then the first quiet NaN.
pub(crate) fn propagate_nan<H: RadixMathHelper>(
    helper: &H,
    operands: &[&H::Value],
    ctx: &PrecisionContext,
) -> Result<Option<Outcome<H::Value>>, ContractError> {
    if let Some(signaling) = operands.iter().find(|v| helper.is_signaling_nan(v)) {
        let quiet = quiet_nan_from(helper, signaling, ctx)?;
        return Ok(Some(Outcome::new(quiet, SignalSet::INVALID)));
    }
    if let Some(quiet) = operands.iter().find(|v| helper.is_quiet_nan(v)) {
        return Ok(Some(Outcome::exact((*quiet).clone())));
    }
    Ok(None)
}

/// Quiet NaN carrying `nan`'s sign and its payload reduced to the precision.
pub(crate) fn quiet_nan_from<H: RadixMathHelper>(
    helper: &H,
    nan: &H::Value,
    ctx: &PrecisionContext,
) -> Result<H::Value, ContractError> {
    let radix = helper.radix();
    let mut payload = helper.mantissa(nan);
    if ctx.precision > 0 && digit_count(&payload, radix) > ctx.precision {
        payload %= radix_power(radix, ctx.precision)?;
    }
    helper.create_quiet_nan(helper.is_negative(nan), payload)
}

// ============================================================================
// Engine
// ============================================================================

/// The arithmetic engine. Stateless apart from its helper, so one instance
/// can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct RadixMath<H> {
    helper: H,
}

impl<H: RadixMathHelper> RadixMath<H> {
    pub fn new(helper: H) -> Self {
        Self { helper }
    }

    #[inline]
    pub fn helper(&self) -> &H {
        &self.helper
    }

    #[inline]
    pub(crate) fn radix(&self) -> u32 {
        self.helper.radix()
    }

    pub(crate) fn parts(&self, value: &H::Value) -> Parts {
        Parts::new(
            self.helper.is_negative(value),
            self.helper.mantissa(value),
            self.helper.exponent(value),
        )
    }

    /// Quiet NaN with the Invalid signal.
    pub(crate) fn invalid(&self) -> MathResult<H::Value> {
        let nan = self.helper.create_quiet_nan(false, BigInt::zero())?;
        Ok(Outcome::new(nan, SignalSet::INVALID))
    }

    pub(crate) fn nan_result(
        &self,
        operands: &[&H::Value],
        ctx: &PrecisionContext,
    ) -> Result<Option<Outcome<H::Value>>, ContractError> {
        propagate_nan(&self.helper, operands, ctx)
    }

    pub(crate) fn adjusted(&self, value: &H::Value) -> BigInt {
        adjusted_exponent(
            &self.helper.mantissa(value),
            &self.helper.exponent(value),
            self.radix(),
        )
    }

    // ========================================================================
    // Addition
    // ========================================================================

    pub(crate) fn add_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        let h = &self.helper;
        if h.is_infinite(a) {
            if h.is_infinite(b) && h.is_negative(a) != h.is_negative(b) {
                return self.invalid();
            }
            return Ok(Outcome::exact(a.clone()));
        }
        if h.is_infinite(b) {
            return Ok(Outcome::exact(b.clone()));
        }
        self.add_parts(self.parts(a), self.parts(b), ctx)
    }

    pub(crate) fn add_parts(&self, x: Parts, y: Parts, ctx: &PrecisionContext) -> MathResult<H::Value> {
        let (x, y) = if ctx.precision > 0 {
            self.collapse_far_operand(x, y, ctx.precision)
        } else {
            (x, y)
        };
        let exponent = x.exponent.clone().min(y.exponent.clone());
        let sum = self.aligned(&x, &exponent)? + self.aligned(&y, &exponent)?;
        if sum.is_zero() {
            let negative = if x.negative == y.negative {
                x.negative
            } else {
                ctx.rounding == RoundingMode::Floor
            };
            return self.round_fields(negative, sum, exponent, 0, false, ctx);
        }
        self.round_fields(sum.is_negative(), sum.abs(), exponent, 0, false, ctx)
    }

    fn aligned(&self, parts: &Parts, exponent: &BigInt) -> Result<BigInt, ContractError> {
        let shift = &parts.exponent - exponent;
        let scaled = self.helper.multiply_by_radix_power(&parts.magnitude, &shift)?;
        Ok(if parts.negative { -scaled } else { scaled })
    }

    /// Keeps alignment cheap when exponents are far apart. An operand lying
    /// wholly below the rounding window is replaced by a single unit just
    /// below it, and a zero far below the other operand is raised toward it;
    /// neither changes the rounded sum or its signals.
    fn collapse_far_operand(&self, x: Parts, y: Parts, precision: u64) -> (Parts, Parts) {
        if x.exponent == y.exponent {
            return (x, y);
        }
        let gap = (&x.exponent - &y.exponent).abs();
        if gap + 3u32 <= BigInt::from(precision) {
            return (x, y);
        }
        let swapped = x.exponent < y.exponent;
        let (high, mut low) = if swapped { (y, x) } else { (x, y) };
        if high.magnitude.is_zero() {
            return if swapped { (low, high) } else { (high, low) };
        }

        let floor = &high.exponent - BigInt::from(precision) - BigInt::from(FAR_OPERAND_GUARD);
        if low.magnitude.is_zero() {
            if low.exponent < floor {
                low.exponent = floor;
            }
        } else if adjusted_exponent(&low.magnitude, &low.exponent, self.radix()) < floor {
            low = Parts::new(low.negative, BigInt::one(), floor);
        }
        if swapped {
            (low, high)
        } else {
            (high, low)
        }
    }

    // ========================================================================
    // Multiplication
    // ========================================================================

    pub(crate) fn multiply_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        let h = &self.helper;
        let negative = h.is_negative(a) != h.is_negative(b);
        if h.is_infinite(a) || h.is_infinite(b) {
            if h.is_zero(a) || h.is_zero(b) {
                return self.invalid();
            }
            return Ok(Outcome::exact(h.create_infinity(negative)?));
        }
        let x = self.parts(a);
        let y = self.parts(b);
        self.round_fields(
            negative,
            x.magnitude * y.magnitude,
            x.exponent + y.exponent,
            0,
            false,
            ctx,
        )
    }

    pub(crate) fn multiply_and_add_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        c: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b, c], ctx)? {
            return Ok(nan);
        }
        let product = self.multiply_core(a, b, &PrecisionContext::unlimited())?;
        if self.helper.is_nan(&product.value) {
            return Ok(product);
        }
        let sum = self.add_core(&product.value, c, ctx)?;
        Ok(sum.with_signals(product.signals))
    }

    // ========================================================================
    // Sign and Rounding
    // ========================================================================

    pub(crate) fn round_to_precision_core(
        &self,
        value: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        if self.helper.is_infinite(value) {
            return Ok(Outcome::exact(value.clone()));
        }
        let p = self.parts(value);
        self.round_fields(p.negative, p.magnitude, p.exponent, 0, false, ctx)
    }

    fn abs_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        self.round_to_precision_core(&self.helper.absolute(value), ctx)
    }

    fn negate_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        self.round_to_precision_core(&self.helper.negated(value), ctx)
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Numeric order; NaN is above everything and equal to NaN.
    pub(crate) fn compare_values(&self, a: &H::Value, b: &H::Value) -> Ordering {
        let h = &self.helper;
        match (h.is_nan(a), h.is_nan(b)) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        let sign_a = self.signum(a);
        let sign_b = self.signum(b);
        if sign_a != sign_b {
            return sign_a.cmp(&sign_b);
        }
        if sign_a == 0 {
            return Ordering::Equal;
        }
        let magnitude = match (h.is_infinite(a), h.is_infinite(b)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.compare_finite_magnitudes(a, b),
        };
        if sign_a < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    fn signum(&self, value: &H::Value) -> i32 {
        if self.helper.is_zero(value) {
            0
        } else if self.helper.is_negative(value) {
            -1
        } else {
            1
        }
    }

    fn compare_finite_magnitudes(&self, a: &H::Value, b: &H::Value) -> Ordering {
        let by_adjusted = self.adjusted(a).cmp(&self.adjusted(b));
        if by_adjusted != Ordering::Equal {
            return by_adjusted;
        }
        let x = self.parts(a);
        let y = self.parts(b);
        let exponent = x.exponent.clone().min(y.exponent.clone());
        // Equal adjusted exponents keep this shift within the digit counts
        match (self.aligned(&x, &exponent), self.aligned(&y, &exponent)) {
            (Ok(p), Ok(q)) => p.abs().cmp(&q.abs()),
            _ => x.exponent.cmp(&y.exponent),
        }
    }

    fn min_max(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
        want_max: bool,
        by_magnitude: bool,
    ) -> MathResult<H::Value> {
        let h = &self.helper;
        if h.is_signaling_nan(a) || h.is_signaling_nan(b) {
            if let Some(nan) = self.nan_result(&[a, b], ctx)? {
                return Ok(nan);
            }
        }
        match (h.is_nan(a), h.is_nan(b)) {
            (true, true) => return Ok(Outcome::exact(a.clone())),
            (true, false) => return self.round_to_precision_core(b, ctx),
            (false, true) => return self.round_to_precision_core(a, ctx),
            (false, false) => {}
        }

        let mut order = if by_magnitude {
            self.compare_values(&h.absolute(a), &h.absolute(b))
        } else {
            Ordering::Equal
        };
        if order == Ordering::Equal {
            order = self.compare_values(a, b);
        }
        if order == Ordering::Equal {
            let (neg_a, neg_b) = (h.is_negative(a), h.is_negative(b));
            order = if neg_a != neg_b {
                if neg_a {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            } else {
                let by_exponent = h.exponent(a).cmp(&h.exponent(b));
                if neg_a {
                    by_exponent.reverse()
                } else {
                    by_exponent
                }
            };
        }
        let pick_b = if want_max {
            order == Ordering::Less
        } else {
            order == Ordering::Greater
        };
        self.round_to_precision_core(if pick_b { b } else { a }, ctx)
    }

    fn compare_with_context_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        let small = match self.compare_values(a, b) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        Ok(Outcome::exact(self.helper.value_of(small)))
    }
}

// ============================================================================
// Trait Implementation
// ============================================================================

impl<H: RadixMathHelper> RadixArithmetic for RadixMath<H> {
    type Value = H::Value;
    type Helper = H;

    fn helper(&self) -> &H {
        &self.helper
    }

    fn name(&self) -> &str {
        "radix-math"
    }

    fn add(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.add_core(a, b, ctx)
    }

    fn subtract(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        self.add_core(a, &self.helper.negated(b), ctx)
    }

    fn multiply(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.multiply_core(a, b, ctx)
    }

    fn multiply_and_add(
        &self,
        a: &H::Value,
        b: &H::Value,
        c: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.multiply_and_add_core(a, b, c, ctx)
    }

    fn divide(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.divide_core(a, b, DivisionMode::Regular, ctx)
    }

    fn divide_to_exponent(
        &self,
        a: &H::Value,
        b: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.divide_core(a, b, DivisionMode::FixedExponent(exponent.clone()), ctx)
    }

    fn divide_to_integer_natural_scale(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.divide_core(a, b, DivisionMode::IntegerNaturalScale, ctx)
    }

    fn divide_to_integer_zero_scale(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.divide_core(a, b, DivisionMode::IntegerZeroScale, ctx)
    }

    fn remainder(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.remainder_core(a, b, false, ctx)
    }

    fn remainder_near(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.remainder_core(a, b, true, ctx)
    }

    fn round_to_precision(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.round_to_precision_core(value, ctx)
    }

    fn abs(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.abs_core(value, ctx)
    }

    fn negate(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.negate_core(value, ctx)
    }

    fn quantize(&self, value: &H::Value, target: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.quantize_core(value, target, ctx)
    }

    fn round_to_exponent_exact(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.round_to_exponent_core(value, exponent, ctx, super::exponent_ops::ExponentRounding::Exact)
    }

    fn round_to_exponent_simple(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.round_to_exponent_core(value, exponent, ctx, super::exponent_ops::ExponentRounding::Simple)
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.round_to_exponent_core(
            value,
            exponent,
            ctx,
            super::exponent_ops::ExponentRounding::Silent,
        )
    }

    fn reduce(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.reduce_core(value, ctx)
    }

    fn next_plus(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.next_core(value, true, ctx, "next_plus")
    }

    fn next_minus(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.next_core(value, false, ctx, "next_minus")
    }

    fn next_toward(&self, value: &H::Value, target: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.next_toward_core(value, target, ctx)
    }

    fn square_root(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.square_root_core(value, ctx)
    }

    fn ln(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.ln_core(value, ctx)
    }

    fn log10(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.log10_core(value, ctx)
    }

    fn exp(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.exp_core(value, ctx)
    }

    fn power(&self, base: &H::Value, exponent: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.power_core(base, exponent, ctx)
    }

    fn pi(&self, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.pi_core(ctx)
    }

    fn max(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.min_max(a, b, ctx, true, false)
    }

    fn min(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.min_max(a, b, ctx, false, false)
    }

    fn max_magnitude(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.min_max(a, b, ctx, true, true)
    }

    fn min_magnitude(&self, a: &H::Value, b: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.min_max(a, b, ctx, false, true)
    }

    fn compare_to_with_context(
        &self,
        a: &H::Value,
        b: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.compare_with_context_core(a, b, ctx)
    }

    fn compare_to(&self, a: &H::Value, b: &H::Value) -> Ordering {
        self.compare_values(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Decimal, DecimalHelper};

    fn math() -> RadixMath<DecimalHelper> {
        RadixMath::new(DecimalHelper::new())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_exact_has_no_signals() {
        let ctx = PrecisionContext::for_precision(9);
        let sum = math().add(&dec("12.34"), &dec("0.066"), &ctx).unwrap();
        assert_eq!(sum.value.to_string(), "12.406");
        assert!(sum.signals.is_empty());
    }

    #[test]
    fn test_add_far_operand() {
        let ctx = PrecisionContext::for_precision(5);
        let sum = math().add(&dec("1E+20"), &dec("1E-20"), &ctx).unwrap();
        assert_eq!(sum.value.to_string(), "1.0000E+20");
        assert_eq!(sum.signals, SignalSet::INEXACT_ROUNDED);

        let up = ctx.with_rounding(RoundingMode::Ceiling);
        let sum = math().add(&dec("1E+20"), &dec("1E-20"), &up).unwrap();
        assert_eq!(sum.value.to_string(), "1.0001E+20");
    }

    #[test]
    fn test_zero_sum_sign() {
        let ctx = PrecisionContext::for_precision(9);
        let zero = math().subtract(&dec("1"), &dec("1"), &ctx).unwrap();
        assert_eq!(zero.value.to_string(), "0");

        let floor = ctx.with_rounding(RoundingMode::Floor);
        let zero = math().subtract(&dec("1"), &dec("1"), &floor).unwrap();
        assert_eq!(zero.value.to_string(), "-0");
    }

    #[test]
    fn test_infinite_operands() {
        let ctx = PrecisionContext::for_precision(9);
        let invalid = math().add(&dec("Infinity"), &dec("-Infinity"), &ctx).unwrap();
        assert!(invalid.value.is_nan());
        assert_eq!(invalid.signals, SignalSet::INVALID);

        let invalid = math().multiply(&dec("Infinity"), &dec("0"), &ctx).unwrap();
        assert!(invalid.value.is_nan());

        let product = math().multiply(&dec("-Infinity"), &dec("2"), &ctx).unwrap();
        assert_eq!(product.value.to_string(), "-Infinity");
    }

    #[test]
    fn test_nan_propagation() {
        let ctx = PrecisionContext::for_precision(9);
        let quiet = math().add(&dec("NaN5"), &dec("sNaN7"), &ctx).unwrap();
        assert_eq!(quiet.value.to_string(), "NaN7");
        assert_eq!(quiet.signals, SignalSet::INVALID);

        let passed = math().add(&dec("NaN5"), &dec("1"), &ctx).unwrap();
        assert_eq!(passed.value.to_string(), "NaN5");
        assert!(passed.signals.is_empty());

        let small = PrecisionContext::for_precision(2);
        let reduced = math().add(&dec("sNaN12345"), &dec("1"), &small).unwrap();
        assert_eq!(reduced.value.to_string(), "NaN45");
    }

    #[test]
    fn test_multiply_and_add_rounds_once() {
        let ctx = PrecisionContext::for_precision(3);
        let fused = math()
            .multiply_and_add(&dec("1.11"), &dec("1.11"), &dec("-1.23"), &ctx)
            .unwrap();
        assert_eq!(fused.value.to_string(), "0.0021");
        assert!(fused.signals.is_empty());

        let product = math().multiply(&dec("1.11"), &dec("1.11"), &ctx).unwrap();
        assert_eq!(product.value.to_string(), "1.23");
    }

    #[test]
    fn test_compare_and_min_max() {
        let m = math();
        let ctx = PrecisionContext::for_precision(9);
        assert_eq!(m.compare_to(&dec("1.0"), &dec("1.00")), Ordering::Equal);
        assert_eq!(m.compare_to(&dec("-Infinity"), &dec("-1E+999")), Ordering::Less);
        assert_eq!(
            m.compare_to_with_context(&dec("1"), &dec("2"), &ctx).unwrap().value.to_string(),
            "-1"
        );

        assert_eq!(m.max(&dec("1.0"), &dec("1.00"), &ctx).unwrap().value.to_string(), "1.0");
        assert_eq!(m.min(&dec("1.0"), &dec("1.00"), &ctx).unwrap().value.to_string(), "1.00");
        assert_eq!(m.max(&dec("-0"), &dec("0"), &ctx).unwrap().value.to_string(), "0");
        assert_eq!(m.max(&dec("NaN"), &dec("3"), &ctx).unwrap().value.to_string(), "3");
        assert_eq!(
            m.max_magnitude(&dec("-5"), &dec("3"), &ctx).unwrap().value.to_string(),
            "-5"
        );
        assert_eq!(
            m.min_magnitude(&dec("-5"), &dec("3"), &ctx).unwrap().value.to_string(),
            "3"
        );
    }

    #[test]
    fn test_abs_and_negate_round() {
        let ctx = PrecisionContext::for_precision(2);
        let abs = math().abs(&dec("-1.25"), &ctx).unwrap();
        assert_eq!(abs.value.to_string(), "1.2");
        assert!(abs.signals.contains(SignalSet::INEXACT));
        let negated = math().negate(&dec("7"), &ctx).unwrap();
        assert_eq!(negated.value.to_string(), "-7");
    }

    #[test]
    fn test_finite_only_helper_rejects_special_results() {
        let finite = RadixMath::new(DecimalHelper::finite_only());
        let ctx = PrecisionContext::for_precision(3).with_exponent_range(-9, 9);

        let err = finite.divide(&dec("1"), &dec("0"), &ctx).unwrap_err();
        assert_eq!(err.as_contract(), Some(&ContractError::NonFiniteResult));

        let err = finite.divide(&dec("0"), &dec("0"), &ctx).unwrap_err();
        assert_eq!(err.as_contract(), Some(&ContractError::NonFiniteResult));

        let err = finite.multiply(&dec("9E+9"), &dec("10"), &ctx).unwrap_err();
        assert_eq!(err.as_contract(), Some(&ContractError::NonFiniteResult));

        // Overflow toward zero stays finite
        let down = ctx.clone().with_rounding(RoundingMode::Down);
        let largest = finite.multiply(&dec("9E+9"), &dec("10"), &down).unwrap();
        assert_eq!(largest.value.to_string(), "9.99E+9");

        let sum = finite.add(&dec("1.5"), &dec("2.5"), &ctx).unwrap();
        assert_eq!(sum.value.to_string(), "4.0");
    }
}
