// ============================================================================
// Transcendental Functions
// Square root, exponential, logarithms, power and pi
// ============================================================================
//
// Each function computes an approximation at a working precision a few
// digits wider than the caller's, then rounds once to the caller's context.
// Approximations are treated as inexact below their last digit, so the
// final rounding reports Inexact even when the working digits happen to
// end in zeros.

use super::division::{strip_trailing_zeros, DivisionMode};
use super::radix_math::RadixMath;
use crate::context::{PrecisionContext, SignalSet};
use crate::interfaces::RadixMathHelper;
use crate::numeric::{digit_count, ContractError, MathError, MathResult, Outcome};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt::Debug;

/// Guard width of working precision, in bits of accuracy.
const GUARD_BITS: f64 = 20.0;

/// Narrowest working precision, in bits of accuracy.
const MIN_WORKING_BITS: f64 = 54.0;

/// Consecutive partial sums that must agree before a series stops.
const REQUIRED_AGREEMENTS: u32 = 4;

/// Largest exponent argument magnitude (in bits) accepted without an
/// exponent range to bound the result.
const MAX_UNBOUNDED_EXP_BITS: i64 = 128;

type Approx<V> = Result<V, MathError<V>>;

/// Tracks agreement of successive partial sums rounded to a target precision.
struct Convergence<V> {
    target: PrecisionContext,
    previous: Option<V>,
    agreements: u32,
}

impl<V: Clone + Debug> Convergence<V> {
    fn new(precision: u64) -> Self {
        Self {
            target: PrecisionContext::for_precision(precision),
            previous: None,
            agreements: 0,
        }
    }

    fn observe<H: RadixMathHelper<Value = V>>(
        &mut self,
        engine: &RadixMath<H>,
        sum: &V,
    ) -> Result<bool, MathError<V>> {
        let rounded = engine.round_to_precision_core(sum, &self.target)?.value;
        let agrees = self
            .previous
            .as_ref()
            .is_some_and(|previous| engine.compare_values(previous, &rounded) == Ordering::Equal);
        self.agreements = if agrees { self.agreements + 1 } else { 0 };
        self.previous = Some(rounded);
        Ok(self.agreements >= REQUIRED_AGREEMENTS)
    }
}

fn bits_to_digits(bits: f64, radix: u32) -> u64 {
    (bits / f64::from(radix).log2()).ceil() as u64
}

/// Integral exponent of a power: its parity, and its value when small.
struct IntegralExponent {
    odd: bool,
    value: Option<i64>,
}

impl<H: RadixMathHelper> RadixMath<H> {
    // ========================================================================
    // Working Arithmetic
    // ========================================================================

    fn working_context(&self, ctx: &PrecisionContext, extra: u64) -> PrecisionContext {
        let radix = self.radix();
        let precision = (ctx.precision + bits_to_digits(GUARD_BITS, radix))
            .max(bits_to_digits(MIN_WORKING_BITS, radix));
        PrecisionContext::for_precision(precision + extra)
    }

    fn require_precision(&self, ctx: &PrecisionContext, operation: &'static str) -> Result<(), ContractError> {
        if ctx.precision == 0 {
            return Err(ContractError::InvalidContext {
                operation,
                requirement: "a bounded precision",
            });
        }
        Ok(())
    }

    fn one(&self) -> H::Value {
        self.helper().value_of(1)
    }

    fn integer(&self, value: impl Into<BigInt>) -> H::Value {
        self.helper().create_new(value.into(), BigInt::zero())
    }

    fn add_value(&self, a: &H::Value, b: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        Ok(self.add_core(a, b, w)?.value)
    }

    fn subtract_value(&self, a: &H::Value, b: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        Ok(self.add_core(a, &self.helper().negated(b), w)?.value)
    }

    fn multiply_value(&self, a: &H::Value, b: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        Ok(self.multiply_core(a, b, w)?.value)
    }

    fn divide_value(&self, a: &H::Value, b: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        Ok(self.divide_core(a, b, DivisionMode::Regular, w)?.value)
    }

    /// True once `term` no longer affects `sum` at working precision.
    fn negligible(&self, term: &H::Value, sum: &H::Value, w: &PrecisionContext) -> bool {
        let h = self.helper();
        if h.is_zero(term) {
            return true;
        }
        if h.is_zero(sum) {
            return false;
        }
        self.adjusted(term) < self.adjusted(sum) - BigInt::from(w.precision) - 1u32
    }

    fn series_term_limit(&self, w: &PrecisionContext) -> u64 {
        w.precision * 8 + 64
    }

    /// Rounds an approximation to `ctx`, treating it as inexact.
    fn finish(&self, approx: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        let p = self.parts(approx);
        self.round_fields(p.negative, p.magnitude, p.exponent, 0, true, ctx)
    }

    // ========================================================================
    // Square Root
    // ========================================================================

    pub(crate) fn square_root_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        let radix = self.radix();
        let p = self.parts(value);
        let ideal = p.exponent.div_floor(&BigInt::from(2));
        if h.is_zero(value) {
            return self.round_zero(p.negative, ideal, ctx);
        }
        if p.negative {
            return self.invalid();
        }
        if h.is_infinite(value) {
            return Ok(Outcome::exact(value.clone()));
        }
        self.require_precision(ctx, "square_root")?;

        let (mut magnitude, mut exponent) = (p.magnitude, p.exponent);
        if exponent.is_odd() {
            magnitude *= radix;
            exponent -= 1;
        }
        // Enough digits that the root has at least precision + 1 of them
        let wanted = 2 * ctx.precision + 2;
        let digits = digit_count(&magnitude, radix);
        let half_shift = wanted.saturating_sub(digits).div_ceil(2);
        let scaled = self
            .helper()
            .multiply_by_radix_power(&magnitude, &BigInt::from(2 * half_shift))?;
        let root = scaled.sqrt();
        let root_exponent = (exponent - BigInt::from(2 * half_shift)) / 2u32;
        let exact = &root * &root == scaled;

        if exact {
            let (root, root_exponent) = strip_trailing_zeros(root, root_exponent, &ideal, radix);
            return self.round_fields(false, root, root_exponent, 0, false, ctx);
        }
        // The root is irrational, so everything below its last digit is nonzero
        self.round_fields(false, root, root_exponent, 0, true, ctx)
    }

    // ========================================================================
    // Exponential
    // ========================================================================

    pub(crate) fn exp_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        if h.is_infinite(value) {
            if h.is_negative(value) {
                return Ok(Outcome::exact(h.create_finite(false, BigInt::zero(), BigInt::zero())));
            }
            return Ok(Outcome::exact(value.clone()));
        }
        if h.is_zero(value) {
            return Ok(Outcome::exact(self.one()));
        }
        self.require_precision(ctx, "exp")?;

        if let Some(outcome) = self.exp_out_of_range(value, ctx)? {
            return Ok(outcome);
        }
        let w = self.working_context(ctx, 2);
        let approx = self.exp_approx(value, &w)?;
        self.finish(&approx, ctx)
    }

    /// Results for arguments so large that exp certainly overflows or underflows.
    fn exp_out_of_range(&self, value: &H::Value, ctx: &PrecisionContext) -> Result<Option<Outcome<H::Value>>, MathError<H::Value>> {
        let h = self.helper();
        let radix_bits = f64::from(self.radix()).log2();
        let adjusted = self.adjusted(value);
        if !ctx.has_exponent_range {
            let magnitude_bits = adjusted
                .to_f64()
                .map(|a| (a + 1.0) * radix_bits)
                .unwrap_or(f64::INFINITY);
            if magnitude_bits > MAX_UNBOUNDED_EXP_BITS as f64 {
                return Err(ContractError::ExponentTooLarge(adjusted).into());
            }
            return Ok(None);
        }

        // exp(x) overflows once x > (e_max + 1) ln(radix); underflows once
        // x < (e_tiny - 1) ln(radix). Compare against a generous bound.
        let span = ctx.e_max.abs().max(ctx.e_tiny().abs()) + 2u32;
        let bound_digits = digit_count(&span, self.radix()) + 1;
        if adjusted < BigInt::from(bound_digits) {
            return Ok(None);
        }
        tracing::debug!(%adjusted, "exp argument outside the exponent range");
        if h.is_negative(value) {
            let below_tiny = ctx.e_tiny() - 2u32;
            return Ok(Some(self.round_fields(false, BigInt::one(), below_tiny, 0, false, ctx)?));
        }
        Ok(Some(self.overflow(false, ctx, SignalSet::empty())?))
    }

    /// exp(x) by argument halving, Taylor series and repeated squaring.
    fn exp_approx(&self, x: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        let radix = self.radix();
        let radix_bits = f64::from(radix).log2();
        let adjusted = self.adjusted(x).to_i64().unwrap_or(0);
        // |x| < radix^(adjusted + 1) <= 2^bits
        let bits = ((adjusted + 1) as f64 * radix_bits).ceil().max(0.0) as u64;
        let halvings = if bits > 0 { bits + 1 } else { 1 };
        let inner = w.clone().with_precision(w.precision + bits_to_digits(halvings as f64, radix) + 2);

        let divisor = self.integer(BigInt::one() << halvings);
        let reduced = self.divide_value(x, &divisor, &inner)?;

        let mut sum = self.one();
        let mut term = self.one();
        let limit = self.series_term_limit(&inner);
        let mut n = 1u64;
        loop {
            term = self.multiply_value(&term, &reduced, &inner)?;
            term = self.divide_value(&term, &self.integer(n), &inner)?;
            sum = self.add_value(&sum, &term, &inner)?;
            if self.negligible(&term, &sum, &inner) || n >= limit {
                break;
            }
            n += 1;
        }
        tracing::trace!(terms = n, halvings, "exp series converged");
        for _ in 0..halvings {
            sum = self.multiply_value(&sum, &sum, &inner)?;
        }
        Ok(sum)
    }

    // ========================================================================
    // Logarithms
    // ========================================================================

    pub(crate) fn ln_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(special) = self.log_special_cases(value, ctx)? {
            return Ok(special);
        }
        if self.compare_values(value, &self.one()) == Ordering::Equal {
            return Ok(Outcome::exact(self.helper().create_finite(false, BigInt::zero(), BigInt::zero())));
        }
        self.require_precision(ctx, "ln")?;
        let w = self.working_context(ctx, 4);
        let approx = self.ln_approx(value, &w)?;
        self.finish(&approx, ctx)
    }

    pub(crate) fn log10_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(special) = self.log_special_cases(value, ctx)? {
            return Ok(special);
        }
        let radix = self.radix();
        let p = self.parts(value);
        if radix == 10 {
            let limit = &p.exponent + BigInt::from(digit_count(&p.magnitude, radix));
            let (stripped, exponent) = strip_trailing_zeros(p.magnitude, p.exponent, &limit, radix);
            if stripped.is_one() {
                // Exact power of ten
                return self.round_fields(exponent.is_negative(), exponent.abs(), BigInt::zero(), 0, false, ctx);
            }
        }
        self.require_precision(ctx, "log10")?;
        let adjusted_digits = digit_count(&self.adjusted(value), radix);
        let w = self.working_context(ctx, 4 + adjusted_digits);
        let ln_value = self.ln_approx(value, &w)?;
        let ln_ten = self.ln_reduced(&self.integer(10), &w)?;
        let approx = self.divide_value(&ln_value, &ln_ten, &w)?;
        self.finish(&approx, ctx)
    }

    /// NaN, negative, zero and infinite arguments shared by ln and log10.
    fn log_special_cases(&self, value: &H::Value, ctx: &PrecisionContext) -> Result<Option<Outcome<H::Value>>, MathError<H::Value>> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(Some(nan));
        }
        let h = self.helper();
        if h.is_zero(value) {
            return Ok(Some(Outcome::exact(h.create_infinity(true)?)));
        }
        if h.is_negative(value) {
            return Ok(Some(self.invalid()?));
        }
        if h.is_infinite(value) {
            return Ok(Some(Outcome::exact(value.clone())));
        }
        Ok(None)
    }

    /// ln(x) for positive finite x at working precision.
    fn ln_approx(&self, x: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        let two = self.integer(2);
        let half = self.divide_value(&self.one(), &two, w)?;
        if self.compare_values(x, &half) != Ordering::Less && self.compare_values(x, &two) != Ordering::Greater {
            return self.ln_reduced(x, w);
        }

        // x = y * radix^adjusted with 1 <= y < radix
        let p = self.parts(x);
        let digits = digit_count(&p.magnitude, self.radix());
        let adjusted = &p.exponent + BigInt::from(digits) - 1u32;
        let y = self
            .helper()
            .create_finite(false, p.magnitude, BigInt::from(1) - BigInt::from(digits));
        let mut result = self.ln_reduced(&y, w)?;
        if !adjusted.is_zero() {
            let ln_radix = self.ln_reduced(&self.integer(self.radix()), w)?;
            let scaled = self.multiply_value(&ln_radix, &self.integer(adjusted), w)?;
            result = self.add_value(&result, &scaled, w)?;
        }
        Ok(result)
    }

    /// ln(y) for y within a small factor of one: square roots bring y into
    /// [8/9, 9/8] before the series runs.
    fn ln_reduced(&self, y: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        let upper = self.divide_value(&self.integer(9), &self.integer(8), w)?;
        let lower = self.divide_value(&self.integer(8), &self.integer(9), w)?;
        let mut y = y.clone();
        let mut doublings = 0u32;
        while self.compare_values(&y, &upper) == Ordering::Greater
            || self.compare_values(&y, &lower) == Ordering::Less
        {
            y = self.square_root_core(&y, w)?.value;
            doublings += 1;
        }
        let series = self.ln_series(&y, w)?;
        if doublings == 0 {
            return Ok(series);
        }
        self.multiply_value(&series, &self.integer(BigInt::one() << doublings), w)
    }

    /// ln(y) = 2 * atanh((y - 1) / (y + 1)).
    fn ln_series(&self, y: &H::Value, w: &PrecisionContext) -> Approx<H::Value> {
        let one = self.one();
        let numerator = self.subtract_value(y, &one, w)?;
        if self.helper().is_zero(&numerator) {
            return Ok(numerator);
        }
        let denominator = self.add_value(y, &one, w)?;
        let z = self.divide_value(&numerator, &denominator, w)?;
        let z_squared = self.multiply_value(&z, &z, w)?;

        let mut power = z.clone();
        let mut sum = z;
        let mut convergence = Convergence::new(w.precision);
        let limit = self.series_term_limit(w);
        let mut k = 1u64;
        loop {
            power = self.multiply_value(&power, &z_squared, w)?;
            k += 2;
            let term = self.divide_value(&power, &self.integer(k), w)?;
            sum = self.add_value(&sum, &term, w)?;
            let settled = convergence.observe(self, &sum)?;
            if (settled && self.negligible(&term, &sum, w)) || k >= limit {
                break;
            }
        }
        tracing::trace!(terms = k / 2, "ln series converged");
        self.multiply_value(&sum, &self.integer(2), w)
    }

    // ========================================================================
    // Power
    // ========================================================================

    pub(crate) fn power_core(&self, base: &H::Value, exponent: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[base, exponent], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        if h.is_zero(exponent) {
            if h.is_zero(base) {
                return self.invalid();
            }
            return Ok(Outcome::exact(self.one()));
        }

        let integral = self.integral_exponent(exponent);
        let odd = integral.as_ref().is_some_and(|i| i.odd);
        let negative_result = h.is_negative(base) && odd;
        let mut base = base.clone();
        if h.is_negative(&base) && integral.is_none() {
            if !h.is_zero(&base) {
                return self.invalid();
            }
            base = h.absolute(&base);
        }
        let exponent_negative = h.is_negative(exponent);

        if h.is_zero(&base) || h.is_infinite(&base) {
            let tiny = h.is_zero(&base) != exponent_negative;
            let value = if tiny {
                h.create_finite(negative_result, BigInt::zero(), BigInt::zero())
            } else {
                h.create_infinity(negative_result)?
            };
            return Ok(Outcome::exact(value));
        }
        if self.compare_values(&base, &self.one()) == Ordering::Equal && !h.is_infinite(exponent) {
            return Ok(Outcome::exact(self.one()));
        }
        if h.is_infinite(exponent) {
            return match self.compare_values(&base, &self.one()) {
                Ordering::Equal => self.round_fields(false, BigInt::one(), BigInt::zero(), 0, true, ctx),
                order => {
                    let grows = (order == Ordering::Greater) != exponent_negative;
                    let value = if grows {
                        h.create_infinity(false)?
                    } else {
                        h.create_finite(false, BigInt::zero(), BigInt::zero())
                    };
                    Ok(Outcome::exact(value))
                }
            };
        }

        if let Some(n) = integral.as_ref().and_then(|i| i.value) {
            return self.integer_power(&base, n, negative_result, ctx);
        }

        let unlimited = PrecisionContext::unlimited();
        let doubled = self.multiply_core(exponent, &self.integer(2), &unlimited)?.value;
        if self.compare_values(&doubled, &self.one()) == Ordering::Equal {
            return self.square_root_core(&base, ctx);
        }
        self.require_precision(ctx, "power")?;

        let magnitude = h.absolute(&base);
        let extra = 4
            + self.adjusted(exponent).to_u64().map_or(0, |a| a + 1)
            + digit_count(&self.adjusted(&magnitude), self.radix());
        let w = self.working_context(ctx, extra);
        let logarithm = self.ln_approx(&magnitude, &w)?;
        let product = self.multiply_value(&logarithm, exponent, &w)?;
        let result = self.exp_core(&product, ctx)?;
        let value = if negative_result {
            h.negated(&result.value)
        } else {
            result.value
        };
        Ok(Outcome::new(value, result.signals | SignalSet::INEXACT_ROUNDED))
    }

    /// Parity and (when small) value of an integral exponent; None if not an integer.
    fn integral_exponent(&self, exponent: &H::Value) -> Option<IntegralExponent> {
        let h = self.helper();
        if !h.is_finite(exponent) {
            return None;
        }
        let radix = self.radix();
        let p = self.parts(exponent);
        let (magnitude, scale) = if p.exponent.is_negative() {
            let limit = BigInt::zero();
            let (m, e) = strip_trailing_zeros(p.magnitude, p.exponent, &limit, radix);
            if e.is_negative() {
                return None;
            }
            (m, e)
        } else {
            (p.magnitude, p.exponent)
        };

        let small_scale = scale.to_u64().filter(|s| *s <= 64);
        let full = small_scale.and_then(|s| self.helper().multiply_by_radix_power(&magnitude, &BigInt::from(s)).ok());
        let odd = match &full {
            Some(full) => full.is_odd(),
            None => radix % 2 == 1 && magnitude.is_odd(),
        };
        let value = full.and_then(|full| {
            let full = if p.negative { -full } else { full };
            full.to_i64()
        });
        Some(IntegralExponent { odd, value })
    }

    fn integer_power(&self, base: &H::Value, n: i64, negative: bool, ctx: &PrecisionContext) -> MathResult<H::Value> {
        let h = self.helper();
        let magnitude = h.absolute(base);
        let count = n.unsigned_abs();

        if ctx.precision == 0 {
            let p = self.parts(&magnitude);
            let count32 = u32::try_from(count).map_err(|_| ContractError::ExponentTooLarge(BigInt::from(n)))?;
            let powered = num_traits::Pow::pow(&p.magnitude, count32);
            let value = h.create_finite(negative, powered, p.exponent * BigInt::from(count));
            if n < 0 {
                let one = self.one();
                return self.divide_core(&one, &value, DivisionMode::Regular, ctx);
            }
            return self.round_to_precision_core(&value, ctx);
        }

        let w = self.working_context(ctx, digit_count(&BigInt::from(count), 10) + 2);
        let mut inexact = false;
        let mut result = self.one();
        for bit in (0..u64::BITS - count.leading_zeros()).rev() {
            let squared = self.multiply_core(&result, &result, &w)?;
            inexact |= squared.signals.contains(SignalSet::INEXACT);
            result = squared.value;
            if count >> bit & 1 == 1 {
                let product = self.multiply_core(&result, &magnitude, &w)?;
                inexact |= product.signals.contains(SignalSet::INEXACT);
                result = product.value;
            }
        }
        if n < 0 {
            let quotient = self.divide_core(&self.one(), &result, DivisionMode::Regular, &w)?;
            inexact |= quotient.signals.contains(SignalSet::INEXACT);
            result = quotient.value;
        }

        let p = self.parts(&result);
        self.round_fields(negative, p.magnitude, p.exponent, 0, inexact, ctx)
    }

    // ========================================================================
    // Pi
    // ========================================================================

    pub(crate) fn pi_core(&self, ctx: &PrecisionContext) -> MathResult<H::Value> {
        self.require_precision(ctx, "pi")?;
        let w = self.working_context(ctx, 2);
        // pi = 4 * (4 * atan(1/5) - atan(1/239))
        let fifth = self.arctan_inverse(5, &w)?;
        let small = self.arctan_inverse(239, &w)?;
        let four = self.integer(4);
        let inner = self.subtract_value(&self.multiply_value(&fifth, &four, &w)?, &small, &w)?;
        let approx = self.multiply_value(&inner, &four, &w)?;
        self.finish(&approx, ctx)
    }

    /// atan(1/n) by its alternating series.
    fn arctan_inverse(&self, n: u32, w: &PrecisionContext) -> Approx<H::Value> {
        let n_squared = self.integer(u64::from(n) * u64::from(n));
        let mut power = self.divide_value(&self.one(), &self.integer(n), w)?;
        let mut sum = power.clone();
        let mut convergence = Convergence::new(w.precision);
        let limit = self.series_term_limit(w);
        let mut k = 1u64;
        let mut subtract = true;
        loop {
            power = self.divide_value(&power, &n_squared, w)?;
            k += 2;
            let term = self.divide_value(&power, &self.integer(k), w)?;
            sum = if subtract {
                self.subtract_value(&sum, &term, w)?
            } else {
                self.add_value(&sum, &term, w)?
            };
            subtract = !subtract;
            let settled = convergence.observe(self, &sum)?;
            if (settled && self.negligible(&term, &sum, w)) || k >= limit {
                break;
            }
        }
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::RadixArithmetic;
    use crate::types::{BinaryFloat, BinaryFloatHelper, Decimal, DecimalHelper};

    fn math() -> RadixMath<DecimalHelper> {
        RadixMath::new(DecimalHelper::new())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ten_digits() -> PrecisionContext {
        PrecisionContext::for_precision(10)
    }

    #[test]
    fn test_square_root() {
        let ctx = ten_digits();
        let root = math().square_root(&dec("2"), &ctx).unwrap();
        assert_eq!(root.value.to_string(), "1.414213562");
        assert_eq!(root.signals, SignalSet::INEXACT_ROUNDED);

        let exact = math().square_root(&dec("0.25"), &ctx).unwrap();
        assert_eq!(exact.value.to_string(), "0.5");
        assert!(exact.signals.is_empty());

        assert_eq!(math().square_root(&dec("100"), &ctx).unwrap().value.to_string(), "10");
        assert!(math().square_root(&dec("-4"), &ctx).unwrap().value.is_nan());
        assert_eq!(math().square_root(&dec("-0"), &ctx).unwrap().value.to_string(), "-0");
    }

    #[test]
    fn test_exp() {
        let ctx = ten_digits();
        assert_eq!(math().exp(&dec("1"), &ctx).unwrap().value.to_string(), "2.718281828");
        assert_eq!(math().exp(&dec("-1"), &ctx).unwrap().value.to_string(), "0.3678794412");
        assert_eq!(math().exp(&dec("0"), &ctx).unwrap().value.to_string(), "1");
        assert_eq!(math().exp(&dec("-Infinity"), &ctx).unwrap().value.to_string(), "0");

        let bounded = PrecisionContext::decimal64();
        let huge = math().exp(&dec("1E+10"), &bounded).unwrap();
        assert!(huge.value.is_infinite());
        assert!(huge.signals.contains(SignalSet::OVERFLOW));
    }

    #[test]
    fn test_logarithms() {
        let ctx = ten_digits();
        assert_eq!(math().ln(&dec("10"), &ctx).unwrap().value.to_string(), "2.302585093");
        assert_eq!(math().ln(&dec("0.5"), &ctx).unwrap().value.to_string(), "-0.6931471806");
        assert_eq!(math().ln(&dec("1"), &ctx).unwrap().value.to_string(), "0");
        assert_eq!(math().ln(&dec("0"), &ctx).unwrap().value.to_string(), "-Infinity");
        assert!(math().ln(&dec("-1"), &ctx).unwrap().value.is_nan());

        let exact = math().log10(&dec("1000"), &ctx).unwrap();
        assert_eq!(exact.value.to_string(), "3");
        assert!(exact.signals.is_empty());
        assert_eq!(math().log10(&dec("0.01"), &ctx).unwrap().value.to_string(), "-2");
        assert_eq!(math().log10(&dec("2"), &ctx).unwrap().value.to_string(), "0.3010299957");
    }

    #[test]
    fn test_power() {
        let ctx = ten_digits();
        let exact = math().power(&dec("2"), &dec("10"), &ctx).unwrap();
        assert_eq!(exact.value.to_string(), "1024");
        assert!(exact.signals.is_empty());

        assert_eq!(math().power(&dec("2"), &dec("-2"), &ctx).unwrap().value.to_string(), "0.25");
        assert_eq!(math().power(&dec("-2"), &dec("3"), &ctx).unwrap().value.to_string(), "-8");
        assert_eq!(
            math().power(&dec("2"), &dec("0.5"), &ctx).unwrap().value.to_string(),
            "1.414213562"
        );
        assert_eq!(
            math().power(&dec("10"), &dec("0.3"), &ctx).unwrap().value.to_string(),
            "1.995262315"
        );
        assert!(math().power(&dec("0"), &dec("0"), &ctx).unwrap().value.is_nan());
        assert!(math().power(&dec("-2"), &dec("0.5"), &ctx).unwrap().value.is_nan());
        assert_eq!(math().power(&dec("0"), &dec("-1"), &ctx).unwrap().value.to_string(), "Infinity");
    }

    #[test]
    fn test_pi() {
        let pi = math().pi(&PrecisionContext::for_precision(20)).unwrap();
        assert_eq!(pi.value.to_string(), "3.1415926535897932385");
        assert_eq!(pi.signals, SignalSet::INEXACT_ROUNDED);
    }

    #[test]
    fn test_unbounded_precision_rejected() {
        let unlimited = PrecisionContext::unlimited();
        for err in [
            math().exp(&dec("1"), &unlimited).unwrap_err(),
            math().ln(&dec("2"), &unlimited).unwrap_err(),
            math().pi(&unlimited).unwrap_err(),
        ] {
            assert!(matches!(err.as_contract(), Some(ContractError::InvalidContext { .. })));
        }
    }

    #[test]
    fn test_binary_radix() {
        let m = RadixMath::new(BinaryFloatHelper::new());
        let ctx = PrecisionContext::binary64();
        let root = m.square_root(&BinaryFloat::from_f64(2.0), &ctx).unwrap();
        assert_eq!(root.value.to_f64(), 2f64.sqrt());
        let e = m.exp(&BinaryFloat::from_f64(1.0), &ctx).unwrap();
        assert_eq!(e.value.to_f64(), std::f64::consts::E);
        let pi = m.pi(&ctx).unwrap();
        assert_eq!(pi.value.to_f64(), std::f64::consts::PI);
    }
}
