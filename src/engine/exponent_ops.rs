// ============================================================================
// Exponent Operations
// Quantize, round-to-exponent, reduce and the next-value family
// ============================================================================

use super::division::strip_trailing_zeros;
use super::radix_math::{Parts, RadixMath};
use super::rounding::{adjusted_exponent, should_increment};
use crate::accumulator::ShiftAccumulator;
use crate::context::{PrecisionContext, RoundingMode, SignalSet};
use crate::interfaces::RadixMathHelper;
use crate::numeric::{digit_count, radix_power, ContractError, MathResult, Outcome};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::cmp::Ordering;

/// How round-to-exponent reports discarded digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExponentRounding {
    /// A discarded nonzero digit makes the operation invalid
    Exact,
    /// Discards are reported as inexact and rounded
    Simple,
    /// Discards are not reported
    Silent,
}

impl<H: RadixMathHelper> RadixMath<H> {
    // ========================================================================
    // Quantize
    // ========================================================================

    pub(crate) fn quantize_core(
        &self,
        value: &H::Value,
        target: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value, target], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        match (h.is_infinite(value), h.is_infinite(target)) {
            (true, true) => return Ok(Outcome::exact(value.clone())),
            (true, false) | (false, true) => return self.invalid(),
            (false, false) => {}
        }
        let exponent = h.exponent(target);
        let outcome = match self.rescale(self.parts(value), &exponent, ctx.rounding, ctx)? {
            Some(outcome) => outcome,
            None => return self.invalid(),
        };
        if ctx.has_exponent_range {
            let parts = self.parts(&outcome.value);
            let adjusted = adjusted_exponent(&parts.magnitude, &parts.exponent, self.radix());
            if adjusted > ctx.e_max || exponent > ctx.exponent_ceiling() || exponent < ctx.e_tiny() {
                return self.invalid();
            }
            if !parts.magnitude.is_zero() && adjusted < ctx.e_min {
                return Ok(outcome.with_signals(SignalSet::SUBNORMAL));
            }
        }
        Ok(outcome)
    }

    /// Moves a finite value to exactly `exponent`, rounding with `rounding`.
    /// None if the result needs more digits than the precision.
    fn rescale(
        &self,
        parts: Parts,
        exponent: &BigInt,
        rounding: RoundingMode,
        ctx: &PrecisionContext,
    ) -> Result<Option<Outcome<H::Value>>, ContractError> {
        let radix = self.radix();
        let Parts {
            negative,
            magnitude,
            exponent: current,
        } = parts;
        let mut signals = SignalSet::empty();

        let mantissa = if magnitude.is_zero() {
            magnitude
        } else if exponent < &current {
            let raise = &current - exponent;
            if ctx.precision > 0
                && BigInt::from(digit_count(&magnitude, radix)) + &raise > BigInt::from(ctx.precision)
            {
                return Ok(None);
            }
            self.helper().multiply_by_radix_power(&magnitude, &raise)?
        } else if exponent > &current {
            let mut acc = self.helper().create_shift_accumulator(magnitude);
            acc.shift_right(&(exponent - &current));
            signals |= SignalSet::ROUNDED;
            if acc.is_inexact() {
                if rounding == RoundingMode::Unnecessary {
                    return Err(ContractError::RoundingNecessary);
                }
                signals |= SignalSet::INEXACT;
            }
            let mut mantissa = acc.shifted_magnitude().clone();
            if should_increment(&acc, rounding, negative, radix) {
                mantissa += 1u32;
            }
            mantissa
        } else {
            magnitude
        };

        if ctx.precision > 0 && digit_count(&mantissa, radix) > ctx.precision {
            return Ok(None);
        }
        Ok(Some(Outcome::new(
            self.helper().create_finite(negative, mantissa, exponent.clone()),
            signals,
        )))
    }

    // ========================================================================
    // Round to Exponent
    // ========================================================================

    pub(crate) fn round_to_exponent_core(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
        flavor: ExponentRounding,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        if h.is_infinite(value) {
            return Ok(Outcome::exact(value.clone()));
        }
        let parts = self.parts(value);
        let outcome = if &parts.exponent >= exponent {
            // Already coarse enough; only the precision can force rounding
            self.round_to_precision_core(value, ctx)?
        } else {
            match self.rescale(parts, exponent, ctx.rounding, ctx)? {
                Some(outcome) => outcome,
                None => return self.invalid(),
            }
        };
        if ctx.has_exponent_range
            && h.is_finite(&outcome.value)
            && !h.is_zero(&outcome.value)
            && self.adjusted(&outcome.value) > ctx.e_max
        {
            return self.invalid();
        }
        let signals = match flavor {
            ExponentRounding::Exact if outcome.signals.contains(SignalSet::INEXACT) => {
                return self.invalid();
            }
            ExponentRounding::Exact => outcome.signals - SignalSet::ROUNDED,
            ExponentRounding::Silent => outcome.signals - SignalSet::INEXACT_ROUNDED,
            ExponentRounding::Simple => outcome.signals,
        };
        Ok(Outcome::new(outcome.value, signals))
    }

    // ========================================================================
    // Reduce
    // ========================================================================

    pub(crate) fn reduce_core(&self, value: &H::Value, ctx: &PrecisionContext) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        let rounded = self.round_to_precision_core(value, ctx)?;
        let h = self.helper();
        if !h.is_finite(&rounded.value) {
            return Ok(rounded);
        }
        let parts = self.parts(&rounded.value);
        if parts.magnitude.is_zero() {
            let zero = h.create_finite(parts.negative, BigInt::zero(), BigInt::zero());
            return Ok(Outcome::new(zero, rounded.signals));
        }
        let limit = if ctx.has_exponent_range {
            ctx.exponent_ceiling()
        } else {
            // Stripping adds at most one exponent step per digit
            &parts.exponent + BigInt::from(digit_count(&parts.magnitude, self.radix()))
        };
        let (magnitude, exponent) =
            strip_trailing_zeros(parts.magnitude, parts.exponent, &limit, self.radix());
        Ok(Outcome::new(
            h.create_finite(parts.negative, magnitude, exponent),
            rounded.signals,
        ))
    }

    // ========================================================================
    // Next Value
    // ========================================================================

    fn require_bounded_context(
        &self,
        ctx: &PrecisionContext,
        operation: &'static str,
    ) -> Result<(), ContractError> {
        if ctx.precision == 0 || !ctx.has_exponent_range {
            return Err(ContractError::InvalidContext {
                operation,
                requirement: "a bounded precision and an exponent range",
            });
        }
        Ok(())
    }

    /// Exponent of a unit small enough that adding it to `value` and
    /// rounding directed lands on the adjacent representable value.
    fn next_quantum_exponent(&self, value: &H::Value, ctx: &PrecisionContext) -> BigInt {
        let e_tiny = ctx.e_tiny();
        let h = self.helper();
        if h.is_zero(value) {
            return e_tiny;
        }
        let parts = self.parts(value);
        let lowest = &self.adjusted(value) - BigInt::from(ctx.precision) + BigInt::one();
        let candidate = parts.exponent.min(lowest) - 2u32;
        candidate.max(e_tiny)
    }

    /// Largest finite magnitude of `ctx`, with the given sign.
    fn largest_finite(&self, negative: bool, ctx: &PrecisionContext) -> Result<H::Value, ContractError> {
        let magnitude = radix_power(self.radix(), ctx.precision)? - BigInt::one();
        let exponent = &ctx.e_max + BigInt::one() - BigInt::from(ctx.precision);
        Ok(self.helper().create_finite(negative, magnitude, exponent))
    }

    pub(crate) fn next_core(
        &self,
        value: &H::Value,
        upward: bool,
        ctx: &PrecisionContext,
        operation: &'static str,
    ) -> MathResult<H::Value> {
        self.require_bounded_context(ctx, operation)?;
        if let Some(nan) = self.nan_result(&[value], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        if h.is_infinite(value) {
            if h.is_negative(value) == upward {
                return Ok(Outcome::exact(self.largest_finite(upward, ctx)?));
            }
            return Ok(Outcome::exact(value.clone()));
        }

        let quantum = Parts::new(!upward, BigInt::one(), self.next_quantum_exponent(value, ctx));
        let rounding = if upward {
            RoundingMode::Ceiling
        } else {
            RoundingMode::Floor
        };
        let step_ctx = ctx.without_traps().with_rounding(rounding);
        let stepped = self.add_parts(self.parts(value), quantum, &step_ctx)?;
        if h.is_zero(&stepped.value) {
            // Stepping off the smallest subnormal keeps the operand's sign
            let zero = h.create_finite(h.is_negative(value), BigInt::zero(), ctx.e_tiny());
            return Ok(Outcome::exact(zero));
        }
        Ok(Outcome::exact(stepped.value))
    }

    pub(crate) fn next_toward_core(
        &self,
        value: &H::Value,
        target: &H::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        self.require_bounded_context(ctx, "next_toward")?;
        if let Some(nan) = self.nan_result(&[value, target], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        let stepped = match self.compare_values(value, target) {
            Ordering::Equal => {
                let parts = self.parts(value);
                let negative = h.is_negative(target);
                let copy = if h.is_infinite(value) {
                    h.create_infinity(negative)?
                } else {
                    h.create_finite(negative, parts.magnitude, parts.exponent)
                };
                return Ok(Outcome::exact(copy));
            }
            Ordering::Less => self.next_core(value, true, ctx, "next_toward")?,
            Ordering::Greater => self.next_core(value, false, ctx, "next_toward")?,
        };

        let mut signals = SignalSet::empty();
        if h.is_infinite(&stepped.value) {
            signals |= SignalSet::OVERFLOW | SignalSet::INEXACT_ROUNDED;
        } else if !h.is_zero(&stepped.value) && self.adjusted(&stepped.value) < ctx.e_min {
            signals |= SignalSet::SUBNORMAL | SignalSet::UNDERFLOW | SignalSet::INEXACT_ROUNDED;
        } else if h.is_zero(&stepped.value) {
            signals |= SignalSet::SUBNORMAL
                | SignalSet::UNDERFLOW
                | SignalSet::INEXACT_ROUNDED
                | SignalSet::CLAMPED;
        }
        Ok(Outcome::new(stepped.value, signals))
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{PrecisionContext, RoundingMode, SignalSet};
    use crate::engine::RadixMath;
    use crate::interfaces::RadixArithmetic;
    use crate::numeric::ContractError;
    use crate::types::{Decimal, DecimalHelper};
    use num_bigint::BigInt;

    fn math() -> RadixMath<DecimalHelper> {
        RadixMath::new(DecimalHelper::new())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn bounded() -> PrecisionContext {
        PrecisionContext::for_precision(3).with_exponent_range(-9, 9)
    }

    #[test]
    fn test_quantize() {
        let ctx = PrecisionContext::for_precision(9);
        let q = math().quantize(&dec("2.17"), &dec("0.1"), &ctx).unwrap();
        assert_eq!(q.value.to_string(), "2.2");
        assert_eq!(q.signals, SignalSet::INEXACT_ROUNDED);

        let q = math().quantize(&dec("2"), &dec("1E-3"), &ctx).unwrap();
        assert_eq!(q.value.to_string(), "2.000");
        assert!(q.signals.is_empty());

        let small = PrecisionContext::for_precision(5);
        let q = math().quantize(&dec("123.456"), &dec("1E-10"), &small).unwrap();
        assert!(q.value.is_nan());
        assert_eq!(q.signals, SignalSet::INVALID);

        let q = math().quantize(&dec("1"), &dec("Infinity"), &ctx).unwrap();
        assert!(q.value.is_nan());
        let q = math().quantize(&dec("-Infinity"), &dec("Infinity"), &ctx).unwrap();
        assert_eq!(q.value.to_string(), "-Infinity");
    }

    #[test]
    fn test_round_to_exponent_family() {
        let ctx = PrecisionContext::for_precision(9);
        let zero = BigInt::from(0);

        let simple = math().round_to_exponent_simple(&dec("2.5"), &zero, &ctx).unwrap();
        assert_eq!(simple.value.to_string(), "2");
        assert_eq!(simple.signals, SignalSet::INEXACT_ROUNDED);

        let silent = math()
            .round_to_exponent_no_rounded_flag(&dec("2.5"), &zero, &ctx)
            .unwrap();
        assert_eq!(silent.value.to_string(), "2");
        assert!(silent.signals.is_empty());

        let exact = math().round_to_exponent_exact(&dec("2.5"), &zero, &ctx).unwrap();
        assert!(exact.value.is_nan());
        assert_eq!(exact.signals, SignalSet::INVALID);

        let exact = math().round_to_exponent_exact(&dec("2.0"), &zero, &ctx).unwrap();
        assert_eq!(exact.value.to_string(), "2");
        assert!(exact.signals.is_empty());
    }

    #[test]
    fn test_round_to_exponent_respects_precision() {
        let ctx = PrecisionContext::for_precision(3);
        let zero = BigInt::from(0);

        // Exact never discards a nonzero digit, whichever way the precision bites
        for input in ["12345", "12345.0"] {
            let exact = math().round_to_exponent_exact(&dec(input), &zero, &ctx).unwrap();
            assert!(exact.value.is_nan(), "{input}");
            assert_eq!(exact.signals, SignalSet::INVALID);
        }

        // A single rounding to the exponent that overflows the precision is invalid
        let half_up = ctx.clone().with_rounding(RoundingMode::HalfUp);
        let too_wide = math()
            .round_to_exponent_simple(&dec("1244.5"), &zero, &half_up)
            .unwrap();
        assert!(too_wide.value.is_nan());
        assert_eq!(too_wide.signals, SignalSet::INVALID);

        let fits = math()
            .round_to_exponent_simple(&dec("124.45"), &zero, &half_up)
            .unwrap();
        assert_eq!(fits.value.to_string(), "124");
        assert_eq!(fits.signals, SignalSet::INEXACT_ROUNDED);

        // Coarser values only round to the precision
        let coarse = math().round_to_exponent_simple(&dec("12345"), &zero, &ctx).unwrap();
        assert_eq!(coarse.value.to_string(), "1.23E+4");
        assert_eq!(coarse.signals, SignalSet::INEXACT_ROUNDED);

        let silent = math()
            .round_to_exponent_no_rounded_flag(&dec("12345"), &zero, &ctx)
            .unwrap();
        assert_eq!(silent.value.to_string(), "1.23E+4");
        assert!(silent.signals.is_empty());
    }

    #[test]
    fn test_reduce() {
        let ctx = PrecisionContext::for_precision(9);
        assert_eq!(math().reduce(&dec("1.200"), &ctx).unwrap().value.to_string(), "1.2");
        assert_eq!(math().reduce(&dec("120"), &ctx).unwrap().value.to_string(), "1.2E+2");
        assert_eq!(math().reduce(&dec("-0.00"), &ctx).unwrap().value.to_string(), "-0");
    }

    #[test]
    fn test_next_plus_and_minus() {
        let ctx = bounded();
        let up = math().next_plus(&dec("1"), &ctx).unwrap();
        assert_eq!(up.value.to_string(), "1.01");
        assert!(up.signals.is_empty());

        let down = math().next_minus(&dec("1"), &ctx).unwrap();
        assert_eq!(down.value.to_string(), "0.999");

        let past_max = math().next_plus(&dec("9.99E+9"), &ctx).unwrap();
        assert_eq!(past_max.value.to_string(), "Infinity");

        let from_infinity = math().next_plus(&dec("-Infinity"), &ctx).unwrap();
        assert_eq!(from_infinity.value.to_string(), "-9.99E+9");

        let tiny = math().next_plus(&dec("0"), &ctx).unwrap();
        assert_eq!(tiny.value.to_string(), "1E-11");
    }

    #[test]
    fn test_next_off_smallest_subnormal_keeps_sign() {
        let ctx = bounded();
        let down = math().next_minus(&dec("1E-11"), &ctx).unwrap();
        assert_eq!(down.value.to_string(), "0E-11");
        assert!(!down.value.is_negative());

        let up = math().next_plus(&dec("-1E-11"), &ctx).unwrap();
        assert_eq!(up.value.to_string(), "-0E-11");

        let toward = math().next_toward(&dec("1E-11"), &dec("0"), &ctx).unwrap();
        assert_eq!(toward.value.to_string(), "0E-11");
        assert!(!toward.value.is_negative());
        assert!(toward.signals.contains(SignalSet::UNDERFLOW | SignalSet::CLAMPED));
    }

    #[test]
    fn test_next_requires_bounded_context() {
        let err = math()
            .next_plus(&dec("1"), &PrecisionContext::for_precision(3))
            .unwrap_err();
        assert!(matches!(
            err.as_contract(),
            Some(ContractError::InvalidContext { operation: "next_plus", .. })
        ));
    }

    #[test]
    fn test_next_toward() {
        let ctx = bounded();
        let toward = math().next_toward(&dec("1"), &dec("2"), &ctx).unwrap();
        assert_eq!(toward.value.to_string(), "1.01");
        assert!(toward.signals.is_empty());

        let same = math().next_toward(&dec("1"), &dec("1.0"), &ctx).unwrap();
        assert_eq!(same.value.to_string(), "1");

        let subnormal = math().next_toward(&dec("0"), &dec("1"), &ctx).unwrap();
        assert_eq!(subnormal.value.to_string(), "1E-11");
        assert!(subnormal
            .signals
            .contains(SignalSet::SUBNORMAL | SignalSet::UNDERFLOW | SignalSet::INEXACT));
    }
}
