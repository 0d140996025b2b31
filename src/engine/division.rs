// ============================================================================
// Division
// Quotients, integer quotients and remainders
// ============================================================================

use super::radix_math::{Parts, RadixMath};
use super::rounding::{adjusted_exponent, should_increment};
use crate::accumulator::ShiftAccumulator;
use crate::context::{PrecisionContext, RoundingMode, SignalSet};
use crate::interfaces::RadixMathHelper;
use crate::numeric::{digit_count, ContractError, MathResult, Outcome};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Quotient digits produced under unlimited precision before checking
/// whether the expansion terminates at all.
const TERMINATION_CHECK_DIGITS: u32 = 5;

/// What kind of quotient a division produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DivisionMode {
    /// Rounded to the context's precision
    Regular,
    /// Integer part, trailing zeros stripped toward the ideal exponent
    IntegerNaturalScale,
    /// Integer part at exponent zero
    IntegerZeroScale,
    /// Rounded to exactly this exponent
    FixedExponent(BigInt),
}

/// Digit just below the quotient and whether anything nonzero follows it.
fn remainder_digits(remainder: &BigInt, divisor: &BigInt, radix: u32) -> (u32, bool) {
    if remainder.is_zero() {
        return (0, false);
    }
    let (digit, rest) = (remainder * radix).div_rem(divisor);
    (digit.to_u32().unwrap_or(0), !rest.is_zero())
}

/// Strips trailing zero digits while the exponent stays at most `limit`.
pub(crate) fn strip_trailing_zeros(
    magnitude: BigInt,
    exponent: BigInt,
    limit: &BigInt,
    radix: u32,
) -> (BigInt, BigInt) {
    let mut magnitude = magnitude;
    let mut exponent = exponent;
    if magnitude.is_zero() {
        return (magnitude, exponent);
    }
    let radix_big = BigInt::from(radix);
    while &exponent < limit {
        let (quotient, rest) = magnitude.div_rem(&radix_big);
        if !rest.is_zero() {
            break;
        }
        magnitude = quotient;
        exponent += 1;
    }
    (magnitude, exponent)
}

impl<H: RadixMathHelper> RadixMath<H> {
    pub(crate) fn divide_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        mode: DivisionMode,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        let negative = h.is_negative(a) != h.is_negative(b);

        if h.is_infinite(a) {
            if h.is_infinite(b) {
                return self.invalid();
            }
            return Ok(Outcome::exact(h.create_infinity(negative)?));
        }
        if h.is_infinite(b) {
            return match &mode {
                DivisionMode::Regular if ctx.has_exponent_range => {
                    let zero = h.create_finite(negative, BigInt::zero(), ctx.e_tiny());
                    Ok(Outcome::new(zero, SignalSet::CLAMPED))
                }
                DivisionMode::FixedExponent(exponent) => Ok(Outcome::exact(h.create_finite(
                    negative,
                    BigInt::zero(),
                    exponent.clone(),
                ))),
                _ => Ok(Outcome::exact(h.create_finite(
                    negative,
                    BigInt::zero(),
                    BigInt::zero(),
                ))),
            };
        }

        let x = self.parts(a);
        let y = self.parts(b);
        if y.magnitude.is_zero() {
            if x.magnitude.is_zero() {
                return self.invalid();
            }
            let infinity = h.create_infinity(negative)?;
            return Ok(Outcome::new(infinity, SignalSet::DIVIDE_BY_ZERO));
        }

        match mode {
            DivisionMode::Regular => self.divide_regular(negative, x, y, ctx),
            DivisionMode::IntegerNaturalScale => self.divide_to_integer(negative, x, y, true, ctx),
            DivisionMode::IntegerZeroScale => self.divide_to_integer(negative, x, y, false, ctx),
            DivisionMode::FixedExponent(exponent) => {
                self.divide_to_exponent_parts(negative, x, y, exponent, ctx)
            }
        }
    }

    fn divide_regular(&self, negative: bool, x: Parts, y: Parts, ctx: &PrecisionContext) -> MathResult<H::Value> {
        let radix = self.radix();
        let ideal = &x.exponent - &y.exponent;
        if x.magnitude.is_zero() {
            return self.round_zero(negative, ideal, ctx);
        }

        if ctx.precision == 0 {
            let (quotient, exponent) = self.divide_exactly(&x.magnitude, &y.magnitude, ideal.clone())?;
            let (quotient, exponent) = strip_trailing_zeros(quotient, exponent, &ideal, radix);
            return self.round_fields(negative, quotient, exponent, 0, false, ctx);
        }

        // Scale the dividend so the integer quotient has at least `precision` digits
        let dividend_digits = digit_count(&x.magnitude, radix) as i128;
        let divisor_digits = digit_count(&y.magnitude, radix) as i128;
        let scale = (ctx.precision as i128 + divisor_digits - dividend_digits).max(0);
        let scale = BigInt::from(scale);
        let dividend = self.helper().multiply_by_radix_power(&x.magnitude, &scale)?;
        let (quotient, remainder) = dividend.div_rem(&y.magnitude);
        let exponent = ideal.clone() - scale;

        if remainder.is_zero() {
            let (quotient, exponent) = strip_trailing_zeros(quotient, exponent, &ideal, radix);
            return self.round_fields(negative, quotient, exponent, 0, false, ctx);
        }
        let (last, older) = remainder_digits(&remainder, &y.magnitude, radix);
        self.round_fields(negative, quotient, exponent, last, older, ctx)
    }

    /// Long division without a precision limit; fails if the quotient
    /// never terminates in this radix.
    fn divide_exactly(
        &self,
        dividend: &BigInt,
        divisor: &BigInt,
        exponent: BigInt,
    ) -> Result<(BigInt, BigInt), ContractError> {
        let radix = self.radix();
        let (mut quotient, mut remainder) = dividend.div_rem(divisor);
        let mut exponent = exponent;
        let mut produced = 0u32;
        while !remainder.is_zero() {
            if produced == TERMINATION_CHECK_DIGITS
                && !self.helper().has_terminating_radix_expansion(&remainder, divisor)
            {
                tracing::debug!(radix, "quotient has a non-terminating expansion");
                return Err(ContractError::NonTerminatingExpansion);
            }
            let (digit, rest) = (remainder * radix).div_rem(divisor);
            quotient = quotient * radix + digit;
            remainder = rest;
            exponent -= 1;
            produced += 1;
        }
        Ok((quotient, exponent))
    }

    fn divide_to_integer(
        &self,
        negative: bool,
        x: Parts,
        y: Parts,
        natural_scale: bool,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        let radix = self.radix();
        let ideal = &x.exponent - &y.exponent;
        let quotient = match self.integer_quotient(&x, &y, ctx)? {
            Some((quotient, _)) => quotient,
            None => return self.invalid(),
        };

        let (quotient, exponent) = if natural_scale && ideal.is_positive() {
            strip_trailing_zeros(quotient, BigInt::zero(), &ideal, radix)
        } else {
            (quotient, BigInt::zero())
        };
        if quotient.is_zero() {
            let exponent = if natural_scale && ideal.is_positive() {
                ideal
            } else {
                BigInt::zero()
            };
            return self.round_zero(negative, exponent, ctx);
        }
        self.round_fields(negative, quotient, exponent, 0, false, ctx)
    }

    /// `trunc(|x| / |y|)` and the exact remainder aligned to
    /// `min(x.exponent, y.exponent)`. None when the quotient needs more
    /// digits than the precision.
    pub(crate) fn integer_quotient(
        &self,
        x: &Parts,
        y: &Parts,
        ctx: &PrecisionContext,
    ) -> Result<Option<(BigInt, BigInt)>, ContractError> {
        let radix = self.radix();
        let adjusted_x = adjusted_exponent(&x.magnitude, &x.exponent, radix);
        let adjusted_y = adjusted_exponent(&y.magnitude, &y.exponent, radix);
        let exponent = x.exponent.clone().min(y.exponent.clone());

        if x.magnitude.is_zero() || adjusted_x < adjusted_y {
            let remainder = self
                .helper()
                .multiply_by_radix_power(&x.magnitude, &(&x.exponent - &exponent))?;
            return Ok(Some((BigInt::zero(), remainder)));
        }
        if ctx.precision > 0 && &adjusted_x - &adjusted_y > BigInt::from(ctx.precision) {
            return Ok(None);
        }

        let dividend = self
            .helper()
            .multiply_by_radix_power(&x.magnitude, &(&x.exponent - &exponent))?;
        let divisor = self
            .helper()
            .multiply_by_radix_power(&y.magnitude, &(&y.exponent - &exponent))?;
        let (quotient, remainder) = dividend.div_rem(&divisor);
        if ctx.precision > 0 && digit_count(&quotient, radix) > ctx.precision {
            return Ok(None);
        }
        Ok(Some((quotient, remainder)))
    }

    fn divide_to_exponent_parts(
        &self,
        negative: bool,
        x: Parts,
        y: Parts,
        target: BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        let radix = self.radix();
        if x.magnitude.is_zero() {
            return Ok(Outcome::exact(self.helper().create_finite(negative, BigInt::zero(), target)));
        }
        let adjusted_x = adjusted_exponent(&x.magnitude, &x.exponent, radix);
        let adjusted_y = adjusted_exponent(&y.magnitude, &y.exponent, radix);

        // quotient = x.m * radix^shift / y.m, landing at the target exponent
        let shift = &x.exponent - &y.exponent - &target;
        if ctx.precision > 0 && &adjusted_x - &adjusted_y - &target >= BigInt::from(ctx.precision) + 1u32 {
            return self.invalid();
        }
        let (quotient, last, older) = if !shift.is_negative() {
            let dividend = self.helper().multiply_by_radix_power(&x.magnitude, &shift)?;
            let (quotient, remainder) = dividend.div_rem(&y.magnitude);
            let (last, older) = remainder_digits(&remainder, &y.magnitude, radix);
            (quotient, last, older)
        } else if &adjusted_x - &target + 1u32 < adjusted_y {
            // The quotient is below one unit of the last retained digit position
            (BigInt::zero(), 0, true)
        } else {
            let divisor = self.helper().multiply_by_radix_power(&y.magnitude, &(-&shift))?;
            let (quotient, remainder) = x.magnitude.div_rem(&divisor);
            let (last, older) = remainder_digits(&remainder, &divisor, radix);
            (quotient, last, older)
        };

        let acc = self
            .helper()
            .create_shift_accumulator_with_discarded(quotient.clone(), last, older);
        let mut signals = SignalSet::empty();
        if acc.is_inexact() {
            if ctx.rounding == RoundingMode::Unnecessary {
                return Err(ContractError::RoundingNecessary.into());
            }
            signals |= SignalSet::INEXACT_ROUNDED;
        }
        let mut quotient = quotient;
        if should_increment(&acc, ctx.rounding, negative, radix) {
            quotient += 1u32;
        }
        if ctx.precision > 0 && digit_count(&quotient, radix) > ctx.precision {
            return self.invalid();
        }
        if ctx.has_exponent_range {
            let adjusted = adjusted_exponent(&quotient, &target, radix);
            if adjusted > ctx.e_max || target < ctx.e_tiny() {
                return self.invalid();
            }
            if !quotient.is_zero() && adjusted < ctx.e_min {
                signals |= SignalSet::SUBNORMAL;
                if signals.contains(SignalSet::INEXACT) {
                    signals |= SignalSet::UNDERFLOW;
                }
            }
        }
        Ok(Outcome::new(
            self.helper().create_finite(negative, quotient, target),
            signals,
        ))
    }

    // ========================================================================
    // Remainders
    // ========================================================================

    pub(crate) fn remainder_core(
        &self,
        a: &H::Value,
        b: &H::Value,
        nearest: bool,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if let Some(nan) = self.nan_result(&[a, b], ctx)? {
            return Ok(nan);
        }
        let h = self.helper();
        if h.is_infinite(a) || h.is_zero(b) {
            return self.invalid();
        }
        if h.is_infinite(b) {
            return self.round_to_precision_core(a, ctx);
        }

        let x = self.parts(a);
        let y = self.parts(b);
        let exponent = x.exponent.clone().min(y.exponent.clone());
        let (mut quotient, remainder) = match self.integer_quotient(&x, &y, ctx)? {
            Some(found) => found,
            None => return self.invalid(),
        };

        let mut negative = x.negative;
        let mut magnitude = remainder;
        if nearest && !magnitude.is_zero() {
            let divisor = self
                .helper()
                .multiply_by_radix_power(&y.magnitude, &(&y.exponent - &exponent))?;
            let twice = &magnitude * 2u32;
            if twice > divisor || (twice == divisor && quotient.is_odd()) {
                quotient += BigInt::one();
                magnitude = divisor - magnitude;
                negative = !negative;
            }
            if ctx.precision > 0 && digit_count(&quotient, self.radix()) > ctx.precision {
                return self.invalid();
            }
        }
        if magnitude.is_zero() {
            negative = x.negative;
        }
        self.round_fields(negative, magnitude, exponent, 0, false, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::RadixArithmetic;
    use crate::types::{Decimal, DecimalHelper};

    fn math() -> RadixMath<DecimalHelper> {
        RadixMath::new(DecimalHelper::new())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_remainder_digits() {
        // 1/8 = 0.125
        assert_eq!(remainder_digits(&BigInt::from(1), &BigInt::from(8), 10), (1, true));
        // 1/2 = 0.5
        assert_eq!(remainder_digits(&BigInt::from(1), &BigInt::from(2), 10), (5, false));
        assert_eq!(remainder_digits(&BigInt::zero(), &BigInt::from(2), 10), (0, false));
    }

    #[test]
    fn test_strip_trailing_zeros() {
        let (m, e) = strip_trailing_zeros(BigInt::from(2500), BigInt::from(-4), &BigInt::zero(), 10);
        assert_eq!((m, e), (BigInt::from(25), BigInt::from(-2)));

        let (m, e) = strip_trailing_zeros(BigInt::from(2500), BigInt::from(-4), &BigInt::from(-3), 10);
        assert_eq!((m, e), (BigInt::from(250), BigInt::from(-3)));
    }

    #[test]
    fn test_divide_to_integer() {
        let ctx = PrecisionContext::for_precision(9);

        let natural = math().divide_to_integer_natural_scale(&dec("7"), &dec("2"), &ctx).unwrap();
        assert_eq!(natural.value.to_string(), "3");
        assert!(natural.signals.is_empty());

        // A positive ideal exponent keeps trailing zeros out of the mantissa
        let natural = math().divide_to_integer_natural_scale(&dec("6E+3"), &dec("2"), &ctx).unwrap();
        assert_eq!(natural.value.to_string(), "3E+3");
        let zero_scale = math().divide_to_integer_zero_scale(&dec("6E+3"), &dec("2"), &ctx).unwrap();
        assert_eq!(zero_scale.value.to_string(), "3000");

        let truncated = math().divide_to_integer_zero_scale(&dec("-7.5"), &dec("2"), &ctx).unwrap();
        assert_eq!(truncated.value.to_string(), "-3");

        let narrow = PrecisionContext::for_precision(3);
        let too_long = math()
            .divide_to_integer_natural_scale(&dec("1E+10"), &dec("3"), &narrow)
            .unwrap();
        assert!(too_long.value.is_nan());
        assert_eq!(too_long.signals, SignalSet::INVALID);
    }

    #[test]
    fn test_remainders() {
        let ctx = PrecisionContext::for_precision(9);
        let rem = |a: &str, b: &str| math().remainder(&dec(a), &dec(b), &ctx).unwrap().value.to_string();
        let near = |a: &str, b: &str| {
            math().remainder_near(&dec(a), &dec(b), &ctx).unwrap().value.to_string()
        };

        assert_eq!(rem("10", "3"), "1");
        assert_eq!(rem("-10", "3"), "-1");
        assert_eq!(rem("10", "6"), "4");
        assert_eq!(rem("2.5", "1"), "0.5");

        assert_eq!(near("10", "6"), "-2");
        // Ties go to the even quotient
        assert_eq!(near("10", "4"), "2");
        assert_eq!(near("14", "4"), "-2");

        let by_zero = math().remainder(&dec("1"), &dec("0"), &ctx).unwrap();
        assert!(by_zero.value.is_nan());
        assert_eq!(by_zero.signals, SignalSet::INVALID);
    }

    #[test]
    fn test_divide_to_exponent() {
        let ctx = PrecisionContext::for_precision(9);
        let hundredths = BigInt::from(-2);

        let third = math().divide_to_exponent(&dec("1"), &dec("3"), &hundredths, &ctx).unwrap();
        assert_eq!(third.value.to_string(), "0.33");
        assert_eq!(third.signals, SignalSet::INEXACT_ROUNDED);

        let two_thirds = math().divide_to_exponent(&dec("2"), &dec("3"), &hundredths, &ctx).unwrap();
        assert_eq!(two_thirds.value.to_string(), "0.67");

        let tie = math().divide_to_exponent(&dec("1"), &dec("4"), &BigInt::from(-1), &ctx).unwrap();
        assert_eq!(tie.value.to_string(), "0.2");

        let strict = ctx.clone().with_rounding(RoundingMode::Unnecessary);
        let err = math()
            .divide_to_exponent(&dec("1"), &dec("3"), &hundredths, &strict)
            .unwrap_err();
        assert_eq!(err.as_contract(), Some(&ContractError::RoundingNecessary));

        let narrow = PrecisionContext::for_precision(3);
        let too_long = math()
            .divide_to_exponent(&dec("1000"), &dec("1"), &BigInt::zero(), &narrow)
            .unwrap();
        assert!(too_long.value.is_nan());
    }
}
