// ============================================================================
// Rounding
// Fits an unrounded (sign, magnitude, exponent) triple into a context
// ============================================================================
//
// Every arithmetic path ends here. The triple may carry discard state from
// an earlier shift (`last`, `older`), so inexact quotients and square roots
// round correctly without a second pass.

use super::radix_math::RadixMath;
use crate::accumulator::ShiftAccumulator;
use crate::context::{PrecisionContext, RoundingMode, SignalSet};
use crate::interfaces::RadixMathHelper;
use crate::numeric::{digit_count, radix_power, ContractError, MathResult, Outcome};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

/// Decides whether the retained mantissa moves one unit away from zero.
pub(crate) fn should_increment<A: ShiftAccumulator>(
    acc: &A,
    mode: RoundingMode,
    negative: bool,
    radix: u32,
) -> bool {
    let last = acc.last_discarded_digit();
    let older = acc.older_discarded_digits();
    if last == 0 && !older {
        return false;
    }
    let half = radix / 2;
    match mode {
        RoundingMode::HalfUp => last >= half,
        RoundingMode::HalfEven => {
            last > half || (last == half && (older || acc.shifted_magnitude().is_odd()))
        }
        RoundingMode::HalfDown => last > half || (last == half && older),
        RoundingMode::Ceiling => !negative,
        RoundingMode::Floor => negative,
        RoundingMode::Up => true,
        RoundingMode::ZeroFiveUp => {
            if radix == 2 {
                return true;
            }
            let retained = acc.shifted_magnitude().mod_floor(&BigInt::from(radix));
            let retained = retained.to_u32().unwrap_or(1);
            retained == 0 || retained == half
        }
        RoundingMode::Down | RoundingMode::Unnecessary => false,
    }
}

/// Adjusted exponent: exponent of the most significant digit.
pub(crate) fn adjusted_exponent(magnitude: &BigInt, exponent: &BigInt, radix: u32) -> BigInt {
    exponent + BigInt::from(digit_count(magnitude, radix)) - BigInt::one()
}

impl<H: RadixMathHelper> RadixMath<H> {
    /// Rounds a finite triple to `ctx`, applying overflow, subnormal and
    /// clamping rules.
    pub(crate) fn round_fields(
        &self,
        negative: bool,
        magnitude: BigInt,
        exponent: BigInt,
        last: u32,
        older: bool,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        if magnitude.is_zero() && last == 0 && !older {
            return self.round_zero(negative, exponent, ctx);
        }
        let radix = self.radix();
        let precision = ctx.precision;

        if ctx.has_exponent_range {
            let adjusted = adjusted_exponent(&magnitude, &exponent, radix);
            if adjusted > ctx.e_max {
                return self.overflow(negative, ctx, SignalSet::empty());
            }
            if adjusted < ctx.e_min {
                return self.round_subnormal(negative, magnitude, exponent, last, older, ctx);
            }
        }

        let mut acc = self
            .helper()
            .create_shift_accumulator_with_discarded(magnitude, last, older);
        if precision > 0 {
            acc.shift_to_digits(precision);
        }
        let mut signals = SignalSet::empty();
        let shifted = !acc.discarded_digit_count().is_zero();
        if shifted {
            signals |= SignalSet::ROUNDED;
        }
        if acc.is_inexact() {
            if ctx.rounding == RoundingMode::Unnecessary {
                return Err(ContractError::RoundingNecessary.into());
            }
            signals |= SignalSet::INEXACT_ROUNDED;
        }

        let increment = should_increment(&acc, ctx.rounding, negative, radix);
        let mut exponent = exponent + acc.discarded_digit_count();
        let mut mantissa = acc.shifted_magnitude().clone();
        if increment {
            mantissa += 1u32;
            if precision > 0 && digit_count(&mantissa, radix) > precision {
                mantissa /= radix;
                exponent += 1;
            }
            if ctx.has_exponent_range && adjusted_exponent(&mantissa, &exponent, radix) > ctx.e_max {
                return self.overflow(negative, ctx, signals);
            }
        }

        if ctx.has_exponent_range && ctx.clamp_normal_exponents && precision > 0 {
            let ceiling = ctx.exponent_ceiling();
            if exponent > ceiling {
                let raise = &exponent - &ceiling;
                mantissa = self.helper().multiply_by_radix_power(&mantissa, &raise)?;
                exponent = ceiling;
                signals |= SignalSet::CLAMPED;
            }
        }

        Ok(Outcome::new(
            self.helper().create_finite(negative, mantissa, exponent),
            signals,
        ))
    }

    /// Places a zero inside the exponent range.
    pub(crate) fn round_zero(
        &self,
        negative: bool,
        exponent: BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        let mut signals = SignalSet::empty();
        let mut exponent = exponent;
        if ctx.has_exponent_range {
            let ceiling = ctx.exponent_ceiling();
            let floor = ctx.e_tiny();
            if exponent > ceiling {
                exponent = ceiling;
                signals |= SignalSet::CLAMPED;
            } else if exponent < floor {
                exponent = floor;
                signals |= SignalSet::CLAMPED;
            }
        }
        Ok(Outcome::new(
            self.helper().create_finite(negative, BigInt::zero(), exponent),
            signals,
        ))
    }

    /// Rounds a value whose adjusted exponent is below `e_min`.
    fn round_subnormal(
        &self,
        negative: bool,
        magnitude: BigInt,
        exponent: BigInt,
        last: u32,
        older: bool,
        ctx: &PrecisionContext,
    ) -> MathResult<H::Value> {
        let radix = self.radix();
        let e_tiny = ctx.e_tiny();
        let mut acc = self
            .helper()
            .create_shift_accumulator_with_discarded(magnitude, last, older);
        let mut exponent = exponent;
        if exponent < e_tiny {
            acc.shift_right(&(&e_tiny - &exponent));
            exponent = e_tiny;
        }

        let mut signals = SignalSet::SUBNORMAL;
        if !acc.discarded_digit_count().is_zero() {
            signals |= SignalSet::ROUNDED;
        }
        let inexact = acc.is_inexact();
        if inexact {
            if ctx.rounding == RoundingMode::Unnecessary {
                return Err(ContractError::RoundingNecessary.into());
            }
            signals |= SignalSet::INEXACT_ROUNDED | SignalSet::UNDERFLOW;
        }

        let mut mantissa = acc.shifted_magnitude().clone();
        if should_increment(&acc, ctx.rounding, negative, radix) {
            mantissa += 1u32;
        }
        if mantissa.is_zero() && inexact {
            signals |= SignalSet::CLAMPED;
        }
        tracing::trace!(%exponent, signals = %signals, "subnormal result");
        Ok(Outcome::new(
            self.helper().create_finite(negative, mantissa, exponent),
            signals,
        ))
    }

    /// Result of a value too large for the exponent range.
    pub(crate) fn overflow(
        &self,
        negative: bool,
        ctx: &PrecisionContext,
        signals: SignalSet,
    ) -> MathResult<H::Value> {
        if ctx.rounding == RoundingMode::Unnecessary {
            return Err(ContractError::RoundingNecessary.into());
        }
        let signals = signals | SignalSet::OVERFLOW | SignalSet::INEXACT_ROUNDED;
        tracing::debug!(negative, rounding = ?ctx.rounding, "overflow");
        if ctx.rounding.overflows_to_largest_finite(negative) && ctx.precision > 0 {
            let largest = radix_power(self.radix(), ctx.precision)? - BigInt::one();
            let exponent = &ctx.e_max + BigInt::one() - BigInt::from(ctx.precision);
            return Ok(Outcome::new(
                self.helper().create_finite(negative, largest, exponent),
                signals,
            ));
        }
        Ok(Outcome::new(self.helper().create_infinity(negative)?, signals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::DigitShiftAccumulator;
    use crate::interfaces::RadixArithmetic;
    use crate::types::{Decimal, DecimalHelper};

    fn math() -> RadixMath<DecimalHelper> {
        RadixMath::new(DecimalHelper::new())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn acc(kept: i64, last: u32, older: bool) -> DigitShiftAccumulator {
        DigitShiftAccumulator::with_discarded(10, BigInt::from(kept), last, older)
    }

    #[test]
    fn test_half_modes() {
        assert!(should_increment(&acc(2, 5, false), RoundingMode::HalfUp, false, 10));
        assert!(!should_increment(&acc(2, 5, false), RoundingMode::HalfEven, false, 10));
        assert!(should_increment(&acc(3, 5, false), RoundingMode::HalfEven, false, 10));
        assert!(should_increment(&acc(2, 5, true), RoundingMode::HalfEven, false, 10));
        assert!(!should_increment(&acc(2, 5, false), RoundingMode::HalfDown, false, 10));
        assert!(should_increment(&acc(2, 6, false), RoundingMode::HalfDown, false, 10));
        assert!(!should_increment(&acc(2, 4, true), RoundingMode::HalfUp, false, 10));
    }

    #[test]
    fn test_directed_modes() {
        let a = acc(2, 0, true);
        assert!(should_increment(&a, RoundingMode::Ceiling, false, 10));
        assert!(!should_increment(&a, RoundingMode::Ceiling, true, 10));
        assert!(should_increment(&a, RoundingMode::Floor, true, 10));
        assert!(should_increment(&a, RoundingMode::Up, true, 10));
        assert!(!should_increment(&a, RoundingMode::Down, false, 10));
        assert!(!should_increment(&acc(2, 0, false), RoundingMode::Up, false, 10));
    }

    #[test]
    fn test_zero_five_up() {
        assert!(should_increment(&acc(20, 1, false), RoundingMode::ZeroFiveUp, false, 10));
        assert!(should_increment(&acc(25, 1, false), RoundingMode::ZeroFiveUp, false, 10));
        assert!(!should_increment(&acc(21, 9, true), RoundingMode::ZeroFiveUp, false, 10));
    }

    #[test]
    fn test_adjusted_exponent() {
        assert_eq!(
            adjusted_exponent(&BigInt::from(12345), &BigInt::from(-2), 10),
            BigInt::from(2)
        );
    }

    #[test]
    fn test_clamp_normal_exponents() {
        let ctx = PrecisionContext::for_precision(3)
            .with_exponent_range(-5, 5)
            .with_clamp_normal_exponents(true);
        let clamped = math().round_to_precision(&dec("1E+5"), &ctx).unwrap();
        assert_eq!(clamped.value.to_string(), "1.00E+5");
        assert_eq!(clamped.signals, SignalSet::CLAMPED);

        let unclamped = ctx.clone().with_clamp_normal_exponents(false);
        let kept = math().round_to_precision(&dec("1E+5"), &unclamped).unwrap();
        assert_eq!(kept.value.to_string(), "1E+5");
        assert!(kept.signals.is_empty());
    }

    #[test]
    fn test_rounding_unnecessary() {
        let ctx = PrecisionContext::for_precision(2)
            .with_rounding(RoundingMode::Unnecessary)
            .with_exponent_range(-9, 9);

        // Dropping zeros is allowed
        let exact = math().round_to_precision(&dec("1.20"), &ctx).unwrap();
        assert_eq!(exact.value.to_string(), "1.2");
        assert_eq!(exact.signals, SignalSet::ROUNDED);

        for input in ["1.25", "1E+10", "1.5E-10"] {
            let err = math().round_to_precision(&dec(input), &ctx).unwrap_err();
            assert_eq!(err.as_contract(), Some(&ContractError::RoundingNecessary), "{input}");
        }
    }
}
