// ============================================================================
// Decimal
// Arbitrary-precision radix-10 floating point
// ============================================================================

use crate::accumulator::DigitShiftAccumulator;
use crate::engine::{create_stack, RadixStack};
use crate::interfaces::{ArithmeticSupport, NoOpSignalObserver, RadixMathHelper};
use crate::numeric::{digit_count, radix_power, ConversionError, ParseNumberError, SpecialFlags};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

/// Decimal floating-point number: `(-1)^sign * magnitude * 10^exponent`,
/// or an infinity or NaN.
///
/// Equality is representational: `1.0` and `1.00` are different values.
/// Use [`Decimal::compare_to`] for numeric order.
///
/// # Example
/// ```
/// use radix_math::prelude::*;
///
/// let ctx = PrecisionContext::for_precision(4);
/// let a: Decimal = "2".parse().unwrap();
/// let root = a.square_root(Some(&ctx)).unwrap();
/// assert_eq!(root.value.to_string(), "1.414");
/// assert!(root.signals.contains(SignalSet::INEXACT));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    magnitude: BigInt,
    exponent: BigInt,
    flags: SpecialFlags,
}

static DECIMAL_MATH: LazyLock<RadixStack<DecimalHelper>> =
    LazyLock::new(|| create_stack(DecimalHelper::new(), Arc::new(NoOpSignalObserver)));

impl Decimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from a signed mantissa and an exponent
    pub fn new(mantissa: impl Into<BigInt>, exponent: impl Into<BigInt>) -> Self {
        let mantissa = mantissa.into();
        Self::from_parts(mantissa.is_negative(), mantissa.abs(), exponent.into())
    }

    /// Create from a sign, a magnitude and an exponent. Keeps negative zero.
    pub fn from_parts(negative: bool, magnitude: BigInt, exponent: BigInt) -> Self {
        Self {
            magnitude: magnitude.abs(),
            exponent,
            flags: SpecialFlags::finite(negative),
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn one() -> Self {
        Self::new(1, 0)
    }

    pub fn infinity(negative: bool) -> Self {
        Self {
            magnitude: BigInt::zero(),
            exponent: BigInt::zero(),
            flags: SpecialFlags::INFINITY | SpecialFlags::finite(negative),
        }
    }

    /// Quiet NaN without payload
    pub fn nan() -> Self {
        Self::nan_with_payload(false, BigInt::zero(), false)
    }

    /// Signaling NaN without payload
    pub fn signaling_nan() -> Self {
        Self::nan_with_payload(false, BigInt::zero(), true)
    }

    pub fn nan_with_payload(negative: bool, payload: BigInt, signaling: bool) -> Self {
        let kind = if signaling {
            SpecialFlags::SIGNALING_NAN
        } else {
            SpecialFlags::QUIET_NAN
        };
        Self {
            magnitude: payload.abs(),
            exponent: BigInt::zero(),
            flags: kind | SpecialFlags::finite(negative),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Signed mantissa (zero for infinities, the payload for NaNs)
    pub fn mantissa(&self) -> BigInt {
        if self.is_negative() {
            -&self.magnitude
        } else {
            self.magnitude.clone()
        }
    }

    /// Absolute mantissa
    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    pub fn exponent(&self) -> &BigInt {
        &self.exponent
    }

    pub fn flags(&self) -> SpecialFlags {
        self.flags
    }

    /// Exponent of the most significant digit
    pub fn adjusted_exponent(&self) -> BigInt {
        &self.exponent + BigInt::from(digit_count(&self.magnitude, 10)) - 1
    }

    pub fn is_negative(&self) -> bool {
        self.flags.contains(SpecialFlags::NEGATIVE)
    }

    pub fn is_finite(&self) -> bool {
        !self.flags.is_special()
    }

    pub fn is_infinite(&self) -> bool {
        self.flags.contains(SpecialFlags::INFINITY)
    }

    pub fn is_nan(&self) -> bool {
        self.flags.is_nan()
    }

    pub fn is_signaling_nan(&self) -> bool {
        self.flags.contains(SpecialFlags::SIGNALING_NAN)
    }

    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.magnitude.is_zero()
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    forward_arithmetic! {
        stack: DECIMAL_MATH;
        binary: [
            add, subtract, multiply, divide,
            divide_to_integer_natural_scale, divide_to_integer_zero_scale,
            remainder, remainder_near, quantize, next_toward, power,
            max, min, max_magnitude, min_magnitude, compare_to_with_context,
        ];
        unary: [
            round_to_precision, abs, negate, reduce, next_plus, next_minus,
            square_root, ln, log10, exp,
        ];
        to_exponent: [
            round_to_exponent_exact, round_to_exponent_simple,
            round_to_exponent_no_rounded_flag,
        ];
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

// ============================================================================
// Integer Conversions
// ============================================================================

macro_rules! decimal_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Decimal {
                fn from(value: $int) -> Self {
                    Self::new(value, 0)
                }
            }
        )*
    };
}

decimal_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

// ============================================================================
// Conversion to and from rust_decimal (for API boundaries)
// ============================================================================

impl From<rust_decimal::Decimal> for Decimal {
    fn from(d: rust_decimal::Decimal) -> Self {
        let mantissa = BigInt::from(d.mantissa());
        Self::from_parts(
            d.is_sign_negative(),
            mantissa,
            -BigInt::from(d.scale()),
        )
    }
}

impl TryFrom<&Decimal> for rust_decimal::Decimal {
    type Error = ConversionError;

    /// Exact conversion. Fails for non-finite values, for more than 28
    /// fractional digits and for mantissas wider than 96 bits.
    fn try_from(d: &Decimal) -> Result<Self, Self::Error> {
        if !d.is_finite() {
            return Err(ConversionError::NotFinite);
        }
        let (mut mantissa, scale) = if d.exponent.is_negative() {
            let scale = (-&d.exponent).to_u32().ok_or(ConversionError::OutOfRange)?;
            (d.magnitude.clone(), scale)
        } else {
            let power = d.exponent.to_u64().ok_or(ConversionError::OutOfRange)?;
            let factor = radix_power(10, power).map_err(|_| ConversionError::OutOfRange)?;
            (&d.magnitude * factor, 0)
        };
        if d.is_negative() {
            mantissa = -mantissa;
        }
        let mantissa = mantissa.to_i128().ok_or(ConversionError::OutOfRange)?;
        let mut result = rust_decimal::Decimal::try_from_i128_with_scale(mantissa, scale)
            .map_err(|_| ConversionError::OutOfRange)?;
        result.set_sign_negative(d.is_negative());
        Ok(result)
    }
}

impl TryFrom<Decimal> for rust_decimal::Decimal {
    type Error = ConversionError;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        rust_decimal::Decimal::try_from(&d)
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Decimal {
    /// Scientific string: plain notation while the exponent is not positive
    /// and the adjusted exponent is at least -6, `dE+n` form otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        if self.is_infinite() {
            return f.write_str("Infinity");
        }
        if self.is_nan() {
            f.write_str(if self.is_signaling_nan() { "sNaN" } else { "NaN" })?;
            if !self.magnitude.is_zero() {
                write!(f, "{}", self.magnitude)?;
            }
            return Ok(());
        }

        let digits = self.magnitude.to_string();
        let adjusted = self.adjusted_exponent();
        if !self.exponent.is_positive() && adjusted >= BigInt::from(-6) {
            let fraction_len = (-&self.exponent).to_usize().unwrap_or(0);
            if fraction_len == 0 {
                return f.write_str(&digits);
            }
            if digits.len() > fraction_len {
                let (integer, fraction) = digits.split_at(digits.len() - fraction_len);
                return write!(f, "{integer}.{fraction}");
            }
            let zeros = "0".repeat(fraction_len - digits.len());
            return write!(f, "0.{zeros}{digits}");
        }

        let (lead, rest) = digits.split_at(1);
        f.write_str(lead)?;
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        if adjusted.is_negative() {
            write!(f, "E{adjusted}")
        } else {
            write!(f, "E+{adjusted}")
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

fn parse_digits(digits: &str) -> Result<BigInt, ParseNumberError> {
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ParseNumberError::InvalidCharacter(bad));
    }
    BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(ParseNumberError::MissingDigits)
}

impl FromStr for Decimal {
    type Err = ParseNumberError;

    /// Parse a numeric string.
    ///
    /// # Examples
    /// - "123" -> 123E+0
    /// - "-1.50" -> -150E-2
    /// - "1e3" -> 1E+3
    /// - "Infinity", "-inf", "NaN", "sNaN42"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseNumberError::Empty);
        }

        let (negative, body) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        if body.is_empty() {
            return Err(ParseNumberError::MissingDigits);
        }

        // Special values
        let lower = body.to_ascii_lowercase();
        if lower == "inf" || lower == "infinity" {
            return Ok(Self::infinity(negative));
        }
        for (prefix, signaling) in [("snan", true), ("nan", false)] {
            if let Some(payload) = lower.strip_prefix(prefix) {
                let payload = if payload.is_empty() {
                    BigInt::zero()
                } else {
                    parse_digits(payload)?
                };
                return Ok(Self::nan_with_payload(negative, payload, signaling));
            }
        }

        // Coefficient and optional exponent
        let (coefficient, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let (integer, fraction) = match coefficient.find('.') {
            Some(pos) => (&coefficient[..pos], &coefficient[pos + 1..]),
            None => (coefficient, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return Err(ParseNumberError::MissingDigits);
        }
        let magnitude = parse_digits(&format!("{integer}{fraction}"))?;

        let mut exponent = match exponent {
            None => BigInt::zero(),
            Some(text) => {
                let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseNumberError::InvalidExponent);
                }
                let value = BigInt::parse_bytes(digits.as_bytes(), 10)
                    .ok_or(ParseNumberError::InvalidExponent)?;
                if text.starts_with('-') {
                    -value
                } else {
                    value
                }
            }
        };
        exponent -= BigInt::from(fraction.len());

        Ok(Self::from_parts(negative, magnitude, exponent))
    }
}

// ============================================================================
// Radix Math Helper
// ============================================================================

/// Connects [`Decimal`] to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalHelper {
    support: ArithmeticSupport,
}

impl DecimalHelper {
    /// Helper supporting infinities and NaNs
    pub fn new() -> Self {
        Self {
            support: ArithmeticSupport::FiniteAndNonFinite,
        }
    }

    /// Helper that rejects infinite and NaN results
    pub fn finite_only() -> Self {
        Self {
            support: ArithmeticSupport::FiniteOnly,
        }
    }
}

impl Default for DecimalHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixMathHelper for DecimalHelper {
    type Value = Decimal;
    type Accumulator = DigitShiftAccumulator;

    fn radix(&self) -> u32 {
        10
    }

    fn arithmetic_support(&self) -> ArithmeticSupport {
        self.support
    }

    fn sign(&self, value: &Decimal) -> i32 {
        if value.is_zero() {
            0
        } else if value.is_negative() {
            -1
        } else {
            1
        }
    }

    fn mantissa(&self, value: &Decimal) -> BigInt {
        value.magnitude.clone()
    }

    fn exponent(&self, value: &Decimal) -> BigInt {
        value.exponent.clone()
    }

    fn flags(&self, value: &Decimal) -> SpecialFlags {
        value.flags
    }

    fn create_new(&self, mantissa: BigInt, exponent: BigInt) -> Decimal {
        Decimal::new(mantissa, exponent)
    }

    fn create_new_with_flags(&self, magnitude: BigInt, exponent: BigInt, flags: SpecialFlags) -> Decimal {
        Decimal {
            magnitude: magnitude.abs(),
            exponent,
            flags,
        }
    }

    fn create_shift_accumulator(&self, magnitude: BigInt) -> DigitShiftAccumulator {
        DigitShiftAccumulator::new(10, magnitude)
    }

    fn create_shift_accumulator_with_discarded(
        &self,
        magnitude: BigInt,
        last: u32,
        older: bool,
    ) -> DigitShiftAccumulator {
        DigitShiftAccumulator::with_discarded(10, magnitude, last, older)
    }

    /// Terminates when the reduced denominator has no prime factors but 2 and 5.
    fn has_terminating_radix_expansion(&self, numerator: &BigInt, denominator: &BigInt) -> bool {
        if numerator.is_zero() {
            return true;
        }
        let mut rest = (denominator / numerator.gcd(denominator)).abs();
        for factor in [2u32, 5] {
            let factor = BigInt::from(factor);
            while !rest.is_zero() && rest.is_multiple_of(&factor) {
                rest /= &factor;
            }
        }
        rest.is_one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PrecisionContext, RoundingMode, SignalSet};
    use std::cmp::Ordering;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        let x = dec("-1.50");
        assert!(x.is_negative());
        assert_eq!(x.magnitude(), &BigInt::from(150));
        assert_eq!(x.exponent(), &BigInt::from(-2));

        let y = dec("1.2e+3");
        assert_eq!(y.mantissa(), BigInt::from(12));
        assert_eq!(y.exponent(), &BigInt::from(2));

        assert_eq!(dec(".5").exponent(), &BigInt::from(-1));
        assert_eq!(dec("5.").exponent(), &BigInt::zero());
        assert!(dec("-Infinity").is_infinite());
        assert!(dec("sNaN12").is_signaling_nan());
        assert_eq!(dec("NaN12").magnitude(), &BigInt::from(12));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!("".parse::<Decimal>(), Err(ParseNumberError::Empty));
        assert_eq!("-".parse::<Decimal>(), Err(ParseNumberError::MissingDigits));
        assert_eq!(".".parse::<Decimal>(), Err(ParseNumberError::MissingDigits));
        assert_eq!("1x".parse::<Decimal>(), Err(ParseNumberError::InvalidCharacter('x')));
        assert_eq!("1e".parse::<Decimal>(), Err(ParseNumberError::InvalidExponent));
        assert_eq!("1e+_1".parse::<Decimal>(), Err(ParseNumberError::InvalidExponent));
        assert_eq!("1.2.3".parse::<Decimal>(), Err(ParseNumberError::InvalidCharacter('.')));
    }

    #[test]
    fn test_display() {
        let cases = [
            ("123", "123"),
            ("-123", "-123"),
            ("1.23E+3", "1.23E+3"),
            ("123E+3", "1.23E+5"),
            ("12.3E-9", "1.23E-8"),
            ("-123E-10", "-1.23E-8"),
            ("-123E-12", "-1.23E-10"),
            ("0.00", "0.00"),
            ("0.000001", "0.000001"),
            ("0.0000001", "1E-7"),
            ("-0", "-0"),
            ("0E+2", "0E+2"),
            ("5E-6", "0.000005"),
            ("-inf", "-Infinity"),
            ("NaN", "NaN"),
            ("sNaN7", "sNaN7"),
        ];
        for (input, expected) in cases {
            assert_eq!(dec(input).to_string(), expected, "input {input}");
        }
    }

    #[test]
    fn test_rust_decimal_conversion() {
        let d = rust_decimal::Decimal::new(-12345, 3);
        let x = Decimal::from(d);
        assert_eq!(x.to_string(), "-12.345");
        assert_eq!(rust_decimal::Decimal::try_from(&x), Ok(d));

        let big = dec("1E+2");
        assert_eq!(
            rust_decimal::Decimal::try_from(&big).map(|d| d.to_string()),
            Ok("100".to_string())
        );

        assert_eq!(
            rust_decimal::Decimal::try_from(&Decimal::nan()),
            Err(ConversionError::NotFinite)
        );
        assert_eq!(
            rust_decimal::Decimal::try_from(&dec("1E-40")),
            Err(ConversionError::OutOfRange)
        );
    }

    #[test]
    fn test_terminating_expansion() {
        let h = DecimalHelper::new();
        assert!(h.has_terminating_radix_expansion(&BigInt::from(1), &BigInt::from(8)));
        assert!(h.has_terminating_radix_expansion(&BigInt::from(3), &BigInt::from(6)));
        assert!(!h.has_terminating_radix_expansion(&BigInt::from(1), &BigInt::from(3)));
        assert!(h.has_terminating_radix_expansion(&BigInt::zero(), &BigInt::from(7)));
    }

    #[test]
    fn test_forwarded_arithmetic() {
        let ctx = PrecisionContext::for_precision(9);
        let sum = dec("1.1").add(&dec("2.2"), Some(&ctx)).unwrap();
        assert_eq!(sum.value.to_string(), "3.3");
        assert!(sum.signals.is_empty());

        let exact = dec("1").divide(&dec("8"), None).unwrap();
        assert_eq!(exact.value.to_string(), "0.125");

        let err = dec("1").divide(&dec("3"), None).unwrap_err();
        assert!(err.as_contract().is_some());

        let quantized = dec("2.17")
            .quantize(&dec("0.001"), Some(&ctx))
            .unwrap();
        assert_eq!(quantized.value.to_string(), "2.170");

        let rounded = dec("2.5")
            .round_to_exponent_simple(0, Some(&ctx.with_rounding(RoundingMode::HalfEven)))
            .unwrap();
        assert_eq!(rounded.value.to_string(), "2");
        assert!(rounded.signals.contains(SignalSet::INEXACT));
    }

    #[test]
    fn test_compare_to() {
        assert_eq!(dec("1.0").compare_to(&dec("1.00")), Ordering::Equal);
        assert_eq!(dec("-0").compare_to(&dec("0")), Ordering::Equal);
        assert_eq!(dec("NaN").compare_to(&dec("Infinity")), Ordering::Greater);
        assert_eq!(dec("-2").compare_to(&dec("1")), Ordering::Less);
        assert_ne!(dec("1.0"), dec("1.00"));
    }

    #[test]
    fn test_finite_only_helper() {
        let h = DecimalHelper::finite_only();
        assert!(h.create_infinity(false).is_err());
        assert!(DecimalHelper::new().create_quiet_nan(true, BigInt::one()).is_ok());
    }
}
