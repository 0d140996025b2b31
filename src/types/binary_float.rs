// ============================================================================
// Binary Float
// Arbitrary-precision radix-2 floating point
// ============================================================================

use super::Decimal;
use crate::accumulator::BitShiftAccumulator;
use crate::context::{resolve_context, PrecisionContext};
use crate::engine::{create_stack, RadixStack};
use crate::interfaces::{ArithmeticSupport, NoOpSignalObserver, RadixArithmetic, RadixMathHelper};
use crate::numeric::{radix_power, MathResult, Outcome, SpecialFlags};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Binary floating-point number: `(-1)^sign * magnitude * 2^exponent`,
/// or an infinity or NaN.
///
/// # Example
/// ```
/// use radix_math::prelude::*;
///
/// let tenth = BinaryFloat::from_f64(0.1);
/// let sum = tenth.add(&tenth, Some(&PrecisionContext::binary64())).unwrap();
/// assert_eq!(sum.value.to_f64(), 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryFloat {
    magnitude: BigInt,
    exponent: BigInt,
    flags: SpecialFlags,
}

static BINARY_MATH: LazyLock<RadixStack<BinaryFloatHelper>> =
    LazyLock::new(|| create_stack(BinaryFloatHelper::new(), Arc::new(NoOpSignalObserver)));

// ============================================================================
// IEEE 754 binary64 Layout
// ============================================================================

const F64_FRACTION_BITS: u32 = 52;
const F64_EXPONENT_BIAS: i64 = 1075;
const F64_MIN_EXPONENT: i64 = -1074;

/// `2^k` for `k` in the normal binary64 range.
fn pow2(k: i64) -> f64 {
    f64::from_bits(((k + 1023) as u64) << F64_FRACTION_BITS)
}

impl BinaryFloat {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from a signed mantissa and a binary exponent
    pub fn new(mantissa: impl Into<BigInt>, exponent: impl Into<BigInt>) -> Self {
        let mantissa = mantissa.into();
        Self::from_parts(mantissa.is_negative(), mantissa.abs(), exponent.into())
    }

    pub fn from_parts(negative: bool, magnitude: BigInt, exponent: BigInt) -> Self {
        Self {
            magnitude: magnitude.abs(),
            exponent,
            flags: SpecialFlags::finite(negative),
        }
    }

    pub fn infinity(negative: bool) -> Self {
        Self {
            magnitude: BigInt::zero(),
            exponent: BigInt::zero(),
            flags: SpecialFlags::INFINITY | SpecialFlags::finite(negative),
        }
    }

    pub fn nan() -> Self {
        Self {
            magnitude: BigInt::zero(),
            exponent: BigInt::zero(),
            flags: SpecialFlags::QUIET_NAN,
        }
    }

    /// The exact value of `value`. NaN payloads are not carried over.
    pub fn from_f64(value: f64) -> Self {
        let negative = value.is_sign_negative();
        if value.is_nan() {
            return Self::nan();
        }
        if value.is_infinite() {
            return Self::infinity(negative);
        }

        let bits = value.to_bits();
        let biased = ((bits >> F64_FRACTION_BITS) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << F64_FRACTION_BITS) - 1);
        let (mantissa, exponent) = if biased == 0 {
            (fraction, F64_MIN_EXPONENT)
        } else {
            (fraction | (1u64 << F64_FRACTION_BITS), biased - F64_EXPONENT_BIAS)
        };
        if mantissa == 0 {
            return Self::from_parts(negative, BigInt::zero(), BigInt::zero());
        }
        let shift = mantissa.trailing_zeros();
        Self::from_parts(
            negative,
            BigInt::from(mantissa >> shift),
            BigInt::from(exponent + i64::from(shift)),
        )
    }

    /// The exact value of `value`
    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// Rounds a decimal value to binary under `ctx`.
    ///
    /// Without a precision the conversion must be exact, so fractions like
    /// 0.1 fail with a non-terminating expansion.
    pub fn from_decimal(value: &Decimal, ctx: Option<&PrecisionContext>) -> MathResult<Self> {
        let ctx = resolve_context(ctx);
        if value.is_infinite() {
            return Ok(Outcome::exact(Self::infinity(value.is_negative())));
        }
        if value.is_nan() {
            let nan = Self {
                magnitude: value.magnitude().clone(),
                exponent: BigInt::zero(),
                flags: value.flags(),
            };
            return BINARY_MATH.round_to_precision(&nan, ctx);
        }

        let exponent = value.exponent();
        let numerator = Self::from_parts(value.is_negative(), value.magnitude().clone(), BigInt::zero());
        if !exponent.is_negative() {
            let power = exponent.to_u64().unwrap_or(u64::MAX);
            let scaled = Self::from_parts(
                value.is_negative(),
                value.magnitude() * radix_power(10, power)?,
                BigInt::zero(),
            );
            return BINARY_MATH.round_to_precision(&scaled, ctx);
        }
        let power = (-exponent).to_u64().unwrap_or(u64::MAX);
        let denominator = Self::from_parts(false, radix_power(10, power)?, BigInt::zero());
        BINARY_MATH.divide(&numerator, &denominator, ctx)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn mantissa(&self) -> BigInt {
        if self.is_negative() {
            -&self.magnitude
        } else {
            self.magnitude.clone()
        }
    }

    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    pub fn exponent(&self) -> &BigInt {
        &self.exponent
    }

    pub fn flags(&self) -> SpecialFlags {
        self.flags
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

    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.magnitude.is_zero()
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Nearest binary64 value, ties to even.
    pub fn to_f64(&self) -> f64 {
        let sign = if self.is_negative() { -1.0 } else { 1.0 };
        if self.is_nan() {
            return f64::NAN;
        }
        // binary64 traps nothing, so only the value matters
        let rounded = match BINARY_MATH.round_to_precision(self, &PrecisionContext::binary64()) {
            Ok(outcome) => outcome.value,
            Err(err) => {
                tracing::debug!(error = %err, "binary64 rounding failed");
                return f64::NAN;
            }
        };
        if rounded.is_infinite() {
            return sign * f64::INFINITY;
        }
        if rounded.is_zero() {
            return sign * 0.0;
        }
        // At most 53 bits, so the conversion is exact
        let mantissa = rounded.magnitude.to_f64().unwrap_or(f64::NAN);
        let exponent = rounded.exponent.to_i64().unwrap_or(0);
        let magnitude = if exponent < -1000 {
            mantissa * pow2(exponent + 64) * pow2(-64)
        } else {
            mantissa * pow2(exponent)
        };
        sign * magnitude
    }

    /// The exact decimal value: `m * 2^-k == m * 5^k * 10^-k`.
    pub fn to_decimal(&self) -> Decimal {
        let negative = self.is_negative();
        if self.is_infinite() {
            return Decimal::infinity(negative);
        }
        if self.is_nan() {
            return Decimal::nan_with_payload(
                negative,
                self.magnitude.clone(),
                self.flags.contains(SpecialFlags::SIGNALING_NAN),
            );
        }
        if !self.exponent.is_negative() {
            let shift = self.exponent.to_usize().unwrap_or(usize::MAX);
            return Decimal::from_parts(negative, &self.magnitude << shift, BigInt::zero());
        }
        let k = (-&self.exponent).to_u32().unwrap_or(u32::MAX);
        let fives = num_traits::Pow::pow(BigInt::from(5u32), k);
        Decimal::from_parts(negative, &self.magnitude * fives, self.exponent.clone())
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    forward_arithmetic! {
        stack: BINARY_MATH;
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

impl From<f64> for BinaryFloat {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<i64> for BinaryFloat {
    fn from(value: i64) -> Self {
        Self::new(value, 0)
    }
}

impl fmt::Display for BinaryFloat {
    /// Displays the exact decimal value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_decimal(), f)
    }
}

// ============================================================================
// Radix Math Helper
// ============================================================================

/// Connects [`BinaryFloat`] to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryFloatHelper {
    support: ArithmeticSupport,
}

impl BinaryFloatHelper {
    pub fn new() -> Self {
        Self {
            support: ArithmeticSupport::FiniteAndNonFinite,
        }
    }

    pub fn finite_only() -> Self {
        Self {
            support: ArithmeticSupport::FiniteOnly,
        }
    }
}

impl Default for BinaryFloatHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixMathHelper for BinaryFloatHelper {
    type Value = BinaryFloat;
    type Accumulator = BitShiftAccumulator;

    fn radix(&self) -> u32 {
        2
    }

    fn arithmetic_support(&self) -> ArithmeticSupport {
        self.support
    }

    fn sign(&self, value: &BinaryFloat) -> i32 {
        if value.is_zero() {
            0
        } else if value.is_negative() {
            -1
        } else {
            1
        }
    }

    fn mantissa(&self, value: &BinaryFloat) -> BigInt {
        value.magnitude.clone()
    }

    fn exponent(&self, value: &BinaryFloat) -> BigInt {
        value.exponent.clone()
    }

    fn flags(&self, value: &BinaryFloat) -> SpecialFlags {
        value.flags
    }

    fn create_new(&self, mantissa: BigInt, exponent: BigInt) -> BinaryFloat {
        BinaryFloat::new(mantissa, exponent)
    }

    fn create_new_with_flags(&self, magnitude: BigInt, exponent: BigInt, flags: SpecialFlags) -> BinaryFloat {
        BinaryFloat {
            magnitude: magnitude.abs(),
            exponent,
            flags,
        }
    }

    fn create_shift_accumulator(&self, magnitude: BigInt) -> BitShiftAccumulator {
        BitShiftAccumulator::new(magnitude)
    }

    fn create_shift_accumulator_with_discarded(
        &self,
        magnitude: BigInt,
        last: u32,
        older: bool,
    ) -> BitShiftAccumulator {
        BitShiftAccumulator::with_discarded(magnitude, last, older)
    }

    /// Terminates when the reduced denominator is a power of two.
    fn has_terminating_radix_expansion(&self, numerator: &BigInt, denominator: &BigInt) -> bool {
        if numerator.is_zero() {
            return true;
        }
        let rest = (denominator / numerator.gcd(denominator)).abs();
        match rest.trailing_zeros() {
            Some(zeros) => (rest >> zeros) == BigInt::from(1),
            None => false,
        }
    }
}
