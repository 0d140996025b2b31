// ============================================================================
// Radix Math Helper Interface
// The seam between the radix-independent engine and a concrete number type
// ============================================================================

use crate::accumulator::ShiftAccumulator;
use crate::numeric::{multiply_by_radix_power, ContractError, SpecialFlags};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which kinds of values a number type can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArithmeticSupport {
    /// Finite values only; producing NaN or infinity is an error
    FiniteOnly,
    /// Finite values, infinities and NaNs
    FiniteAndNonFinite,
}

/// Everything the engine needs to know about a concrete number type.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait RadixMathHelper: Send + Sync {
    /// The number type operated on
    type Value: Clone + Debug;

    /// Accumulator used to discard digits of this radix
    type Accumulator: ShiftAccumulator;

    /// Radix of the number type (at least 2)
    fn radix(&self) -> u32;

    fn arithmetic_support(&self) -> ArithmeticSupport;

    /// -1, 0 or 1. Zero for finite zeros; infinities and NaNs report their sign bit.
    fn sign(&self, value: &Self::Value) -> i32;

    /// Absolute mantissa (NaN payload for NaNs)
    fn mantissa(&self, value: &Self::Value) -> BigInt;

    fn exponent(&self, value: &Self::Value) -> BigInt;

    fn flags(&self, value: &Self::Value) -> SpecialFlags;

    /// A finite value from a signed mantissa.
    fn create_new(&self, mantissa: BigInt, exponent: BigInt) -> Self::Value;

    /// A value from a magnitude and explicit flags.
    fn create_new_with_flags(
        &self,
        magnitude: BigInt,
        exponent: BigInt,
        flags: SpecialFlags,
    ) -> Self::Value;

    fn create_shift_accumulator(&self, magnitude: BigInt) -> Self::Accumulator;

    /// An accumulator seeded with discard state below `magnitude`.
    fn create_shift_accumulator_with_discarded(
        &self,
        magnitude: BigInt,
        last: u32,
        older: bool,
    ) -> Self::Accumulator;

    /// True if `numerator / denominator` has a finite expansion in this radix.
    fn has_terminating_radix_expansion(&self, numerator: &BigInt, denominator: &BigInt) -> bool;

    /// `magnitude * radix^power` for non-negative `power`.
    fn multiply_by_radix_power(
        &self,
        magnitude: &BigInt,
        power: &BigInt,
    ) -> Result<BigInt, ContractError> {
        multiply_by_radix_power(magnitude, self.radix(), power)
    }

    /// A small integer with exponent zero.
    fn value_of(&self, small: i64) -> Self::Value {
        self.create_new(BigInt::from(small), BigInt::zero())
    }

    // ========================================================================
    // Classification
    // ========================================================================

    fn is_nan(&self, value: &Self::Value) -> bool {
        self.flags(value).is_nan()
    }

    fn is_signaling_nan(&self, value: &Self::Value) -> bool {
        self.flags(value).contains(SpecialFlags::SIGNALING_NAN)
    }

    fn is_quiet_nan(&self, value: &Self::Value) -> bool {
        self.flags(value).contains(SpecialFlags::QUIET_NAN)
    }

    fn is_infinite(&self, value: &Self::Value) -> bool {
        self.flags(value).contains(SpecialFlags::INFINITY)
    }

    fn is_finite(&self, value: &Self::Value) -> bool {
        !self.flags(value).is_special()
    }

    fn is_negative(&self, value: &Self::Value) -> bool {
        self.flags(value).contains(SpecialFlags::NEGATIVE)
    }

    fn is_zero(&self, value: &Self::Value) -> bool {
        self.is_finite(value) && self.mantissa(value).is_zero()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn create_finite(&self, negative: bool, magnitude: BigInt, exponent: BigInt) -> Self::Value {
        self.create_new_with_flags(magnitude.abs(), exponent, SpecialFlags::finite(negative))
    }

    fn create_infinity(&self, negative: bool) -> Result<Self::Value, ContractError> {
        if self.arithmetic_support() == ArithmeticSupport::FiniteOnly {
            return Err(ContractError::NonFiniteResult);
        }
        let flags = SpecialFlags::INFINITY | SpecialFlags::finite(negative);
        Ok(self.create_new_with_flags(BigInt::zero(), BigInt::zero(), flags))
    }

    fn create_quiet_nan(&self, negative: bool, payload: BigInt) -> Result<Self::Value, ContractError> {
        if self.arithmetic_support() == ArithmeticSupport::FiniteOnly {
            return Err(ContractError::NonFiniteResult);
        }
        let flags = SpecialFlags::QUIET_NAN | SpecialFlags::finite(negative);
        Ok(self.create_new_with_flags(payload.abs(), BigInt::zero(), flags))
    }

    /// The same value with its sign bit flipped (NaNs included).
    fn negated(&self, value: &Self::Value) -> Self::Value {
        let flags = self.flags(value) ^ SpecialFlags::NEGATIVE;
        self.create_new_with_flags(self.mantissa(value), self.exponent(value), flags)
    }

    /// The same value with its sign bit cleared.
    fn absolute(&self, value: &Self::Value) -> Self::Value {
        let flags = self.flags(value) - SpecialFlags::NEGATIVE;
        self.create_new_with_flags(self.mantissa(value), self.exponent(value), flags)
    }
}
