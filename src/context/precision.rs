// ============================================================================
// Precision Context
// Precision, rounding, exponent range and trap configuration
// ============================================================================

use super::rounding::RoundingMode;
use super::signals::SignalSet;
use crate::numeric::ContractError;
use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::sync::LazyLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static UNLIMITED: LazyLock<PrecisionContext> = LazyLock::new(PrecisionContext::unlimited);

/// The shared unlimited context, used wherever a caller passes no context.
pub fn unlimited_context() -> &'static PrecisionContext {
    &UNLIMITED
}

/// Resolves an optional caller context to a concrete one.
#[inline]
pub fn resolve_context(ctx: Option<&PrecisionContext>) -> &PrecisionContext {
    ctx.unwrap_or_else(|| unlimited_context())
}

// ============================================================================
// Context
// ============================================================================

/// Arithmetic environment of one operation.
///
/// Immutable: signals raised by an operation are returned with its result,
/// never written back here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionContext {
    /// Maximum mantissa digits; 0 means unlimited
    pub precision: u64,

    /// Rounding applied when digits are discarded
    pub rounding: RoundingMode,

    /// Smallest adjusted exponent of a normal value
    pub e_min: BigInt,

    /// Largest adjusted exponent of a finite value
    pub e_max: BigInt,

    /// When false, `e_min` and `e_max` are ignored
    pub has_exponent_range: bool,

    /// Confine normal results to exponents at most `e_max + 1 - precision`
    pub clamp_normal_exponents: bool,

    /// Signals that turn into errors instead of being reported
    pub traps: SignalSet,
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl PrecisionContext {
    /// A context with the given precision and rounding and no exponent range.
    pub fn new(precision: u64, rounding: RoundingMode) -> Self {
        Self {
            precision,
            rounding,
            e_min: BigInt::zero(),
            e_max: BigInt::zero(),
            has_exponent_range: false,
            clamp_normal_exponents: false,
            traps: SignalSet::empty(),
        }
    }

    /// Unlimited precision, no exponent range, no traps.
    pub fn unlimited() -> Self {
        Self::new(0, RoundingMode::HalfEven)
    }

    pub fn for_precision(precision: u64) -> Self {
        Self::new(precision, RoundingMode::HalfEven)
    }

    pub fn for_rounding(rounding: RoundingMode) -> Self {
        Self::new(0, rounding)
    }

    /// Nine digits, half-up, a wide exponent range, and the exceptional
    /// signals trapped.
    pub fn basic() -> Self {
        Self::new(9, RoundingMode::HalfUp)
            .with_exponent_range(-999_999_999, 999_999_999)
            .with_traps(SignalSet::INVALID | SignalSet::DIVIDE_BY_ZERO | SignalSet::OVERFLOW)
    }

    // ========================================================================
    // Interchange Formats
    // ========================================================================

    pub fn decimal32() -> Self {
        Self::interchange(7, -95, 96)
    }

    pub fn decimal64() -> Self {
        Self::interchange(16, -383, 384)
    }

    pub fn decimal128() -> Self {
        Self::interchange(34, -6143, 6144)
    }

    pub fn binary16() -> Self {
        Self::interchange(11, -14, 15)
    }

    pub fn binary32() -> Self {
        Self::interchange(24, -126, 127)
    }

    pub fn binary64() -> Self {
        Self::interchange(53, -1022, 1023)
    }

    pub fn binary128() -> Self {
        Self::interchange(113, -16382, 16383)
    }

    fn interchange(precision: u64, e_min: i64, e_max: i64) -> Self {
        Self::for_precision(precision)
            .with_exponent_range(e_min, e_max)
            .with_clamp_normal_exponents(true)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    pub fn with_precision(mut self, precision: u64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn with_exponent_range(mut self, e_min: impl Into<BigInt>, e_max: impl Into<BigInt>) -> Self {
        self.e_min = e_min.into();
        self.e_max = e_max.into();
        self.has_exponent_range = true;
        self
    }

    pub fn without_exponent_range(mut self) -> Self {
        self.has_exponent_range = false;
        self
    }

    pub fn with_clamp_normal_exponents(mut self, clamp: bool) -> Self {
        self.clamp_normal_exponents = clamp;
        self
    }

    pub fn with_traps(mut self, traps: SignalSet) -> Self {
        self.traps = traps;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ContractError> {
        self.validate_for("validate")
    }

    /// Validate the configuration on behalf of `operation`.
    pub(crate) fn validate_for(&self, operation: &'static str) -> Result<(), ContractError> {
        if self.has_exponent_range && self.e_min > self.e_max {
            return Err(ContractError::InvalidContext {
                operation,
                requirement: "e_min <= e_max",
            });
        }
        if self.clamp_normal_exponents && !self.has_exponent_range {
            return Err(ContractError::InvalidContext {
                operation,
                requirement: "an exponent range when clamping normal exponents",
            });
        }
        Ok(())
    }

    // ========================================================================
    // Derived Quantities
    // ========================================================================

    /// True if precision is bounded.
    #[inline]
    pub fn has_max_precision(&self) -> bool {
        self.precision > 0
    }

    /// Smallest exponent a subnormal result may carry: `e_min - precision + 1`,
    /// or `e_min` when precision is unlimited.
    pub fn e_tiny(&self) -> BigInt {
        if self.precision == 0 {
            self.e_min.clone()
        } else {
            &self.e_min - BigInt::from(self.precision) + BigInt::one()
        }
    }

    /// Largest exponent a finite result may carry.
    pub fn exponent_ceiling(&self) -> BigInt {
        if self.clamp_normal_exponents && self.precision > 0 {
            &self.e_max - BigInt::from(self.precision) + BigInt::one()
        } else {
            self.e_max.clone()
        }
    }

    /// A copy that traps nothing, for internal steps whose signals are
    /// discarded or reinterpreted.
    pub fn without_traps(&self) -> Self {
        self.clone().with_traps(SignalSet::empty())
    }
}
