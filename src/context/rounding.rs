// ============================================================================
// Rounding Modes
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How discarded digits affect the retained mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Round to nearest; ties away from zero
    HalfUp,
    /// Round to nearest; ties to an even last digit
    #[default]
    HalfEven,
    /// Round to nearest; ties toward zero
    HalfDown,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Away from zero
    Up,
    /// Toward zero (truncate)
    Down,
    /// Toward zero, but away from zero when the retained last digit would be
    /// 0 or half the radix. Always rounds away from zero in radix 2.
    ZeroFiveUp,
    /// Rounding is an error: any discarded nonzero digit fails the operation
    Unnecessary,
}

impl RoundingMode {
    /// True for the three round-to-nearest modes.
    #[inline]
    pub fn is_nearest(self) -> bool {
        matches!(
            self,
            RoundingMode::HalfUp | RoundingMode::HalfEven | RoundingMode::HalfDown
        )
    }

    /// True if an overflowing result of the given sign saturates to the
    /// largest finite value instead of infinity.
    pub fn overflows_to_largest_finite(self, negative: bool) -> bool {
        match self {
            RoundingMode::Down | RoundingMode::ZeroFiveUp => true,
            RoundingMode::Ceiling => negative,
            RoundingMode::Floor => !negative,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_half_even() {
        assert_eq!(RoundingMode::default(), RoundingMode::HalfEven);
    }

    #[test]
    fn test_overflow_saturation() {
        assert!(RoundingMode::Down.overflows_to_largest_finite(false));
        assert!(RoundingMode::Ceiling.overflows_to_largest_finite(true));
        assert!(!RoundingMode::Ceiling.overflows_to_largest_finite(false));
        assert!(RoundingMode::Floor.overflows_to_largest_finite(false));
        assert!(!RoundingMode::HalfEven.overflows_to_largest_finite(false));
    }
}
