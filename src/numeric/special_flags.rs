// ============================================================================
// Special Flags
// Sign and special-value markers shared by all number types
// ============================================================================

use bitflags::bitflags;

bitflags! {
    /// Sign and special-value markers of a number.
    ///
    /// `INFINITY`, `QUIET_NAN` and `SIGNALING_NAN` are mutually exclusive;
    /// `NEGATIVE` composes with any of them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpecialFlags: u8 {
        const NEGATIVE = 1;
        const INFINITY = 2;
        const QUIET_NAN = 4;
        const SIGNALING_NAN = 8;
    }
}

impl SpecialFlags {
    /// Every flag that marks a non-finite value.
    pub const SPECIAL: Self = Self::INFINITY
        .union(Self::QUIET_NAN)
        .union(Self::SIGNALING_NAN);

    /// Either kind of NaN.
    pub const NAN: Self = Self::QUIET_NAN.union(Self::SIGNALING_NAN);

    #[inline]
    pub fn is_special(self) -> bool {
        self.intersects(Self::SPECIAL)
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.intersects(Self::NAN)
    }

    /// Flags for a value with the given sign and no special marker.
    #[inline]
    pub fn finite(negative: bool) -> Self {
        if negative {
            Self::NEGATIVE
        } else {
            Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SpecialFlags::INFINITY.is_special());
        assert!(!SpecialFlags::INFINITY.is_nan());
        assert!((SpecialFlags::NEGATIVE | SpecialFlags::QUIET_NAN).is_nan());
        assert!(!SpecialFlags::finite(true).is_special());
        assert_eq!(SpecialFlags::finite(false), SpecialFlags::empty());
    }
}
