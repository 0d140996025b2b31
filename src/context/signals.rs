// ============================================================================
// Signals
// IEEE-754 style exceptional conditions raised by operations
// ============================================================================

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Set of signals raised by an operation, also used as a trap mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SignalSet: u32 {
        /// A nonzero digit was discarded
        const INEXACT = 1;
        /// Some digit (possibly zero) was discarded
        const ROUNDED = 2;
        /// The result's adjusted exponent is below the minimum
        const SUBNORMAL = 4;
        /// Subnormal and inexact
        const UNDERFLOW = 8;
        /// The result's adjusted exponent exceeded the maximum
        const OVERFLOW = 16;
        /// The exponent was altered to fit the representable range
        const CLAMPED = 32;
        /// The operation has no meaningful result
        const INVALID = 64;
        /// Finite nonzero dividend over a zero divisor
        const DIVIDE_BY_ZERO = 128;
        /// An operand had more digits than the precision
        const LOST_DIGITS = 256;
    }
}

/// Report order after the exceptional signals.
const SECONDARY_PRIORITY: [SignalSet; 5] = [
    SignalSet::SUBNORMAL,
    SignalSet::INEXACT,
    SignalSet::ROUNDED,
    SignalSet::CLAMPED,
    SignalSet::LOST_DIGITS,
];

impl SignalSet {
    /// Signals that take precedence when several are trapped at once.
    pub const EXCEPTIONAL: Self = Self::UNDERFLOW
        .union(Self::OVERFLOW)
        .union(Self::INVALID)
        .union(Self::DIVIDE_BY_ZERO);

    /// Raised together when a result is rounded and changed.
    pub const INEXACT_ROUNDED: Self = Self::INEXACT.union(Self::ROUNDED);

    /// The single signal to report when all of `self` is trapped.
    ///
    /// The lowest exceptional bit wins; otherwise subnormal, inexact,
    /// rounded, clamped and lost digits, in that order.
    pub fn highest_priority(self) -> Option<SignalSet> {
        let exceptional = self & Self::EXCEPTIONAL;
        if !exceptional.is_empty() {
            let lowest = exceptional.bits() & exceptional.bits().wrapping_neg();
            return Some(Self::from_bits_retain(lowest));
        }
        SECONDARY_PRIORITY
            .into_iter()
            .find(|signal| self.contains(*signal))
    }

    /// Short lower-case name of a single signal.
    pub fn name(self) -> &'static str {
        match self {
            s if s == Self::INEXACT => "inexact",
            s if s == Self::ROUNDED => "rounded",
            s if s == Self::SUBNORMAL => "subnormal",
            s if s == Self::UNDERFLOW => "underflow",
            s if s == Self::OVERFLOW => "overflow",
            s if s == Self::CLAMPED => "clamped",
            s if s == Self::INVALID => "invalid",
            s if s == Self::DIVIDE_BY_ZERO => "divide-by-zero",
            s if s == Self::LOST_DIGITS => "lost-digits",
            _ => "mixed",
        }
    }
}

impl fmt::Display for SignalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for signal in self.iter() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(signal.name())?;
            first = false;
        }
        Ok(())
    }
}
