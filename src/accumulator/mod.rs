// ============================================================================
// Shift Accumulator Module
// Right-shifts a magnitude while remembering what was discarded
// ============================================================================
//
// An accumulator holds a non-negative magnitude and two pieces of discard
// state needed for correct rounding:
// - last_discarded_digit: the most significant digit shifted out so far
// - older_discarded_digits: whether any digit below it was nonzero
//
// Digit-based (any radix) and bit-based (radix 2) implementations share
// one trait so the engine stays radix-independent.

mod bit_shift;
mod digit_shift;

pub use bit_shift::BitShiftAccumulator;
pub use digit_shift::DigitShiftAccumulator;

use num_bigint::BigInt;

/// Shifting state machine used by rounding.
pub trait ShiftAccumulator {
    /// Remaining magnitude after all shifts so far
    fn shifted_magnitude(&self) -> &BigInt;

    /// Most significant discarded digit, or the seed value if nothing was shifted
    fn last_discarded_digit(&self) -> u32;

    /// True if any digit below the last discarded one was nonzero
    fn older_discarded_digits(&self) -> bool;

    /// Total digits discarded by shifts (not counting seeded discard state)
    fn discarded_digit_count(&self) -> &BigInt;

    /// Digit count of the remaining magnitude (zero counts as one digit)
    fn digit_length(&mut self) -> u64;

    /// Discards the `count` least significant digits. Non-positive counts are ignored.
    fn shift_right(&mut self, count: &BigInt);

    /// Shifts right until at most `digits` digits remain.
    fn shift_to_digits(&mut self, digits: u64) {
        let length = self.digit_length();
        if length > digits {
            self.shift_right(&BigInt::from(length - digits));
        }
    }

    /// True if any nonzero digit has been discarded, counting the seed state.
    fn is_inexact(&self) -> bool {
        self.last_discarded_digit() != 0 || self.older_discarded_digits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn decimal_digits(value: u64) -> Vec<u32> {
        value
            .to_string()
            .bytes()
            .map(|b| u32::from(b - b'0'))
            .collect()
    }

    quickcheck! {
        fn prop_digit_shift_matches_string_split(value: u64, shift: u8) -> bool {
            let shift = u64::from(shift % 24);
            let mut acc = DigitShiftAccumulator::new(10, BigInt::from(value));
            acc.shift_right(&BigInt::from(shift));

            let digits = decimal_digits(value);
            let keep = digits.len().saturating_sub(shift as usize);
            let kept: u64 = if keep == 0 { 0 } else {
                digits[..keep].iter().fold(0u64, |acc, d| acc * 10 + u64::from(*d))
            };
            let discarded: Vec<u32> = if shift as usize > digits.len() {
                let mut padded = vec![0; shift as usize - digits.len()];
                padded.extend(&digits);
                padded
            } else {
                digits[keep..].to_vec()
            };
            let expected_last = discarded.first().copied().unwrap_or(0);
            let expected_older = discarded.iter().skip(1).any(|d| *d != 0);

            acc.shifted_magnitude() == &BigInt::from(kept)
                && acc.last_discarded_digit() == expected_last
                && acc.older_discarded_digits() == expected_older
                && acc.discarded_digit_count() == &BigInt::from(shift)
        }

        fn prop_bit_shift_matches_digit_shift_in_radix_two(value: u64, shift: u8) -> bool {
            let shift = BigInt::from(shift % 80);
            let mut bits = BitShiftAccumulator::new(BigInt::from(value));
            let mut digits = DigitShiftAccumulator::new(2, BigInt::from(value));
            bits.shift_right(&shift);
            digits.shift_right(&shift);
            bits.shifted_magnitude() == digits.shifted_magnitude()
                && bits.last_discarded_digit() == digits.last_discarded_digit()
                && bits.older_discarded_digits() == digits.older_discarded_digits()
        }

        fn prop_split_shifts_equal_single_shift(value: u64, first: u8, second: u8) -> bool {
            let (first, second) = (u64::from(first % 12), u64::from(second % 12));
            let mut split = DigitShiftAccumulator::new(10, BigInt::from(value));
            split.shift_right(&BigInt::from(first));
            split.shift_right(&BigInt::from(second));
            let mut single = DigitShiftAccumulator::new(10, BigInt::from(value));
            single.shift_right(&BigInt::from(first + second));
            split.shifted_magnitude() == single.shifted_magnitude()
                && split.last_discarded_digit() == single.last_discarded_digit()
                && split.older_discarded_digits() == single.older_discarded_digits()
        }
    }
}
