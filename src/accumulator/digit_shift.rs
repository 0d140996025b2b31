// ============================================================================
// Digit Shift Accumulator
// Works in any radix by dividing out radix powers
// ============================================================================

use super::ShiftAccumulator;
use crate::numeric::{digit_count, radix_power};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

#[derive(Debug, Clone)]
pub struct DigitShiftAccumulator {
    radix: u32,
    magnitude: BigInt,
    discarded: BigInt,
    last: u32,
    older: bool,
    known_length: Option<u64>,
}

impl DigitShiftAccumulator {
    pub fn new(radix: u32, magnitude: BigInt) -> Self {
        Self::with_discarded(radix, magnitude, 0, false)
    }

    /// An accumulator whose value was already shifted once: `last` and
    /// `older` describe digits below the magnitude.
    pub fn with_discarded(radix: u32, magnitude: BigInt, last: u32, older: bool) -> Self {
        Self {
            radix,
            magnitude: magnitude.abs(),
            discarded: BigInt::zero(),
            last,
            older,
            known_length: None,
        }
    }

    fn record(&mut self, last: u32, older: bool) {
        self.older = older || self.last != 0 || self.older;
        self.last = last;
    }
}

impl ShiftAccumulator for DigitShiftAccumulator {
    fn shifted_magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    fn last_discarded_digit(&self) -> u32 {
        self.last
    }

    fn older_discarded_digits(&self) -> bool {
        self.older
    }

    fn discarded_digit_count(&self) -> &BigInt {
        &self.discarded
    }

    fn digit_length(&mut self) -> u64 {
        match self.known_length {
            Some(length) => length,
            None => {
                let length = digit_count(&self.magnitude, self.radix);
                self.known_length = Some(length);
                length
            }
        }
    }

    fn shift_right(&mut self, count: &BigInt) {
        if !count.is_positive() {
            return;
        }
        self.discarded += count;
        let length = self.digit_length();
        let small = count.to_u64().filter(|c| *c <= length);
        let Some(count) = small else {
            // Every digit goes below the last discarded position
            let nonzero = !self.magnitude.is_zero();
            self.record(0, nonzero);
            self.magnitude = BigInt::zero();
            self.known_length = Some(1);
            return;
        };

        let (upper, older) = match radix_power(self.radix, count - 1) {
            Ok(divisor) => {
                let (upper, lower) = self.magnitude.div_rem(&divisor);
                (upper, !lower.is_zero())
            }
            Err(_) => (BigInt::zero(), !self.magnitude.is_zero()),
        };
        let (kept, last) = upper.div_rem(&BigInt::from(self.radix));
        self.record(last.to_u32().unwrap_or(0), older);
        self.magnitude = kept;
        self.known_length = Some(if length > count { length - count } else { 1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_keeps_discard_state() {
        let mut acc = DigitShiftAccumulator::new(10, BigInt::from(123456));
        acc.shift_right(&BigInt::from(2));
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(1234));
        assert_eq!(acc.last_discarded_digit(), 5);
        assert!(acc.older_discarded_digits());
        assert_eq!(acc.digit_length(), 4);

        acc.shift_right(&BigInt::from(1));
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(123));
        assert_eq!(acc.last_discarded_digit(), 4);
        assert!(acc.older_discarded_digits());
        assert_eq!(acc.discarded_digit_count(), &BigInt::from(3));
    }

    #[test]
    fn test_shift_past_all_digits() {
        let mut acc = DigitShiftAccumulator::new(10, BigInt::from(95));
        acc.shift_right(&BigInt::from(2));
        assert!(acc.shifted_magnitude().is_zero());
        assert_eq!(acc.last_discarded_digit(), 9);
        assert!(acc.older_discarded_digits());

        let mut acc = DigitShiftAccumulator::new(10, BigInt::from(95));
        acc.shift_right(&BigInt::from(3));
        assert_eq!(acc.last_discarded_digit(), 0);
        assert!(acc.older_discarded_digits());
    }

    #[test]
    fn test_shift_to_digits_with_seed() {
        let mut acc = DigitShiftAccumulator::with_discarded(10, BigInt::from(1000), 0, true);
        acc.shift_to_digits(2);
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(10));
        assert_eq!(acc.last_discarded_digit(), 0);
        assert!(acc.older_discarded_digits());
        assert!(acc.is_inexact());
    }

    #[test]
    fn test_huge_shift() {
        let mut acc = DigitShiftAccumulator::new(10, BigInt::from(7));
        acc.shift_right(&(BigInt::from(u64::MAX) * 4));
        assert!(acc.shifted_magnitude().is_zero());
        assert_eq!(acc.last_discarded_digit(), 0);
        assert!(acc.older_discarded_digits());
    }
}
