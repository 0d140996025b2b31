// ============================================================================
// Bit Shift Accumulator
// Radix-2 accumulator using shifts instead of division
// ============================================================================

use super::ShiftAccumulator;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

#[derive(Debug, Clone)]
pub struct BitShiftAccumulator {
    magnitude: BigInt,
    discarded: BigInt,
    last: u32,
    older: bool,
}

impl BitShiftAccumulator {
    pub fn new(magnitude: BigInt) -> Self {
        Self::with_discarded(magnitude, 0, false)
    }

    pub fn with_discarded(magnitude: BigInt, last: u32, older: bool) -> Self {
        Self {
            magnitude: magnitude.abs(),
            discarded: BigInt::zero(),
            last,
            older,
        }
    }

    fn record(&mut self, last: u32, older: bool) {
        self.older = older || self.last != 0 || self.older;
        self.last = last;
    }
}

impl ShiftAccumulator for BitShiftAccumulator {
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
        self.magnitude.bits().max(1)
    }

    fn shift_right(&mut self, count: &BigInt) {
        if !count.is_positive() {
            return;
        }
        self.discarded += count;
        let bits = self.magnitude.bits();
        let Some(count) = count.to_u64().filter(|c| *c <= bits) else {
            let nonzero = !self.magnitude.is_zero();
            self.record(0, nonzero);
            self.magnitude = BigInt::zero();
            return;
        };

        let older = self
            .magnitude
            .trailing_zeros()
            .map_or(false, |zeros| zeros < count - 1);
        let upper = &self.magnitude >> (count - 1);
        let last = u32::from(upper.is_odd());
        self.record(last, older);
        self.magnitude = upper >> 1u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_shift() {
        // 0b1011_0110
        let mut acc = BitShiftAccumulator::new(BigInt::from(0xB6));
        acc.shift_right(&BigInt::from(3));
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(0b10110));
        assert_eq!(acc.last_discarded_digit(), 1);
        assert!(acc.older_discarded_digits());

        acc.shift_to_digits(2);
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(0b10));
        assert_eq!(acc.last_discarded_digit(), 1);
        assert!(acc.older_discarded_digits());
        assert_eq!(acc.discarded_digit_count(), &BigInt::from(6));
    }

    #[test]
    fn test_exact_half() {
        let mut acc = BitShiftAccumulator::new(BigInt::from(0b1100));
        acc.shift_right(&BigInt::from(3));
        assert_eq!(acc.shifted_magnitude(), &BigInt::from(1));
        assert_eq!(acc.last_discarded_digit(), 1);
        assert!(!acc.older_discarded_digits());
    }
}
