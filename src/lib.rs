// ============================================================================
// Radix Math Library
// Arbitrary-precision floating-point arithmetic in any radix
// ============================================================================

//! # Radix Math
//!
//! Correctly rounded arbitrary-precision floating-point arithmetic that works
//! the same way in any radix.
//!
//! ## Features
//!
//! - **One engine for every radix**: number types plug in through [`interfaces::RadixMathHelper`]
//! - **Eight rounding modes** and optional exponent ranges with subnormals
//! - **Signals as values**: every result carries the conditions it raised
//! - **Traps** that turn chosen signals into errors
//! - **Transcendental functions**: square root, `exp`, `ln`, `log10`, power and pi
//! - Ready-made [`types::Decimal`] (radix 10) and [`types::BinaryFloat`] (radix 2)
//!
//! ## Example
//!
//! ```rust
//! use radix_math::prelude::*;
//!
//! let ctx = PrecisionContext::for_precision(10);
//! let one: Decimal = "1".parse().unwrap();
//! let three: Decimal = "3".parse().unwrap();
//!
//! // Signals travel with the result
//! let third = one.divide(&three, Some(&ctx)).unwrap();
//! assert_eq!(third.value.to_string(), "0.3333333333");
//! assert!(third.signals.contains(SignalSet::INEXACT));
//!
//! // Trapped signals become errors
//! let strict = ctx.clone().with_traps(SignalSet::INEXACT);
//! let err = one.divide(&three, Some(&strict)).unwrap_err();
//! assert_eq!(err.as_trap().map(|t| t.signal), Some(SignalSet::INEXACT));
//!
//! // Binary floats round like hardware doubles under binary64
//! let tenth = BinaryFloat::from_f64(0.1);
//! let sum = tenth.add(&BinaryFloat::from_f64(0.2), Some(&PrecisionContext::binary64())).unwrap();
//! assert_eq!(sum.value.to_f64(), 0.1 + 0.2);
//! ```

pub mod accumulator;
pub mod context;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod types;

// Re-exports for convenience
pub mod prelude {
    pub use crate::accumulator::{BitShiftAccumulator, DigitShiftAccumulator, ShiftAccumulator};
    pub use crate::context::{PrecisionContext, RoundingMode, SignalSet};
    pub use crate::engine::{
        create_raw_stack, create_stack, RadixMath, RadixMathBuilder, RadixStack, RawStack,
        SimpleRadixMath, TrappableRadixMath,
    };
    pub use crate::interfaces::{
        ArithmeticSupport, LoggingSignalObserver, NoOpSignalObserver, RadixArithmetic,
        RadixMathHelper, SignalEvent, SignalObserver, SignalRecorder,
    };
    pub use crate::numeric::{ContractError, MathError, MathResult, Outcome, TrapError};
    pub use crate::types::{BinaryFloat, BinaryFloatHelper, Decimal, DecimalHelper, SpecialFlags};
}


#[cfg(test)]
mod property_tests {
    use super::prelude::*;
    use proptest::prelude::*;
    use std::cmp::Ordering;

    fn decimal_strategy(max_mantissa: i64) -> impl Strategy<Value = Decimal> {
        (-max_mantissa..=max_mantissa, -30i64..30).prop_map(|(m, e)| Decimal::new(m, e))
    }

    proptest! {
        #[test]
        fn prop_rounding_is_idempotent(value in decimal_strategy(i64::MAX), precision in 1u64..20) {
            let ctx = PrecisionContext::for_precision(precision);
            let once = value.round_to_precision(Some(&ctx)).unwrap();
            let twice = once.value.round_to_precision(Some(&ctx)).unwrap();
            prop_assert_eq!(&twice.value, &once.value);
            prop_assert!(!twice.signals.contains(SignalSet::INEXACT));
        }

        #[test]
        fn prop_quantize_to_smaller_exponent_is_exact(
            value in decimal_strategy(1_000_000_000),
            drop in 0i64..10,
        ) {
            let exponent = value.exponent() - drop;
            let target = Decimal::from_parts(false, 1u32.into(), exponent.clone());
            let quantized = value.quantize(&target, None).unwrap();
            prop_assert_eq!(quantized.value.exponent(), &exponent);
            prop_assert_eq!(quantized.value.compare_to(&value), Ordering::Equal);
            prop_assert!(quantized.signals.is_empty());
        }

        #[test]
        fn prop_next_plus_undoes_next_minus(value in decimal_strategy(999_999_999_999_999)) {
            let ctx = PrecisionContext::decimal64();
            let below = value.next_minus(Some(&ctx)).unwrap().value;
            prop_assert_eq!(below.compare_to(&value), Ordering::Less);
            let back = below.next_plus(Some(&ctx)).unwrap().value;
            prop_assert_eq!(back.compare_to(&value), Ordering::Equal);
        }

        #[test]
        fn prop_exact_add_and_multiply_raise_nothing(
            a in decimal_strategy(i64::from(i32::MAX)),
            b in decimal_strategy(i64::from(i32::MAX)),
        ) {
            let sum = a.add(&b, None).unwrap();
            prop_assert!(sum.signals.is_empty());
            let product = a.multiply(&b, None).unwrap();
            prop_assert!(product.signals.is_empty());

            let check = sum.value.subtract(&b, None).unwrap().value;
            prop_assert_eq!(check.compare_to(&a), Ordering::Equal);
        }
    }
}
