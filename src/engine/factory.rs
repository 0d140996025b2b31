// ============================================================================
// Arithmetic Stack Factory
// Assembles the engine, simplified and trapping layers
// ============================================================================

use crate::engine::{RadixMath, SimpleRadixMath, TrappableRadixMath};
use crate::interfaces::{LoggingSignalObserver, NoOpSignalObserver, RadixMathHelper, SignalObserver};
use std::sync::Arc;

/// The full three-layer stack: trapping over simplified over the engine.
pub type RadixStack<H> = TrappableRadixMath<SimpleRadixMath<RadixMath<H>>>;

/// Trapping directly over the engine, without operand pre-rounding or
/// result normalization.
pub type RawStack<H> = TrappableRadixMath<RadixMath<H>>;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates the three-layer stack for a helper
///
/// # Arguments
/// * `helper` - Number type the stack operates on
/// * `observer` - Receives the signals of every operation
///
/// # Example
/// ```
/// use radix_math::prelude::*;
/// use radix_math::engine::factory::create_stack;
/// use std::sync::Arc;
///
/// let math = create_stack(DecimalHelper::new(), Arc::new(NoOpSignalObserver));
/// let ctx = PrecisionContext::for_precision(5);
/// let one: Decimal = "1".parse().unwrap();
/// let three: Decimal = "3".parse().unwrap();
/// let third = math.divide(&one, &three, &ctx).unwrap();
/// assert_eq!(third.value.to_string(), "0.33333");
/// ```
pub fn create_stack<H: RadixMathHelper>(helper: H, observer: Arc<dyn SignalObserver>) -> RadixStack<H> {
    TrappableRadixMath::with_observer(SimpleRadixMath::new(RadixMath::new(helper)), observer)
}

/// Creates a trapping stack without the simplified layer
pub fn create_raw_stack<H: RadixMathHelper>(helper: H, observer: Arc<dyn SignalObserver>) -> RawStack<H> {
    TrappableRadixMath::with_observer(RadixMath::new(helper), observer)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Builder for arithmetic stacks
///
/// # Example
/// ```
/// use radix_math::prelude::*;
/// use radix_math::engine::factory::RadixMathBuilder;
/// use std::sync::Arc;
///
/// let recorder = Arc::new(SignalRecorder::new());
/// let math = RadixMathBuilder::new(DecimalHelper::new())
///     .with_observer(recorder.clone())
///     .build();
/// let ctx = PrecisionContext::for_precision(3);
/// let a: Decimal = "1.2345".parse().unwrap();
/// math.round_to_precision(&a, &ctx).unwrap();
/// assert!(recorder.recorded().contains(SignalSet::INEXACT));
/// ```
pub struct RadixMathBuilder<H> {
    helper: H,
    observer: Arc<dyn SignalObserver>,
}

impl<H: RadixMathHelper> RadixMathBuilder<H> {
    /// Create a builder for the given helper, with no observer
    pub fn new(helper: H) -> Self {
        Self {
            helper,
            observer: Arc::new(NoOpSignalObserver),
        }
    }

    // ========================================================================
    // Observer Configuration
    // ========================================================================

    /// Report signals to the given observer
    pub fn with_observer(mut self, observer: Arc<dyn SignalObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Log every signal through `tracing`
    pub fn logging(self) -> Self {
        self.with_observer(Arc::new(LoggingSignalObserver))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the three-layer stack
    pub fn build(self) -> RadixStack<H> {
        create_stack(self.helper, self.observer)
    }

    /// Build without the simplified layer
    pub fn build_raw(self) -> RawStack<H> {
        create_raw_stack(self.helper, self.observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PrecisionContext, SignalSet};
    use crate::interfaces::{RadixArithmetic, SignalRecorder};
    use crate::types::{Decimal, DecimalHelper};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_create_stack() {
        let math = create_stack(DecimalHelper::new(), Arc::new(NoOpSignalObserver));
        assert_eq!(math.name(), "trappable");
        assert_eq!(math.inner().name(), "simple");
        assert_eq!(math.inner().inner().name(), "radix-math");
        assert_eq!(math.radix(), 10);
    }

    #[test]
    fn test_builder_records_signals() {
        let recorder = Arc::new(SignalRecorder::new());
        let math = RadixMathBuilder::new(DecimalHelper::new())
            .with_observer(recorder.clone())
            .build();
        let ctx = PrecisionContext::for_precision(2);

        math.add(&dec("1.5"), &dec("1.5"), &ctx).unwrap();
        assert!(recorder.recorded().is_empty());

        math.add(&dec("1.25"), &dec("1"), &ctx).unwrap();
        assert!(recorder.recorded().contains(SignalSet::INEXACT | SignalSet::LOST_DIGITS));
    }

    #[test]
    fn test_raw_stack_keeps_exponent() {
        let raw = RadixMathBuilder::new(DecimalHelper::new()).build_raw();
        let simple = RadixMathBuilder::new(DecimalHelper::new()).logging().build();
        let ctx = PrecisionContext::for_precision(9);

        let raw_zero = raw.subtract(&dec("1.00"), &dec("1.00"), &ctx).unwrap();
        assert_eq!(raw_zero.value.to_string(), "0.00");

        let simple_zero = simple.subtract(&dec("1.00"), &dec("1.00"), &ctx).unwrap();
        assert_eq!(simple_zero.value.to_string(), "0");
    }
}
