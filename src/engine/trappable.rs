// ============================================================================
// Trapping Layer
// Reports signals to an observer and turns trapped signals into errors
// ============================================================================

use crate::context::PrecisionContext;
use crate::interfaces::{NoOpSignalObserver, RadixArithmetic, SignalEvent, SignalObserver};
use crate::numeric::{MathError, MathResult, TrapError};
use num_bigint::BigInt;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Outermost layer of a stack. Every outcome is reported to the observer;
/// an outcome raising a signal that the context traps becomes
/// [`MathError::Trap`] carrying the untrapped result.
#[derive(Clone)]
pub struct TrappableRadixMath<M> {
    inner: M,
    observer: Arc<dyn SignalObserver>,
}

impl<M: fmt::Debug> fmt::Debug for TrappableRadixMath<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrappableRadixMath")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<M: RadixArithmetic> TrappableRadixMath<M> {
    pub fn new(inner: M) -> Self {
        Self::with_observer(inner, Arc::new(NoOpSignalObserver))
    }

    pub fn with_observer(inner: M, observer: Arc<dyn SignalObserver>) -> Self {
        Self { inner, observer }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn dispatch(
        &self,
        operation: &'static str,
        ctx: &PrecisionContext,
        compute: impl FnOnce() -> MathResult<M::Value>,
    ) -> MathResult<M::Value> {
        ctx.validate_for(operation)?;
        let outcome = compute()?;
        let trapped = (ctx.traps & outcome.signals).highest_priority();
        self.observer.on_signals(&SignalEvent {
            operation,
            signals: outcome.signals,
            trapped,
        });
        match trapped {
            None => Ok(outcome),
            Some(signal) => {
                tracing::debug!(operation, signal = signal.name(), signals = %outcome.signals, "signal trapped");
                Err(MathError::Trap(Box::new(TrapError {
                    signal,
                    signals: outcome.signals,
                    context: ctx.clone(),
                    result: outcome.value,
                })))
            }
        }
    }
}

impl<M: RadixArithmetic> RadixArithmetic for TrappableRadixMath<M> {
    type Value = M::Value;
    type Helper = M::Helper;

    fn helper(&self) -> &M::Helper {
        self.inner.helper()
    }

    fn name(&self) -> &str {
        "trappable"
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn add(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("add", ctx, || self.inner.add(a, b, ctx))
    }

    fn subtract(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("subtract", ctx, || self.inner.subtract(a, b, ctx))
    }

    fn multiply(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("multiply", ctx, || self.inner.multiply(a, b, ctx))
    }

    fn multiply_and_add(
        &self,
        a: &M::Value,
        b: &M::Value,
        c: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch("multiply_and_add", ctx, || self.inner.multiply_and_add(a, b, c, ctx))
    }

    fn divide(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("divide", ctx, || self.inner.divide(a, b, ctx))
    }

    fn divide_to_exponent(
        &self,
        a: &M::Value,
        b: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "divide_to_exponent",
            ctx,
            || self.inner.divide_to_exponent(a, b, exponent, ctx),
        )
    }

    fn divide_to_integer_natural_scale(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "divide_to_integer_natural_scale",
            ctx,
            || self.inner.divide_to_integer_natural_scale(a, b, ctx),
        )
    }

    fn divide_to_integer_zero_scale(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "divide_to_integer_zero_scale",
            ctx,
            || self.inner.divide_to_integer_zero_scale(a, b, ctx),
        )
    }

    fn remainder(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("remainder", ctx, || self.inner.remainder(a, b, ctx))
    }

    fn remainder_near(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("remainder_near", ctx, || self.inner.remainder_near(a, b, ctx))
    }

    // ========================================================================
    // Rounding and Exponents
    // ========================================================================

    fn round_to_precision(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("round_to_precision", ctx, || self.inner.round_to_precision(value, ctx))
    }

    fn abs(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("abs", ctx, || self.inner.abs(value, ctx))
    }

    fn negate(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("negate", ctx, || self.inner.negate(value, ctx))
    }

    fn quantize(&self, value: &M::Value, target: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("quantize", ctx, || self.inner.quantize(value, target, ctx))
    }

    fn round_to_exponent_exact(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "round_to_exponent_exact",
            ctx,
            || self.inner.round_to_exponent_exact(value, exponent, ctx),
        )
    }

    fn round_to_exponent_simple(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "round_to_exponent_simple",
            ctx,
            || self.inner.round_to_exponent_simple(value, exponent, ctx),
        )
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "round_to_exponent_no_rounded_flag",
            ctx,
            || self.inner.round_to_exponent_no_rounded_flag(value, exponent, ctx),
        )
    }

    fn reduce(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("reduce", ctx, || self.inner.reduce(value, ctx))
    }

    fn next_plus(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("next_plus", ctx, || self.inner.next_plus(value, ctx))
    }

    fn next_minus(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("next_minus", ctx, || self.inner.next_minus(value, ctx))
    }

    fn next_toward(&self, value: &M::Value, target: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("next_toward", ctx, || self.inner.next_toward(value, target, ctx))
    }

    // ========================================================================
    // Transcendental
    // ========================================================================

    fn square_root(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("square_root", ctx, || self.inner.square_root(value, ctx))
    }

    fn ln(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("ln", ctx, || self.inner.ln(value, ctx))
    }

    fn log10(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("log10", ctx, || self.inner.log10(value, ctx))
    }

    fn exp(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("exp", ctx, || self.inner.exp(value, ctx))
    }

    fn power(&self, base: &M::Value, exponent: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("power", ctx, || self.inner.power(base, exponent, ctx))
    }

    fn pi(&self, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("pi", ctx, || self.inner.pi(ctx))
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    fn max(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("max", ctx, || self.inner.max(a, b, ctx))
    }

    fn min(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("min", ctx, || self.inner.min(a, b, ctx))
    }

    fn max_magnitude(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("max_magnitude", ctx, || self.inner.max_magnitude(a, b, ctx))
    }

    fn min_magnitude(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.dispatch("min_magnitude", ctx, || self.inner.min_magnitude(a, b, ctx))
    }

    fn compare_to_with_context(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.dispatch(
            "compare_to_with_context",
            ctx,
            || self.inner.compare_to_with_context(a, b, ctx),
        )
    }

    fn compare_to(&self, a: &M::Value, b: &M::Value) -> Ordering {
        self.inner.compare_to(a, b)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SignalSet;
    use crate::engine::RadixMath;
    use crate::interfaces::SignalRecorder;
    use crate::numeric::ContractError;
    use crate::types::{Decimal, DecimalHelper};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn trappable(observer: Arc<dyn SignalObserver>) -> TrappableRadixMath<RadixMath<DecimalHelper>> {
        TrappableRadixMath::with_observer(RadixMath::new(DecimalHelper::new()), observer)
    }

    #[test]
    fn test_untrapped_signals_pass_through() {
        let math = TrappableRadixMath::new(RadixMath::new(DecimalHelper::new()));
        let ctx = PrecisionContext::for_precision(5);
        let third = math.divide(&dec("1"), &dec("3"), &ctx).unwrap();
        assert_eq!(third.value.to_string(), "0.33333");
        assert_eq!(third.signals, SignalSet::INEXACT_ROUNDED);
    }

    #[test]
    fn test_trap_carries_untrapped_result() {
        let math = trappable(Arc::new(NoOpSignalObserver));
        let ctx = PrecisionContext::for_precision(5).with_traps(SignalSet::INEXACT);

        let err = math.divide(&dec("1"), &dec("3"), &ctx).unwrap_err();
        let trap = err.as_trap().unwrap();
        assert_eq!(trap.signal, SignalSet::INEXACT);
        assert_eq!(trap.signals, SignalSet::INEXACT_ROUNDED);
        assert_eq!(trap.result.to_string(), "0.33333");
        assert_eq!(trap.context, ctx);

        let err = math.round_to_precision(&dec("1.234567"), &ctx).unwrap_err();
        assert_eq!(err.as_trap().map(|t| t.signal), Some(SignalSet::INEXACT));
    }

    #[test]
    fn test_trap_priority() {
        let math = trappable(Arc::new(NoOpSignalObserver));
        let ctx = PrecisionContext::for_precision(2)
            .with_exponent_range(-5, 5)
            .with_traps(SignalSet::all());

        // Overflow outranks inexact and rounded
        let err = math.multiply(&dec("9E+5"), &dec("9E+5"), &ctx).unwrap_err();
        assert_eq!(err.as_trap().map(|t| t.signal), Some(SignalSet::OVERFLOW));

        // Rounded alone when only zeros are dropped
        let err = math.round_to_precision(&dec("1.00"), &ctx).unwrap_err();
        assert_eq!(err.as_trap().map(|t| t.signal), Some(SignalSet::ROUNDED));

        let err = math.divide(&dec("1"), &dec("0"), &ctx).unwrap_err();
        assert_eq!(err.as_trap().map(|t| t.signal), Some(SignalSet::DIVIDE_BY_ZERO));
    }

    #[test]
    fn test_contract_errors_are_not_traps() {
        let math = trappable(Arc::new(NoOpSignalObserver));
        let err = math
            .divide(&dec("1"), &dec("3"), &PrecisionContext::unlimited())
            .unwrap_err();
        assert!(err.as_trap().is_none());
        assert!(err.as_contract().is_some());
    }

    #[test]
    fn test_inconsistent_context_is_rejected() {
        let recorder = Arc::new(SignalRecorder::new());
        let math = trappable(recorder.clone());

        let inverted = PrecisionContext::for_precision(5).with_exponent_range(10, -10);
        let err = math.add(&dec("1"), &dec("2"), &inverted).unwrap_err();
        assert_eq!(
            err.as_contract(),
            Some(&ContractError::InvalidContext {
                operation: "add",
                requirement: "e_min <= e_max",
            })
        );

        let clamp_without_range = PrecisionContext::for_precision(5).with_clamp_normal_exponents(true);
        let err = math.round_to_precision(&dec("1"), &clamp_without_range).unwrap_err();
        assert!(matches!(
            err.as_contract(),
            Some(ContractError::InvalidContext { operation: "round_to_precision", .. })
        ));
        assert!(recorder.recorded().is_empty());
    }

    #[test]
    fn test_observer_sees_every_call() {
        let recorder = Arc::new(SignalRecorder::new());
        let math = trappable(recorder.clone());
        let ctx = PrecisionContext::for_precision(3).with_traps(SignalSet::DIVIDE_BY_ZERO);

        math.add(&dec("1"), &dec("2"), &ctx).unwrap();
        assert!(recorder.recorded().is_empty());

        math.add(&dec("1"), &dec("0.001"), &ctx).unwrap();
        assert_eq!(recorder.take(), SignalSet::INEXACT_ROUNDED);

        assert!(math.divide(&dec("1"), &dec("0"), &ctx).is_err());
        assert_eq!(recorder.recorded(), SignalSet::DIVIDE_BY_ZERO);
    }
}
