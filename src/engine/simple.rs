// ============================================================================
// Simplified Arithmetic Layer
// Operand pre-rounding, NaN normalization and result post-processing
// ============================================================================
//
// Wraps any RadixArithmetic and gives it the "simplified" semantics:
// - operands with more digits than the precision are rounded first, which
//   raises LostDigits when a nonzero digit goes
// - zero results come back as canonical positive zero
// - results with a positive exponent are written out as integers when the
//   precision has room for it
// - subnormal inexact results always report Underflow

use super::division::strip_trailing_zeros;
use super::radix_math::propagate_nan;
use crate::context::{PrecisionContext, SignalSet};
use crate::interfaces::{RadixArithmetic, RadixMathHelper};
use crate::numeric::{digit_count, MathError, MathResult, Outcome};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;

/// Post-processing applied to a result.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PostProcess {
    /// Canonical zero, positive exponents expanded
    Arithmetic,
    /// As arithmetic, then trailing zeros stripped toward the ideal exponent
    Division(BigInt),
    /// The exponent is the point of the operation and is kept as is
    PreserveExponent,
}

/// Layer giving simplified arithmetic semantics to the wrapped operations.
#[derive(Debug, Clone)]
pub struct SimpleRadixMath<M> {
    inner: M,
}

impl<M: RadixArithmetic> SimpleRadixMath<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn check_nan(
        &self,
        operands: &[&M::Value],
        ctx: &PrecisionContext,
    ) -> Result<Option<Outcome<M::Value>>, MathError<M::Value>> {
        Ok(propagate_nan(self.inner.helper(), operands, ctx)?)
    }

    /// Rounds an operand that has more digits than the precision.
    fn pre_round(
        &self,
        value: &M::Value,
        ctx: &PrecisionContext,
        signals: &mut SignalSet,
    ) -> Result<M::Value, MathError<M::Value>> {
        let h = self.inner.helper();
        if ctx.precision == 0
            || !h.is_finite(value)
            || digit_count(&h.mantissa(value), h.radix()) <= ctx.precision
        {
            return Ok(value.clone());
        }
        let rounded = self.inner.round_to_precision(value, ctx)?;
        if rounded.signals.contains(SignalSet::OVERFLOW) {
            *signals |= SignalSet::LOST_DIGITS | SignalSet::OVERFLOW | SignalSet::INEXACT_ROUNDED;
        } else if rounded.signals.contains(SignalSet::INEXACT) {
            *signals |= SignalSet::LOST_DIGITS | SignalSet::INEXACT_ROUNDED;
        } else if rounded.signals.contains(SignalSet::ROUNDED) {
            *signals |= SignalSet::ROUNDED;
        }
        tracing::trace!(precision = ctx.precision, signals = %rounded.signals, "operand rounded before use");
        Ok(rounded.value)
    }

    fn post_process(
        &self,
        outcome: Outcome<M::Value>,
        pre_signals: SignalSet,
        ctx: &PrecisionContext,
        mode: PostProcess,
    ) -> Outcome<M::Value> {
        let h = self.inner.helper();
        let mut signals = outcome.signals | pre_signals;
        if mode == PostProcess::PreserveExponent {
            signals.remove(SignalSet::UNDERFLOW);
        } else if signals.contains(SignalSet::SUBNORMAL | SignalSet::INEXACT) {
            signals |= SignalSet::UNDERFLOW;
        }

        let value = outcome.value;
        if !h.is_finite(&value) {
            return Outcome::new(value, signals);
        }
        let magnitude = h.mantissa(&value);
        let exponent = h.exponent(&value);
        if magnitude.is_zero() {
            let exponent = if mode == PostProcess::PreserveExponent {
                exponent
            } else {
                BigInt::zero()
            };
            return Outcome::new(h.create_finite(false, magnitude, exponent), signals);
        }
        if mode == PostProcess::PreserveExponent {
            return Outcome::new(value, signals);
        }

        let negative = h.is_negative(&value);
        let radix = h.radix();
        let (mut magnitude, mut exponent) = (magnitude, exponent);
        if exponent.is_positive() {
            let fits = ctx.precision == 0
                || BigInt::from(ctx.precision.saturating_sub(digit_count(&magnitude, radix))) >= exponent;
            if fits {
                if let Ok(expanded) = h.multiply_by_radix_power(&magnitude, &exponent) {
                    magnitude = expanded;
                    exponent = BigInt::zero();
                }
            }
        }
        if let PostProcess::Division(ideal) = &mode {
            (magnitude, exponent) = strip_trailing_zeros(magnitude, exponent, ideal, radix);
        }
        Outcome::new(h.create_finite(negative, magnitude, exponent), signals)
    }

    fn unary(
        &self,
        value: &M::Value,
        ctx: &PrecisionContext,
        mode: PostProcess,
        op: impl FnOnce(&M::Value) -> MathResult<M::Value>,
    ) -> MathResult<M::Value> {
        if let Some(nan) = self.check_nan(&[value], ctx)? {
            return Ok(nan);
        }
        let mut signals = SignalSet::empty();
        let value = self.pre_round(value, ctx, &mut signals)?;
        let outcome = op(&value)?;
        Ok(self.post_process(outcome, signals, ctx, mode))
    }

    fn binary(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
        mode: PostProcess,
        op: impl FnOnce(&M::Value, &M::Value) -> MathResult<M::Value>,
    ) -> MathResult<M::Value> {
        if let Some(nan) = self.check_nan(&[a, b], ctx)? {
            return Ok(nan);
        }
        let mut signals = SignalSet::empty();
        let a = self.pre_round(a, ctx, &mut signals)?;
        let b = self.pre_round(b, ctx, &mut signals)?;
        let outcome = op(&a, &b)?;
        Ok(self.post_process(outcome, signals, ctx, mode))
    }
}

impl<M: RadixArithmetic> RadixArithmetic for SimpleRadixMath<M> {
    type Value = M::Value;
    type Helper = M::Helper;

    fn helper(&self) -> &M::Helper {
        self.inner.helper()
    }

    fn name(&self) -> &str {
        "simple"
    }

    fn add(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.add(a, b, ctx))
    }

    fn subtract(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.subtract(a, b, ctx))
    }

    fn multiply(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.multiply(a, b, ctx))
    }

    fn multiply_and_add(
        &self,
        a: &M::Value,
        b: &M::Value,
        c: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        if let Some(nan) = self.check_nan(&[a, b, c], ctx)? {
            return Ok(nan);
        }
        let mut signals = SignalSet::empty();
        let a = self.pre_round(a, ctx, &mut signals)?;
        let b = self.pre_round(b, ctx, &mut signals)?;
        let c = self.pre_round(c, ctx, &mut signals)?;
        let outcome = self.inner.multiply_and_add(&a, &b, &c, ctx)?;
        Ok(self.post_process(outcome, signals, ctx, PostProcess::Arithmetic))
    }

    fn divide(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        if let Some(nan) = self.check_nan(&[a, b], ctx)? {
            return Ok(nan);
        }
        let h = self.inner.helper();
        let mut signals = SignalSet::empty();
        let a = self.pre_round(a, ctx, &mut signals)?;
        let b = self.pre_round(b, ctx, &mut signals)?;
        let ideal = h.exponent(&a) - h.exponent(&b);
        let outcome = self.inner.divide(&a, &b, ctx)?;
        Ok(self.post_process(outcome, signals, ctx, PostProcess::Division(ideal)))
    }

    fn divide_to_exponent(
        &self,
        a: &M::Value,
        b: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::PreserveExponent, |a, b| {
            self.inner.divide_to_exponent(a, b, exponent, ctx)
        })
    }

    fn divide_to_integer_natural_scale(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.divide_to_integer_natural_scale(a, b, ctx)
        })
    }

    fn divide_to_integer_zero_scale(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.divide_to_integer_zero_scale(a, b, ctx)
        })
    }

    fn remainder(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.remainder(a, b, ctx))
    }

    fn remainder_near(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.remainder_near(a, b, ctx)
        })
    }

    fn round_to_precision(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.round_to_precision(v, ctx))
    }

    fn abs(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.abs(v, ctx))
    }

    fn negate(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.negate(v, ctx))
    }

    fn quantize(&self, value: &M::Value, target: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        if let Some(nan) = self.check_nan(&[value, target], ctx)? {
            return Ok(nan);
        }
        // Only the target's exponent matters, so it is never pre-rounded
        let mut signals = SignalSet::empty();
        let value = self.pre_round(value, ctx, &mut signals)?;
        let outcome = self.inner.quantize(&value, target, ctx)?;
        Ok(self.post_process(outcome, signals, ctx, PostProcess::PreserveExponent))
    }

    fn round_to_exponent_exact(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::PreserveExponent, |v| {
            self.inner.round_to_exponent_exact(v, exponent, ctx)
        })
    }

    fn round_to_exponent_simple(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::PreserveExponent, |v| {
            self.inner.round_to_exponent_simple(v, exponent, ctx)
        })
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::PreserveExponent, |v| {
            self.inner.round_to_exponent_no_rounded_flag(v, exponent, ctx)
        })
    }

    fn reduce(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::PreserveExponent, |v| self.inner.reduce(v, ctx))
    }

    fn next_plus(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.next_plus(v, ctx))
    }

    fn next_minus(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.next_minus(v, ctx))
    }

    fn next_toward(&self, value: &M::Value, target: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(value, target, ctx, PostProcess::Arithmetic, |v, t| {
            self.inner.next_toward(v, t, ctx)
        })
    }

    fn square_root(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.square_root(v, ctx))
    }

    fn ln(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.ln(v, ctx))
    }

    fn log10(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.log10(v, ctx))
    }

    fn exp(&self, value: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.unary(value, ctx, PostProcess::Arithmetic, |v| self.inner.exp(v, ctx))
    }

    fn power(&self, base: &M::Value, exponent: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(base, exponent, ctx, PostProcess::Arithmetic, |b, e| {
            self.inner.power(b, e, ctx)
        })
    }

    fn pi(&self, ctx: &PrecisionContext) -> MathResult<M::Value> {
        let outcome = self.inner.pi(ctx)?;
        Ok(self.post_process(outcome, SignalSet::empty(), ctx, PostProcess::Arithmetic))
    }

    fn max(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.max(a, b, ctx))
    }

    fn min(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| self.inner.min(a, b, ctx))
    }

    fn max_magnitude(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.max_magnitude(a, b, ctx)
        })
    }

    fn min_magnitude(&self, a: &M::Value, b: &M::Value, ctx: &PrecisionContext) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.min_magnitude(a, b, ctx)
        })
    }

    fn compare_to_with_context(
        &self,
        a: &M::Value,
        b: &M::Value,
        ctx: &PrecisionContext,
    ) -> MathResult<M::Value> {
        self.binary(a, b, ctx, PostProcess::Arithmetic, |a, b| {
            self.inner.compare_to_with_context(a, b, ctx)
        })
    }

    fn compare_to(&self, a: &M::Value, b: &M::Value) -> Ordering {
        self.inner.compare_to(a, b)
    }
}
