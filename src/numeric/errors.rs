// ============================================================================
// Numeric Errors
// Hard failures, trapped signals and conversion errors
// ============================================================================

use crate::context::{PrecisionContext, SignalSet};
use num_bigint::BigInt;
use std::fmt;
use thiserror::Error;

/// Failures that no context setting can downgrade to a signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// `RoundingMode::Unnecessary` was requested but digits had to be discarded
    #[error("rounding necessary: the result cannot be represented exactly")]
    RoundingNecessary,

    /// A quotient under unlimited precision never terminates in this radix
    #[error("non-terminating expansion: the quotient has no exact representation")]
    NonTerminatingExpansion,

    /// The operation needs something the context does not provide
    #[error("{operation} requires {requirement}")]
    InvalidContext {
        operation: &'static str,
        requirement: &'static str,
    },

    /// The number type supports finite values only, but NaN or infinity was produced
    #[error("result is not finite and the number type supports finite values only")]
    NonFiniteResult,

    /// A radix power too large to materialize as an integer
    #[error("radix power {0} is too large to materialize")]
    ExponentTooLarge(BigInt),
}

/// A signal raised by an operation whose context traps it.
///
/// Carries the result the untrapped operation would have produced, so callers
/// can still inspect or recover it.
#[derive(Debug, Clone, Error)]
#[error("trapped signal {signal:?} (raised {signals:?})")]
pub struct TrapError<T: fmt::Debug> {
    /// The single signal reported, chosen by trap priority
    pub signal: SignalSet,
    /// Every signal the operation raised
    pub signals: SignalSet,
    /// The caller's context
    pub context: PrecisionContext,
    /// The untrapped result
    pub result: T,
}

/// Error type returned by every arithmetic operation.
#[derive(Debug, Clone, Error)]
pub enum MathError<T: fmt::Debug> {
    /// Contract violation, never downgraded to a signal
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Trapped signal
    #[error("{0}")]
    Trap(Box<TrapError<T>>),
}

impl<T: fmt::Debug> MathError<T> {
    /// The trap details, if this error came from a trapped signal.
    pub fn as_trap(&self) -> Option<&TrapError<T>> {
        match self {
            MathError::Trap(trap) => Some(trap),
            MathError::Contract(_) => None,
        }
    }

    /// The contract violation, if this error is one.
    pub fn as_contract(&self) -> Option<&ContractError> {
        match self {
            MathError::Contract(err) => Some(err),
            MathError::Trap(_) => None,
        }
    }
}

/// Errors produced when parsing numeric text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseNumberError {
    /// Input was empty or whitespace
    #[error("empty numeric string")]
    Empty,
    /// Unexpected character in the input
    #[error("invalid character {0:?} in numeric string")]
    InvalidCharacter(char),
    /// No coefficient digits were found
    #[error("numeric string has no digits")]
    MissingDigits,
    /// The exponent part is malformed
    #[error("malformed exponent in numeric string")]
    InvalidExponent,
}

/// Errors converting between this crate's numbers and other numeric types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// NaN or infinity has no counterpart in the target type
    #[error("value is not finite")]
    NotFinite,
    /// The value does not fit the target type without rounding
    #[error("value is out of range for the target type")]
    OutOfRange,
}
