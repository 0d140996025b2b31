// ============================================================================
// Outcome
// A computed value together with the signals raised while computing it
// ============================================================================

use super::errors::MathError;
use crate::context::SignalSet;

/// Result of an arithmetic operation: the value and every signal it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub signals: SignalSet,
}

/// Result alias used by every operation of the arithmetic stack.
pub type MathResult<T> = Result<Outcome<T>, MathError<T>>;

impl<T> Outcome<T> {
    #[inline]
    pub fn new(value: T, signals: SignalSet) -> Self {
        Self { value, signals }
    }

    /// An outcome that raised no signals.
    #[inline]
    pub fn exact(value: T) -> Self {
        Self::new(value, SignalSet::empty())
    }

    /// Adds `signals` to the ones already raised.
    #[inline]
    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.signals |= signals;
        self
    }

    /// True if no signal at all was raised.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome::new(f(self.value), self.signals)
    }

    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }
}
