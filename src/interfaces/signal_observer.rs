// ============================================================================
// Signal Observer Interface
// Receives the signals raised by operations of a trapping stack
// ============================================================================

use crate::context::SignalSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// Signals raised by one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalEvent {
    /// Operation name, e.g. "divide"
    pub operation: &'static str,
    /// Every signal raised
    pub signals: SignalSet,
    /// The signal that was trapped, if any
    pub trapped: Option<SignalSet>,
}

/// Observer of signal events.
/// Implementations can log, count or accumulate sticky flags.
pub trait SignalObserver: Send + Sync {
    fn on_signals(&self, event: &SignalEvent);
}

/// No-op observer
pub struct NoOpSignalObserver;

impl SignalObserver for NoOpSignalObserver {
    fn on_signals(&self, _event: &SignalEvent) {}
}

/// Logs every event that raised at least one signal
pub struct LoggingSignalObserver;

impl SignalObserver for LoggingSignalObserver {
    fn on_signals(&self, event: &SignalEvent) {
        if !event.signals.is_empty() {
            tracing::debug!(
                operation = event.operation,
                signals = %event.signals,
                trapped = ?event.trapped,
                "arithmetic signals raised"
            );
        }
    }
}

/// Accumulates sticky flags across operations, like a context's flag word.
#[derive(Debug, Default)]
pub struct SignalRecorder {
    bits: AtomicU32,
}

impl SignalRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every signal recorded since creation or the last `take`.
    pub fn recorded(&self) -> SignalSet {
        SignalSet::from_bits_truncate(self.bits.load(Ordering::Acquire))
    }

    /// Returns the recorded signals and clears them.
    pub fn take(&self) -> SignalSet {
        SignalSet::from_bits_truncate(self.bits.swap(0, Ordering::AcqRel))
    }
}

impl SignalObserver for SignalRecorder {
    fn on_signals(&self, event: &SignalEvent) {
        self.bits.fetch_or(event.signals.bits(), Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(signals: SignalSet) -> SignalEvent {
        SignalEvent {
            operation: "add",
            signals,
            trapped: None,
        }
    }

    #[test]
    fn test_noop_observer() {
        NoOpSignalObserver.on_signals(&event(SignalSet::INEXACT));
        LoggingSignalObserver.on_signals(&event(SignalSet::INEXACT));
        // Should not panic
    }

    #[test]
    fn test_recorder_is_sticky() {
        let recorder = SignalRecorder::new();
        recorder.on_signals(&event(SignalSet::INEXACT));
        recorder.on_signals(&event(SignalSet::empty()));
        recorder.on_signals(&event(SignalSet::CLAMPED));
        assert_eq!(recorder.recorded(), SignalSet::INEXACT | SignalSet::CLAMPED);
        assert_eq!(recorder.take(), SignalSet::INEXACT | SignalSet::CLAMPED);
        assert!(recorder.recorded().is_empty());
    }
}
