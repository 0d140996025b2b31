// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod radix_arithmetic;
mod radix_helper;
mod signal_observer;

pub use radix_arithmetic::RadixArithmetic;
pub use radix_helper::{ArithmeticSupport, RadixMathHelper};
pub use signal_observer::{
    LoggingSignalObserver, NoOpSignalObserver, SignalEvent, SignalObserver, SignalRecorder,
};
