// ============================================================================
// Context Module
// Precision contexts, rounding modes and signals
// ============================================================================

mod precision;
mod rounding;
mod signals;

pub use precision::{resolve_context, unlimited_context, PrecisionContext};
pub use rounding::RoundingMode;
pub use signals::SignalSet;
