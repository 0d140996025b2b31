// ============================================================================
// Numeric Module
// Shared building blocks for radix-independent arithmetic
// ============================================================================
//
// This module provides:
// - ContractError / TrapError / MathError: failure taxonomy of every operation
// - Outcome<T>: a computed value paired with the signals it raised
// - SpecialFlags: sign, infinity and NaN markers carried by every value
// - digit counting and radix powers used by the accumulators and the engine
//
// Design principles:
// - Values are immutable; every operation builds a new one
// - Signals travel with results instead of being written into a context
// - All fallible paths return Result (no panics)

mod digits;
mod errors;
mod outcome;
mod special_flags;

pub use digits::{digit_count, multiply_by_radix_power, radix_power, MAX_RADIX_POWER};
pub use errors::{ContractError, ConversionError, MathError, ParseNumberError, TrapError};
pub use outcome::{MathResult, Outcome};
pub use special_flags::SpecialFlags;
