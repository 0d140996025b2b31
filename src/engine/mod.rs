// ============================================================================
// Engine Module
// The radix-independent arithmetic engine and its wrapping layers
// ============================================================================

mod division;
mod exponent_ops;
mod radix_math;
mod rounding;
mod simple;
mod transcendental;
mod trappable;

pub mod factory;

pub use factory::{create_raw_stack, create_stack, RadixMathBuilder, RadixStack, RawStack};
pub use radix_math::RadixMath;
pub use simple::SimpleRadixMath;
pub use trappable::TrappableRadixMath;
