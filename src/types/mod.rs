// ============================================================================
// Types Module
// Concrete number types built on the arithmetic stack
// ============================================================================

/// Generates the context-taking arithmetic methods of a concrete type.
///
/// Every method resolves an absent context to the unlimited one and runs the
/// operation through `$stack`, a static three-layer stack for the type.
macro_rules! forward_arithmetic {
    (
        stack: $stack:ident;
        binary: [$($binary:ident),* $(,)?];
        unary: [$($unary:ident),* $(,)?];
        to_exponent: [$($to_exponent:ident),* $(,)?];
    ) => {
        $(
            #[doc = concat!("Runs `", stringify!($binary), "` with `other` as the second operand.")]
            pub fn $binary(
                &self,
                other: &Self,
                ctx: Option<&$crate::context::PrecisionContext>,
            ) -> $crate::numeric::MathResult<Self> {
                $crate::interfaces::RadixArithmetic::$binary(
                    &*$stack,
                    self,
                    other,
                    $crate::context::resolve_context(ctx),
                )
            }
        )*

        $(
            #[doc = concat!("Runs `", stringify!($unary), "` on this value.")]
            pub fn $unary(
                &self,
                ctx: Option<&$crate::context::PrecisionContext>,
            ) -> $crate::numeric::MathResult<Self> {
                $crate::interfaces::RadixArithmetic::$unary(
                    &*$stack,
                    self,
                    $crate::context::resolve_context(ctx),
                )
            }
        )*

        $(
            #[doc = concat!("Runs `", stringify!($to_exponent), "` toward the given exponent.")]
            pub fn $to_exponent(
                &self,
                exponent: impl Into<num_bigint::BigInt>,
                ctx: Option<&$crate::context::PrecisionContext>,
            ) -> $crate::numeric::MathResult<Self> {
                $crate::interfaces::RadixArithmetic::$to_exponent(
                    &*$stack,
                    self,
                    &exponent.into(),
                    $crate::context::resolve_context(ctx),
                )
            }
        )*

        /// Computes `self * multiplicand + augend` with a single rounding.
        pub fn multiply_and_add(
            &self,
            multiplicand: &Self,
            augend: &Self,
            ctx: Option<&$crate::context::PrecisionContext>,
        ) -> $crate::numeric::MathResult<Self> {
            $crate::interfaces::RadixArithmetic::multiply_and_add(
                &*$stack,
                self,
                multiplicand,
                augend,
                $crate::context::resolve_context(ctx),
            )
        }

        /// Divides by `divisor`, giving a result with exactly `exponent`.
        pub fn divide_to_exponent(
            &self,
            divisor: &Self,
            exponent: impl Into<num_bigint::BigInt>,
            ctx: Option<&$crate::context::PrecisionContext>,
        ) -> $crate::numeric::MathResult<Self> {
            $crate::interfaces::RadixArithmetic::divide_to_exponent(
                &*$stack,
                self,
                divisor,
                &exponent.into(),
                $crate::context::resolve_context(ctx),
            )
        }

        /// Pi rounded to the context. Needs a bounded precision.
        pub fn pi(ctx: Option<&$crate::context::PrecisionContext>) -> $crate::numeric::MathResult<Self> {
            $crate::interfaces::RadixArithmetic::pi(&*$stack, $crate::context::resolve_context(ctx))
        }

        /// Total numeric order: NaN above everything, -0 equal to +0.
        pub fn compare_to(&self, other: &Self) -> std::cmp::Ordering {
            $crate::interfaces::RadixArithmetic::compare_to(&*$stack, self, other)
        }
    };
}

mod binary_float;
mod decimal;

pub use binary_float::{BinaryFloat, BinaryFloatHelper};
pub use decimal::{Decimal, DecimalHelper};
pub use crate::numeric::SpecialFlags;
