// ============================================================================
// Digits
// Digit counting and radix powers over big integers
// ============================================================================

use super::errors::ContractError;
use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, ToPrimitive, Zero};
use parking_lot::RwLock;
use std::sync::LazyLock;

/// Largest radix power this crate will materialize.
pub const MAX_RADIX_POWER: u64 = u32::MAX as u64;

/// Decimal powers below this are cached.
const CACHED_DECIMAL_POWERS: u64 = 512;

static DECIMAL_POWERS: LazyLock<RwLock<Vec<BigInt>>> =
    LazyLock::new(|| RwLock::new(vec![BigInt::one()]));

fn cached_decimal_power(power: u64) -> BigInt {
    let index = power as usize;
    if let Some(value) = DECIMAL_POWERS.read().get(index) {
        return value.clone();
    }
    let mut powers = DECIMAL_POWERS.write();
    while powers.len() <= index {
        let next = powers[powers.len() - 1].clone() * 10u32;
        powers.push(next);
    }
    powers[index].clone()
}

/// `radix^power` as a big integer.
pub fn radix_power(radix: u32, power: u64) -> Result<BigInt, ContractError> {
    if power > MAX_RADIX_POWER {
        return Err(ContractError::ExponentTooLarge(BigInt::from(power)));
    }
    Ok(match radix {
        2 => BigInt::one() << power,
        10 if power < CACHED_DECIMAL_POWERS => cached_decimal_power(power),
        _ => Pow::pow(BigInt::from(radix), power as u32),
    })
}

/// `magnitude * radix^power` for a non-negative `power`.
pub fn multiply_by_radix_power(
    magnitude: &BigInt,
    radix: u32,
    power: &BigInt,
) -> Result<BigInt, ContractError> {
    if magnitude.is_zero() || power.is_zero() {
        return Ok(magnitude.clone());
    }
    let shift = power
        .to_u64()
        .ok_or_else(|| ContractError::ExponentTooLarge(power.clone()))?;
    if radix == 2 {
        if shift > MAX_RADIX_POWER {
            return Err(ContractError::ExponentTooLarge(power.clone()));
        }
        return Ok(magnitude << shift);
    }
    Ok(magnitude * radix_power(radix, shift)?)
}

/// Number of radix digits in `magnitude`. Zero has one digit.
pub fn digit_count(magnitude: &BigInt, radix: u32) -> u64 {
    if magnitude.is_zero() {
        return 1;
    }
    let bits = magnitude.bits();
    if radix == 2 {
        return bits;
    }
    if let Some(small) = magnitude.abs().to_u64() {
        let mut count = 0;
        let mut rest = small;
        while rest > 0 {
            rest /= radix as u64;
            count += 1;
        }
        return count;
    }

    // bits - 1 <= log2(magnitude) < bits, so the estimate is off by at most one
    let per_bit = std::f64::consts::LN_2 / (radix as f64).ln();
    let mut estimate = (((bits - 1) as f64) * per_bit).floor() as u64 + 1;
    let magnitude = magnitude.abs();
    while radix_power(radix, estimate).map_or(false, |p| p <= magnitude) {
        estimate += 1;
    }
    while estimate > 1
        && radix_power(radix, estimate - 1).map_or(false, |p| p > magnitude)
    {
        estimate -= 1;
    }
    estimate
}
