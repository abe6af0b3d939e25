//! Decimal rescaling between the canonical 18-decimal representation and the
//! bridged asset's native precision.
//!
//! Scaling down floors: the sub-unit remainder of a value rescaled to fewer
//! decimals is dropped and cannot be recovered. Scaling up multiplies and
//! fails with `AmountTooLarge` instead of wrapping.

use crate::error::{OutboxError, OutboxResult};
use crate::types::{CANONICAL_DECIMALS, U256};

/// `10^exp`, or `None` if it does not fit in 256 bits.
fn pow10(exp: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

/// Multiply `value` by `10^exp`, failing on any overflow.
fn scale_up(value: U256, exp: u8, decimals: u8) -> OutboxResult<U256> {
    pow10(exp)
        .and_then(|factor| value.checked_mul(factor))
        .ok_or(OutboxError::AmountTooLarge { value, decimals })
}

/// Floor-divide `value` by `10^exp`. A factor too wide for 256 bits exceeds
/// every value, so the quotient is zero.
fn scale_down(value: U256, exp: u8) -> U256 {
    match pow10(exp) {
        Some(factor) => value / factor,
        None => U256::ZERO,
    }
}

/// Convert an 18-decimal `value` into `native_decimals` precision.
///
/// - `native_decimals == 18`: identity
/// - `native_decimals < 18`: `value / 10^(18 - native_decimals)` (floor)
/// - `native_decimals > 18`: `value * 10^(native_decimals - 18)`, or
///   `AmountTooLarge` if that overflows
pub fn rescale(value: U256, native_decimals: u8) -> OutboxResult<U256> {
    match native_decimals.cmp(&CANONICAL_DECIMALS) {
        core::cmp::Ordering::Equal => Ok(value),
        core::cmp::Ordering::Less => Ok(scale_down(value, CANONICAL_DECIMALS - native_decimals)),
        core::cmp::Ordering::Greater => {
            scale_up(value, native_decimals - CANONICAL_DECIMALS, native_decimals)
        }
    }
}

/// Convert a native-precision `amount` back into 18 decimals.
///
/// The inverse direction of [`rescale`]: multiplies when the asset has fewer
/// than 18 decimals (checked) and floors when it has more.
pub fn to_canonical(amount: U256, native_decimals: u8) -> OutboxResult<U256> {
    match native_decimals.cmp(&CANONICAL_DECIMALS) {
        core::cmp::Ordering::Equal => Ok(amount),
        core::cmp::Ordering::Less => {
            scale_up(amount, CANONICAL_DECIMALS - native_decimals, native_decimals)
        }
        core::cmp::Ordering::Greater => Ok(scale_down(amount, native_decimals - CANONICAL_DECIMALS)),
    }
}
