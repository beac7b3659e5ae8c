//! Integer arithmetic helpers for reserve and share math.
//!
//! All pool math runs on [`U256`] with checked operations; the helpers
//! here cover the two pieces the standard operators do not: integer
//! square roots for share minting and Q112 fixed-point fractions for the
//! cumulative price counters.

mod uq112;

pub use uq112::encode_ratio;

use alloy_primitives::U256;

/// Integer square root via Newton's method, rounded down.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use pairswap::math::isqrt;
///
/// assert_eq!(isqrt(U256::from(0)), U256::from(0));
/// assert_eq!(isqrt(U256::from(99)), U256::from(9));
/// assert_eq!(isqrt(U256::from(100)), U256::from(10));
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    if n < U256::from(4) {
        return U256::from(1);
    }
    // Seeding with n/2 + 1 cannot wrap, unlike (n + 1)/2.
    let mut x = n;
    let mut y = (n >> 1) + U256::from(1);
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isqrt_zero_and_one() {
        assert_eq!(isqrt(U256::ZERO), U256::ZERO);
        assert_eq!(isqrt(U256::from(1)), U256::from(1));
    }

    #[test]
    fn isqrt_perfect_squares() {
        for v in [2u64, 3, 4, 12, 100, 65_536] {
            assert_eq!(isqrt(U256::from(v) * U256::from(v)), U256::from(v));
        }
    }

    #[test]
    fn isqrt_rounds_down() {
        assert_eq!(isqrt(U256::from(2)), U256::from(1));
        assert_eq!(isqrt(U256::from(3)), U256::from(1));
        assert_eq!(isqrt(U256::from(8)), U256::from(2));
        assert_eq!(isqrt(U256::from(99)), U256::from(9));
    }

    #[test]
    fn isqrt_of_18_decimal_product() {
        // sqrt(1e18 * 4e18) = 2e18
        let one = U256::from(10).pow(U256::from(18));
        let four = one * U256::from(4);
        assert_eq!(isqrt(one * four), U256::from(2) * one);
    }

    #[test]
    fn isqrt_handles_max() {
        // sqrt(2^256 - 1) = 2^128 - 1
        let expected = (U256::from(1) << 128) - U256::from(1);
        assert_eq!(isqrt(U256::MAX), expected);
    }

    #[test]
    fn isqrt_near_the_top_of_the_range() {
        // The seed must not wrap for inputs with the high bit set.
        for n in [U256::MAX, U256::MAX - U256::from(1), U256::from(1) << 255] {
            let root = isqrt(n);
            assert!(root * root <= n);
            let next = root + U256::from(1);
            assert!(next.checked_mul(next).is_none_or(|square| square > n));
        }
    }
}
