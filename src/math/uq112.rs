//! Q112 fixed-point ratios for the cumulative price counters.
//!
//! A ratio of two reserves is encoded as a binary fixed-point number with
//! 112 fractional bits, the resolution the 112-bit reserve range calls
//! for. Cumulative price counters accumulate these ratios with wrapping
//! arithmetic: oracles consume counter *differences*, so modular
//! wraparound is the documented contract there, unlike everywhere else
//! in the crate.

use alloy_primitives::U256;

/// Number of fractional bits in the encoding.
pub const FRACTION_BITS: usize = 112;

/// Encodes `numerator / denominator` as a Q112 fixed-point value.
///
/// Returns `None` if the denominator is zero. The numerator must fit the
/// 112-bit reserve range; the pair engine guarantees this by capping
/// reserves before they reach the price counters.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use pairswap::math::encode_ratio;
///
/// let ratio = encode_ratio(U256::from(4), U256::from(1)).expect("non-zero");
/// assert_eq!(ratio, U256::from(4) << 112);
/// ```
#[must_use]
pub fn encode_ratio(numerator: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    Some((numerator << FRACTION_BITS) / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_ratio() {
        let Some(r) = encode_ratio(U256::from(3), U256::from(1)) else {
            panic!("expected Some");
        };
        assert_eq!(r, U256::from(3) << FRACTION_BITS);
    }

    #[test]
    fn fractional_ratio() {
        // 1/2 in Q112 is 2^111.
        let Some(r) = encode_ratio(U256::from(1), U256::from(2)) else {
            panic!("expected Some");
        };
        assert_eq!(r, U256::from(1) << (FRACTION_BITS - 1));
    }

    #[test]
    fn zero_numerator() {
        assert_eq!(
            encode_ratio(U256::ZERO, U256::from(7)),
            Some(U256::ZERO)
        );
    }

    #[test]
    fn zero_denominator_is_none() {
        assert_eq!(encode_ratio(U256::from(1), U256::ZERO), None);
    }

    #[test]
    fn ratio_rounds_down() {
        // 1/3 * 3 in Q112 loses the trailing remainder.
        let Some(third) = encode_ratio(U256::from(1), U256::from(3)) else {
            panic!("expected Some");
        };
        assert!(third * U256::from(3) < U256::from(1) << FRACTION_BITS);
    }
}
