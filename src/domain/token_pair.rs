//! Canonically ordered pair of distinct asset identifiers.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// An unordered pair of distinct, non-null assets in canonical form.
///
/// Construction sorts the two identifiers so that `token0 < token1`
/// under the lexicographic byte ordering. This is load-bearing: `(A, B)`
/// and `(B, A)` canonicalize to the same value, so the registry can hold
/// at most one pair per unordered combination and lookups succeed with
/// either argument order.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use pairswap::domain::TokenPair;
///
/// let a = Address::repeat_byte(1);
/// let b = Address::repeat_byte(2);
///
/// // Order is enforced automatically:
/// let pair = TokenPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.token0(), a);
/// assert_eq!(pair.token1(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token0: Address,
    token1: Address,
}

impl TokenPair {
    /// Creates a new canonically-ordered `TokenPair`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAssets`] if both identifiers are equal.
    /// - [`AmmError::ZeroAddress`] if either identifier is null.
    pub fn new(token_a: Address, token_b: Address) -> Result<Self, AmmError> {
        if token_a == token_b {
            return Err(AmmError::IdenticalAssets);
        }
        if token_a == Address::ZERO || token_b == Address::ZERO {
            return Err(AmmError::ZeroAddress);
        }

        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        Ok(Self { token0, token1 })
    }

    /// Returns the lower-ordered asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-ordered asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if the given asset is part of this pair.
    #[must_use]
    pub fn contains(&self, asset: Address) -> bool {
        self.token0 == asset || self.token1 == asset
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn preserves_already_sorted_input() {
        let Ok(pair) = TokenPair::new(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.token0(), addr(1));
        assert_eq!(pair.token1(), addr(2));
    }

    #[test]
    fn sorts_reversed_input() {
        let Ok(pair) = TokenPair::new(addr(2), addr(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(pair.token0(), addr(1));
        assert_eq!(pair.token1(), addr(2));
    }

    #[test]
    fn both_orders_are_equal() {
        let (Ok(p1), Ok(p2)) = (TokenPair::new(addr(1), addr(2)), TokenPair::new(addr(2), addr(1)))
        else {
            panic!("expected Ok");
        };
        assert_eq!(p1, p2);
    }

    #[test]
    fn rejects_identical_assets() {
        assert_eq!(
            TokenPair::new(addr(7), addr(7)),
            Err(AmmError::IdenticalAssets)
        );
    }

    #[test]
    fn rejects_null_identifier() {
        assert_eq!(
            TokenPair::new(Address::ZERO, addr(1)),
            Err(AmmError::ZeroAddress)
        );
        assert_eq!(
            TokenPair::new(addr(1), Address::ZERO),
            Err(AmmError::ZeroAddress)
        );
    }

    #[test]
    fn contains_both_members() {
        let Ok(pair) = TokenPair::new(addr(1), addr(2)) else {
            panic!("expected Ok");
        };
        assert!(pair.contains(addr(1)));
        assert!(pair.contains(addr(2)));
        assert!(!pair.contains(addr(3)));
    }
}
