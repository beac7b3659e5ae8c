//! Unified error types for the pairswap core.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Every failure is local, synchronous, and non-retryable by
//! the core itself; any retry policy belongs to the caller. An operation
//! that fails leaves all state exactly as it was before the call.

use alloy_primitives::Address;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// The unified error enum for ledgers, the registry, and the pair engine.
///
/// Variants group into input validation, authorization, accounting,
/// invariant, and concurrency failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmmError {
    /// A pair requires two distinct asset identifiers.
    #[error("identical assets supplied for a pair")]
    IdenticalAssets,

    /// The null identity is not a valid asset identifier.
    #[error("the null identity is not a valid asset")]
    ZeroAddress,

    /// A swap recipient may not be one of the pair's traded assets.
    #[error("recipient may not be a traded asset of the pair")]
    InvalidRecipient,

    /// No ledger is registered for the given asset identifier.
    #[error("no ledger registered for asset {0}")]
    UnknownAsset(Address),

    /// A pair for this unordered asset combination already exists.
    #[error("a pair for this asset combination already exists")]
    PairExists,

    /// The caller does not hold the required governance authority.
    #[error("caller is not the fee setter")]
    Forbidden,

    /// Signature recovery failed or recovered a different signer.
    #[error("signature does not recover to the stated owner")]
    InvalidSignature,

    /// The permit deadline lies in the past.
    #[error("permit deadline has passed")]
    ExpiredDeadline,

    /// A transfer or burn exceeds the sender's balance.
    #[error("amount exceeds sender balance")]
    InsufficientBalance,

    /// A delegated transfer exceeds the spender's allowance.
    #[error("spender allowance is smaller than the transfer amount")]
    InsufficientAllowance,

    /// A requested swap output exceeds the available reserve.
    #[error("requested output exceeds available reserves")]
    InsufficientLiquidity,

    /// A deposit too small to mint any liquidity shares.
    #[error("deposit too small to mint liquidity shares")]
    InsufficientLiquidityMinted,

    /// A share redemption that would pay out nothing on either side.
    #[error("share redemption would pay out nothing")]
    InsufficientLiquidityBurned,

    /// The first deposit does not cover the minimum liquidity lock.
    #[error("initial deposit does not cover the minimum liquidity lock")]
    InsufficientInitialLiquidity,

    /// A swap that requests no output at all.
    #[error("swap requested no output")]
    InsufficientOutputAmount,

    /// A swap that supplied no input at all.
    #[error("swap received no input")]
    InsufficientInputAmount,

    /// The fee-adjusted reserve product fell below the pre-trade product.
    #[error("constant-product invariant violated after fees")]
    InvariantViolation,

    /// Checked arithmetic overflowed or underflowed; the operation fails
    /// closed instead of wrapping.
    #[error("arithmetic overflow or underflow")]
    ArithmeticOverflow,

    /// A reentrant call reached a pair that is already mid-operation.
    #[error("reentrant call on a locked pair")]
    Reentrant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        let msg = format!("{}", AmmError::InvariantViolation);
        assert!(msg.contains("invariant"));
    }

    #[test]
    fn unknown_asset_names_the_address() {
        let addr = Address::repeat_byte(0xab);
        let msg = format!("{}", AmmError::UnknownAsset(addr));
        // Display renders checksummed mixed-case hex.
        assert!(msg.contains(&addr.to_string()));
        assert!(msg.to_lowercase().contains("0xabab"));
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(AmmError::Reentrant, AmmError::Reentrant);
        assert_ne!(AmmError::Reentrant, AmmError::Forbidden);
    }
}
