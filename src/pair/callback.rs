//! Swap callback hook.

use alloy_primitives::{Address, U256};

use crate::error::AmmError;
use crate::ledger::TokenSet;
use crate::pair::Pair;

/// Receiver hook invoked mid-swap, after output assets have been paid
/// out but before input payment is checked.
///
/// This is what makes flash swaps possible: the implementation may use
/// the borrowed output freely, as long as it deposits enough input (or
/// returns the output) before it returns. The pair re-reads its balances
/// afterwards and enforces the invariant; it also remains locked for the
/// whole call, so any attempt to re-enter a pool operation from inside
/// the hook fails with [`AmmError::Reentrant`] and the swap unwinds.
pub trait SwapCallback {
    /// Called once per swap that carries callback data.
    ///
    /// `amount0` and `amount1` are the output amounts already credited to
    /// `to`. Returning an error aborts the swap and rolls back all of its
    /// effects.
    ///
    /// # Errors
    ///
    /// Implementations propagate any [`AmmError`] to abort the swap.
    fn on_swap(
        &mut self,
        pair: &mut Pair,
        tokens: &mut TokenSet,
        to: Address,
        amount0: U256,
        amount1: U256,
        data: &[u8],
    ) -> Result<(), AmmError>;
}
