//! Observability events emitted by ledgers, the registry, and pairs.
//!
//! Events are a notification surface for external observers (indexers,
//! dashboards); core correctness never depends on them. Each component
//! appends to its own log, which consumers drain with `take_events`.
//! Within a single pair operation the order is stable: share-ledger
//! transfers first, then `Sync`, then the operation's own event.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A semantic notification recorded by a core component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new pair was registered. `index` is its position in the
    /// registry's creation-ordered list.
    PairCreated {
        token0: Address,
        token1: Address,
        pair: Address,
        index: u64,
    },

    /// Units moved between accounts on a ledger. Mints carry the null
    /// identity as `from`; burns carry it as `to`.
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },

    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },

    /// Liquidity shares were minted against a deposit.
    Mint {
        to: Address,
        amount0: U256,
        amount1: U256,
    },

    /// Liquidity shares were redeemed for reserves.
    Burn {
        to: Address,
        amount0: U256,
        amount1: U256,
    },

    /// A swap settled against the pair.
    Swap {
        to: Address,
        amount0_in: U256,
        amount1_in: U256,
        amount0_out: U256,
        amount1_out: U256,
    },

    /// Tracked reserves were settled to actual balances.
    Sync { reserve0: U256, reserve1: U256 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_comparable() {
        let a = Event::Sync {
            reserve0: U256::from(1),
            reserve1: U256::from(2),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn debug_format_names_the_variant() {
        let e = Event::Transfer {
            from: Address::ZERO,
            to: Address::repeat_byte(1),
            value: U256::from(5),
        };
        let dbg = format!("{e:?}");
        assert!(dbg.contains("Transfer"));
    }
}
