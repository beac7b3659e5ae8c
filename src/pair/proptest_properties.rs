//! Property-based checks for the pool engine.

#![allow(clippy::panic)]

use alloy_primitives::{Address, U256};
use proptest::prelude::*;

use crate::error::AmmError;
use crate::ledger::{LedgerConfig, TokenLedger, TokenSet};
use crate::pair::Pair;
use crate::registry::Registry;

const NOW: u64 = 1_000;

fn trader() -> Address {
    Address::repeat_byte(0xAB)
}

fn world(reserve0: u64, reserve1: u64) -> (Registry, TokenSet, Pair) {
    let mut registry = Registry::new(Address::repeat_byte(0xEE), 1);
    let token0 = Address::repeat_byte(1);
    let token1 = Address::repeat_byte(2);
    let mut tokens = TokenSet::new();
    for id in [token0, token1] {
        let mut ledger = TokenLedger::new(
            id,
            LedgerConfig {
                name: "Prop".to_string(),
                symbol: "PRP".to_string(),
                decimals: 18,
                chain_id: 1,
            },
        );
        let Ok(()) = ledger.mint(trader(), U256::MAX >> 8) else {
            panic!("expected Ok");
        };
        tokens.insert(ledger);
    }
    let Ok(mut pair) = registry.create_pair(token0, token1) else {
        panic!("expected Ok");
    };
    for (id, amount) in [(token0, reserve0), (token1, reserve1)] {
        let Ok(ledger) = tokens.get_mut(id) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger.transfer(trader(), pair.id(), U256::from(amount)) else {
            panic!("expected Ok");
        };
    }
    let Ok(_) = pair.mint(&mut tokens, &registry, trader(), NOW) else {
        panic!("expected Ok");
    };
    (registry, tokens, pair)
}

/// Largest token1 output the fee-adjusted invariant admits for a given
/// token0 input.
fn quote_out(amount_in: u64, reserve_in: u64, reserve_out: u64) -> U256 {
    let amount_in = U256::from(amount_in);
    let reserve_in = U256::from(reserve_in);
    let reserve_out = U256::from(reserve_out);
    let with_fee = amount_in * U256::from(997u64);
    (with_fee * reserve_out) / (reserve_in * U256::from(1000u64) + with_fee)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn quoted_output_always_clears_the_invariant(
        reserve0 in 10_000u64..1_000_000_000,
        reserve1 in 10_000u64..1_000_000_000,
        amount_in in 1u64..100_000_000,
    ) {
        let out = quote_out(amount_in, reserve0, reserve1);
        prop_assume!(!out.is_zero());
        let (_, mut tokens, mut pair) = world(reserve0, reserve1);
        let Ok(ledger0) = tokens.get_mut(pair.token0()) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger0.transfer(trader(), pair.id(), U256::from(amount_in)) else {
            panic!("expected Ok");
        };
        prop_assert_eq!(
            pair.swap(&mut tokens, U256::ZERO, out, trader(), &[], None, NOW),
            Ok(())
        );
    }

    #[test]
    fn one_more_than_the_quote_is_rejected(
        reserve0 in 10_000u64..1_000_000_000,
        reserve1 in 10_000u64..1_000_000_000,
        amount_in in 1u64..100_000_000,
    ) {
        let out = quote_out(amount_in, reserve0, reserve1) + U256::from(1u64);
        prop_assume!(out < U256::from(reserve1));
        let (_, mut tokens, mut pair) = world(reserve0, reserve1);
        let Ok(ledger0) = tokens.get_mut(pair.token0()) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger0.transfer(trader(), pair.id(), U256::from(amount_in)) else {
            panic!("expected Ok");
        };
        prop_assert_eq!(
            pair.swap(&mut tokens, U256::ZERO, out, trader(), &[], None, NOW),
            Err(AmmError::InvariantViolation)
        );
    }

    #[test]
    fn successful_swaps_never_shrink_k(
        reserve0 in 10_000u64..1_000_000_000,
        reserve1 in 10_000u64..1_000_000_000,
        amount_in in 1u64..100_000_000,
    ) {
        let out = quote_out(amount_in, reserve0, reserve1);
        prop_assume!(!out.is_zero());
        let (_, mut tokens, mut pair) = world(reserve0, reserve1);
        let k_before = pair.reserves().0 * pair.reserves().1;
        let Ok(ledger0) = tokens.get_mut(pair.token0()) else {
            panic!("expected Ok");
        };
        let Ok(()) = ledger0.transfer(trader(), pair.id(), U256::from(amount_in)) else {
            panic!("expected Ok");
        };
        let Ok(()) = pair.swap(&mut tokens, U256::ZERO, out, trader(), &[], None, NOW) else {
            panic!("expected Ok");
        };
        let k_after = pair.reserves().0 * pair.reserves().1;
        prop_assert!(k_after >= k_before);
    }

    #[test]
    fn burning_all_shares_never_pays_out_more_than_deposited(
        reserve0 in 10_000u64..1_000_000_000,
        reserve1 in 10_000u64..1_000_000_000,
    ) {
        let (registry, mut tokens, mut pair) = world(reserve0, reserve1);
        let liquidity = pair.balance_of(trader());
        let Ok(()) = pair.transfer(trader(), pair.id(), liquidity) else {
            panic!("expected Ok");
        };
        let Ok((amount0, amount1)) = pair.burn(&mut tokens, &registry, trader(), NOW) else {
            panic!("expected Ok");
        };
        prop_assert!(amount0 <= U256::from(reserve0));
        prop_assert!(amount1 <= U256::from(reserve1));
        // The locked floor keeps the pool alive.
        prop_assert!(!pair.reserves().0.is_zero());
        prop_assert!(!pair.reserves().1.is_zero());
    }

    #[test]
    fn failed_swaps_leave_no_trace(
        reserve0 in 10_000u64..1_000_000_000,
        reserve1 in 10_000u64..1_000_000_000,
        amount_out in 1u64..1_000_000_000,
    ) {
        prop_assume!(U256::from(amount_out) < U256::from(reserve1));
        let (_, mut tokens, mut pair) = world(reserve0, reserve1);
        let Ok(ledger1) = tokens.get(pair.token1()) else {
            panic!("expected Ok");
        };
        let trader_before = ledger1.balance_of(trader());
        // No input was deposited, so every output request must fail.
        let result = pair.swap(
            &mut tokens,
            U256::ZERO,
            U256::from(amount_out),
            trader(),
            &[],
            None,
            NOW,
        );
        prop_assert!(result.is_err());
        prop_assert_eq!(pair.reserves().0, U256::from(reserve0));
        prop_assert_eq!(pair.reserves().1, U256::from(reserve1));
        let Ok(ledger1) = tokens.get(pair.token1()) else {
            panic!("expected Ok");
        };
        prop_assert_eq!(ledger1.balance_of(trader()), trader_before);
    }
}
