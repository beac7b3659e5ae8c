//! # Pairswap
//!
//! Constant-product market maker engine: asset ledgers, a pair factory,
//! and pools that price swaps against the invariant `x * y = k`.
//!
//! The crate models the whole system in memory. Assets live in
//! [`TokenLedger`](ledger::TokenLedger)s collected into a
//! [`TokenSet`](ledger::TokenSet); a [`Registry`](registry::Registry)
//! creates one [`Pair`](pair::Pair) per unordered asset pair at a
//! deterministic identity; each pair owns the ledger for its own
//! liquidity shares, including signature-based allowance grants.
//!
//! # Quick Start
//!
//! ```rust
//! use alloy_primitives::{Address, U256};
//! use pairswap::prelude::*;
//!
//! fn demo() -> Result<()> {
//!     let admin = Address::repeat_byte(0xEE);
//!     let lp = Address::repeat_byte(0xAB);
//!     let now = 1_700_000_000;
//!
//!     // 1. Register two asset ledgers and fund a liquidity provider.
//!     let mut tokens = TokenSet::new();
//!     for (id, name, symbol) in [
//!         (Address::repeat_byte(1), "Asset A", "AAA"),
//!         (Address::repeat_byte(2), "Asset B", "BBB"),
//!     ] {
//!         let mut ledger = TokenLedger::new(
//!             id,
//!             LedgerConfig {
//!                 name: name.to_string(),
//!                 symbol: symbol.to_string(),
//!                 decimals: 18,
//!                 chain_id: 1,
//!             },
//!         );
//!         ledger.mint(lp, U256::from(10_000_000u64))?;
//!         tokens.insert(ledger);
//!     }
//!
//!     // 2. Create the pair.
//!     let mut registry = Registry::new(admin, 1);
//!     let mut pair = registry.create_pair(
//!         Address::repeat_byte(1),
//!         Address::repeat_byte(2),
//!     )?;
//!
//!     // 3. Deposit both assets and mint liquidity shares.
//!     for id in [pair.token0(), pair.token1()] {
//!         tokens.get_mut(id)?.transfer(lp, pair.id(), U256::from(1_000_000u64))?;
//!     }
//!     let shares = pair.mint(&mut tokens, &registry, lp, now)?;
//!     assert!(!shares.is_zero());
//!
//!     // 4. Swap: pay in token0, take the quoted token1 output.
//!     tokens.get_mut(pair.token0())?.transfer(lp, pair.id(), U256::from(1_000u64))?;
//!     pair.swap(&mut tokens, U256::ZERO, U256::from(996u64), lp, &[], None, now)?;
//!     Ok(())
//! }
//! # demo().unwrap();
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Consumer   │  holds the Registry, TokenSet, and Pairs
//! └──────┬──────┘
//!        │ create_pair(a, b)
//!        ▼
//! ┌─────────────┐
//! │   Registry   │  canonical ordering, deterministic identities, fee roles
//! └──────┬──────┘
//!        │ Pair
//!        ▼
//! ┌─────────────┐
//! │    Pair      │  mint / burn / swap / sync / skim, share ledger, oracle
//! └──────┬──────┘
//!        │ transfers via &mut TokenSet
//!        ▼
//! ┌─────────────┐
//! │   Ledgers    │  balances, allowances, permits, event logs
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Canonical value types: [`TokenPair`](domain::TokenPair) ordering and validation |
//! | [`ledger`] | Fungible asset ledgers, [`TokenSet`](ledger::TokenSet), typed-digest permits |
//! | [`registry`] | [`Registry`](registry::Registry): pair creation and protocol-fee switches |
//! | [`pair`] | [`Pair`](pair::Pair) pool engine and the [`SwapCallback`](pair::SwapCallback) flash-swap hook |
//! | [`math`] | Integer square root and Q112 fixed-point ratios |
//! | [`events`] | [`Event`](events::Event) records appended by every mutation |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types |

pub mod domain;
pub mod error;
pub mod events;
pub mod ledger;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod registry;
