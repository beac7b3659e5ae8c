//! Fundamental domain value types used throughout the core.
//!
//! Identities and asset identifiers are 20-byte [`Address`] values; their
//! built-in lexicographic byte ordering is the total, stable ordering the
//! registry uses to canonicalize pairs. Amounts, balances, and liquidity
//! are raw [`U256`] values in the asset's smallest unit.

mod token_pair;

pub use token_pair::TokenPair;

pub use alloy_primitives::{Address, B256, U256};
