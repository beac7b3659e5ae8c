//! Constant-product pools.

mod callback;
mod engine;

#[cfg(test)]
mod proptest_properties;

pub use callback::SwapCallback;
pub use engine::{Pair, MINIMUM_LIQUIDITY, RESERVE_LIMIT};
