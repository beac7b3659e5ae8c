//! Convenience re-exports for common types.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use pairswap::prelude::*;
//! ```

pub use crate::domain::TokenPair;
pub use crate::error::{AmmError, Result};
pub use crate::events::Event;
pub use crate::ledger::{EcdsaSignature, LedgerConfig, TokenLedger, TokenSet};
pub use crate::pair::{Pair, SwapCallback, MINIMUM_LIQUIDITY};
pub use crate::registry::Registry;
