//! Fungible asset ledgers and signature-based approvals.

mod permit;
mod set;
mod token;

pub use permit::{address_of, sign_digest, EcdsaSignature};
pub use set::TokenSet;
pub use token::{LedgerConfig, TokenLedger};
