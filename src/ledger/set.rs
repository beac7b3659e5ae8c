//! Lookup table of ledgers keyed by asset identity.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::error::AmmError;
use crate::ledger::token::TokenLedger;

/// The collection of all asset ledgers known to the system.
///
/// Pool operations receive a mutable `TokenSet` and resolve the ledgers
/// they touch by identity. Cloning the set snapshots every balance,
/// allowance, and pending event, which is what lets a failed pool
/// operation roll the world back wholesale.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    ledgers: HashMap<Address, TokenLedger>,
}

impl TokenSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a ledger under its own identity, replacing any previous
    /// ledger with the same identity.
    pub fn insert(&mut self, ledger: TokenLedger) {
        self.ledgers.insert(ledger.id(), ledger);
    }

    /// Whether a ledger with this identity is registered.
    #[must_use]
    pub fn contains(&self, id: Address) -> bool {
        self.ledgers.contains_key(&id)
    }

    /// Resolves a ledger for reading.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownAsset`] if no ledger carries this
    /// identity.
    pub fn get(&self, id: Address) -> Result<&TokenLedger, AmmError> {
        self.ledgers.get(&id).ok_or(AmmError::UnknownAsset(id))
    }

    /// Resolves a ledger for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownAsset`] if no ledger carries this
    /// identity.
    pub fn get_mut(&mut self, id: Address) -> Result<&mut TokenLedger, AmmError> {
        self.ledgers.get_mut(&id).ok_or(AmmError::UnknownAsset(id))
    }
}
