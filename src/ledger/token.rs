//! In-memory fungible asset ledger.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::AmmError;
use crate::events::Event;
use crate::ledger::permit::{
    domain_separator, permit_struct_hash, recover_signer, typed_digest, EcdsaSignature,
};

/// Static metadata for one ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Human-readable asset name, signed into the permit domain.
    pub name: String,
    /// Short ticker symbol.
    pub symbol: String,
    /// Display decimals.
    pub decimals: u8,
    /// Chain identifier bound into the permit domain.
    pub chain_id: u64,
}

/// A fungible asset ledger with balances, allowances, and signature
/// based approvals.
///
/// Each ledger tracks one asset. Balances and allowances are plain maps
/// keyed by 20-byte identities; a missing entry reads as zero. Every
/// mutation appends to an internal event log that callers drain with
/// [`TokenLedger::take_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    id: Address,
    config: LedgerConfig,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, u64>,
    domain_separator: B256,
    events: Vec<Event>,
}

impl TokenLedger {
    /// Creates an empty ledger with the given identity and metadata.
    #[must_use]
    pub fn new(id: Address, config: LedgerConfig) -> Self {
        let domain_separator = domain_separator(&config.name, config.chain_id, id);
        Self {
            id,
            config,
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            nonces: HashMap::new(),
            domain_separator,
            events: Vec::new(),
        }
    }

    /// The ledger's own 20-byte identity.
    #[must_use]
    pub const fn id(&self) -> Address {
        self.id
    }

    /// Asset metadata.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Total number of units in circulation.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance held by `owner`; zero when unknown.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    /// Remaining allowance granted by `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Next unused permit nonce for `owner`.
    #[must_use]
    pub fn nonce_of(&self, owner: Address) -> u64 {
        self.nonces.get(&owner).copied().unwrap_or(0)
    }

    /// Domain separator baked into every permit digest for this ledger.
    #[must_use]
    pub const fn domain_separator(&self) -> B256 {
        self.domain_separator
    }

    /// Drains and returns the accumulated event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Creates `value` new units credited to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if the supply would
    /// exceed the 256-bit range.
    pub fn mint(&mut self, to: Address, value: U256) -> Result<(), AmmError> {
        self.total_supply = self
            .total_supply
            .checked_add(value)
            .ok_or(AmmError::ArithmeticOverflow)?;
        let balance = self.balance_of(to);
        self.balances.insert(to, balance + value);
        self.events.push(Event::Transfer {
            from: Address::ZERO,
            to,
            value,
        });
        Ok(())
    }

    /// Destroys `value` units held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less
    /// than `value`.
    pub fn burn(&mut self, from: Address, value: U256) -> Result<(), AmmError> {
        let balance = self.balance_of(from);
        if balance < value {
            return Err(AmmError::InsufficientBalance);
        }
        self.balances.insert(from, balance - value);
        self.total_supply -= value;
        self.events.push(Event::Transfer {
            from,
            to: Address::ZERO,
            value,
        });
        Ok(())
    }

    /// Moves `value` units from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds less
    /// than `value`.
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), AmmError> {
        let from_balance = self.balance_of(from);
        if from_balance < value {
            return Err(AmmError::InsufficientBalance);
        }
        if from != to {
            self.balances.insert(from, from_balance - value);
            let to_balance = self.balance_of(to);
            self.balances.insert(to, to_balance + value);
        }
        self.events.push(Event::Transfer { from, to, value });
        Ok(())
    }

    /// Sets the allowance granted by `owner` to `spender`, replacing any
    /// previous value.
    pub fn approve(&mut self, owner: Address, spender: Address, value: U256) {
        self.allowances.insert((owner, spender), value);
        self.events.push(Event::Approval {
            owner,
            spender,
            value,
        });
    }

    /// Moves `value` from `from` to `to`, spending `spender`'s allowance.
    ///
    /// An allowance of [`U256::MAX`] is unlimited and never decremented.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientAllowance`] when the allowance is
    /// too small, or [`AmmError::InsufficientBalance`] when the owner's
    /// balance is.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), AmmError> {
        let allowed = self.allowance(from, spender);
        if allowed != U256::MAX {
            if allowed < value {
                return Err(AmmError::InsufficientAllowance);
            }
            // Validate the balance before touching the allowance so a
            // failed transfer leaves no trace.
            if self.balance_of(from) < value {
                return Err(AmmError::InsufficientBalance);
            }
            self.allowances.insert((from, spender), allowed - value);
        }
        self.transfer(from, to, value)
    }

    /// Digest that `owner` must sign to authorize a permit with the
    /// current nonce.
    #[must_use]
    pub fn permit_digest(
        &self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: u64,
    ) -> B256 {
        let struct_hash =
            permit_struct_hash(owner, spender, value, self.nonce_of(owner), deadline);
        typed_digest(self.domain_separator, struct_hash)
    }

    /// Applies a signed allowance grant.
    ///
    /// Consumes the owner's current nonce, so each signature authorizes
    /// exactly one approval.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ExpiredDeadline`] when `now` is past the
    /// deadline, or [`AmmError::InvalidSignature`] when recovery fails or
    /// yields an identity other than `owner`.
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: u64,
        signature: &EcdsaSignature,
        now: u64,
    ) -> Result<(), AmmError> {
        if now > deadline {
            return Err(AmmError::ExpiredDeadline);
        }
        let digest = self.permit_digest(owner, spender, value, deadline);
        let recovered = recover_signer(digest, signature)?;
        if recovered == Address::ZERO || recovered != owner {
            return Err(AmmError::InvalidSignature);
        }
        let nonce = self.nonce_of(owner);
        self.nonces.insert(owner, nonce + 1);
        self.approve(owner, spender, value);
        Ok(())
    }
}
