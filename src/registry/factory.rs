//! Pair registry and factory.

use std::collections::HashMap;

use alloy_primitives::{keccak256, Address, B256};
use tracing::info;

use crate::domain::TokenPair;
use crate::error::AmmError;
use crate::events::Event;
use crate::pair::Pair;

/// Domain tag hashed into every derived pair identity. Changing it
/// changes every address the factory would ever produce.
fn template_hash() -> B256 {
    keccak256(b"pairswap/pair/v1")
}

/// Creates pairs and tracks every pair ever created.
///
/// The registry guarantees at most one pair per unordered asset pair and
/// derives each pair's identity deterministically, so the identity of a
/// pair can be computed before it exists.
///
/// It also holds the protocol-fee switch: `fee_to` names the recipient
/// of protocol fees (the zero identity disables collection) and only
/// `fee_setter` may change either role.
#[derive(Debug, Clone)]
pub struct Registry {
    fee_to: Address,
    fee_setter: Address,
    chain_id: u64,
    pairs: HashMap<TokenPair, Address>,
    all_pairs: Vec<Address>,
    events: Vec<Event>,
}

impl Registry {
    /// Creates a registry with no pairs and fee collection disabled.
    #[must_use]
    pub fn new(fee_setter: Address, chain_id: u64) -> Self {
        Self {
            fee_to: Address::ZERO,
            fee_setter,
            chain_id,
            pairs: HashMap::new(),
            all_pairs: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Current protocol-fee recipient, or `None` when collection is off.
    #[must_use]
    pub fn fee_to(&self) -> Option<Address> {
        if self.fee_to == Address::ZERO {
            None
        } else {
            Some(self.fee_to)
        }
    }

    /// Identity allowed to change the fee configuration.
    #[must_use]
    pub const fn fee_setter(&self) -> Address {
        self.fee_setter
    }

    /// Chain identifier stamped into every pair's share ledger.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Number of pairs created so far.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.all_pairs.len()
    }

    /// Identities of all pairs in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> &[Address] {
        &self.all_pairs
    }

    /// Looks up the pair for two assets, in either order.
    #[must_use]
    pub fn pair_for(&self, a: Address, b: Address) -> Option<Address> {
        let pair = TokenPair::new(a, b).ok()?;
        self.pairs.get(&pair).copied()
    }

    /// Drains and returns the accumulated event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Derives the identity a pair for `(token0, token1)` will have.
    ///
    /// A pure function of the canonical ordering and the template tag:
    /// the trailing 20 bytes of
    /// `keccak256(0xff || keccak256(token0 || token1) || template)`.
    #[must_use]
    pub fn pair_address(token0: Address, token1: Address) -> Address {
        let mut salt_input = [0u8; 40];
        salt_input[..20].copy_from_slice(token0.as_slice());
        salt_input[20..].copy_from_slice(token1.as_slice());
        let salt = keccak256(salt_input);

        let mut preimage = [0u8; 65];
        preimage[0] = 0xFF;
        preimage[1..33].copy_from_slice(salt.as_slice());
        preimage[33..65].copy_from_slice(template_hash().as_slice());
        Address::from_slice(&keccak256(preimage)[12..])
    }

    /// Creates the pair for two assets.
    ///
    /// The returned [`Pair`] is live immediately; the registry records
    /// its identity and emits [`Event::PairCreated`].
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::IdenticalAssets`] or [`AmmError::ZeroAddress`]
    /// for invalid inputs, and [`AmmError::PairExists`] if the pair was
    /// already created.
    pub fn create_pair(&mut self, a: Address, b: Address) -> Result<Pair, AmmError> {
        let tokens = TokenPair::new(a, b)?;
        if self.pairs.contains_key(&tokens) {
            return Err(AmmError::PairExists);
        }

        let address = Self::pair_address(tokens.token0(), tokens.token1());
        let pair = Pair::new(address, tokens.token0(), tokens.token1(), self.chain_id);

        self.pairs.insert(tokens, address);
        self.all_pairs.push(address);
        self.events.push(Event::PairCreated {
            token0: tokens.token0(),
            token1: tokens.token1(),
            pair: address,
            index: self.all_pairs.len() as u64,
        });
        info!(
            token0 = %tokens.token0(),
            token1 = %tokens.token1(),
            pair = %address,
            "pair created"
        );
        Ok(pair)
    }

    /// Changes the protocol-fee recipient. The zero identity disables
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), AmmError> {
        if caller != self.fee_setter {
            return Err(AmmError::Forbidden);
        }
        self.fee_to = fee_to;
        Ok(())
    }

    /// Hands the fee-setter role to another identity.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the current
    /// fee setter.
    pub fn set_fee_setter(&mut self, caller: Address, fee_setter: Address) -> Result<(), AmmError> {
        if caller != self.fee_setter {
            return Err(AmmError::Forbidden);
        }
        self.fee_setter = fee_setter;
        Ok(())
    }
}
