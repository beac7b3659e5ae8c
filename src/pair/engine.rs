//! Constant-product pool engine.
//!
//! A [`Pair`] holds reserves of two assets and maintains the invariant
//! `reserve0 * reserve1 = k`. Liquidity providers deposit both assets
//! and receive shares from the pair's own ledger; traders swap one asset
//! for the other and pay a 0.3% fee that accrues to the reserves.
//!
//! Every state-changing operation is atomic: it either completes fully
//! or leaves the pair and every asset ledger exactly as they were.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AmmError;
use crate::events::Event;
use crate::ledger::{EcdsaSignature, LedgerConfig, TokenLedger, TokenSet};
use crate::math::{encode_ratio, isqrt};
use crate::pair::callback::SwapCallback;
use crate::registry::Registry;

/// Share units permanently locked to the null identity on first mint.
/// Raises the cost of manipulating the share price of a tiny pool.
pub const MINIMUM_LIQUIDITY: U256 = U256::from_limbs([1000, 0, 0, 0]);

/// Largest balance a reserve can record, `2^112 - 1`. The bound keeps
/// price ratios representable in the fixed-point accumulators.
pub const RESERVE_LIMIT: U256 = U256::from_limbs([u64::MAX, 0x0000_FFFF_FFFF_FFFF, 0, 0]);

/// Swap fee numerator out of 1000: inputs are charged 3 per mille.
const FEE_PER_MILLE: u64 = 3;

/// Name stamped on every pair's share ledger.
const SHARE_NAME: &str = "Pairswap V1";

/// Symbol stamped on every pair's share ledger.
const SHARE_SYMBOL: &str = "PSP-LP";

/// A constant-product pool over two assets.
///
/// The pair owns a [`TokenLedger`] for its liquidity shares, so shares
/// carry the full fungible-asset surface including permits. Pool
/// operations take the global [`TokenSet`] by mutable reference and
/// move assets between the pair's own identity and callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    id: Address,
    token0: Address,
    token1: Address,
    reserve0: U256,
    reserve1: U256,
    last_update: u64,
    price0_cumulative: U256,
    price1_cumulative: U256,
    k_last: U256,
    shares: TokenLedger,
    locked: bool,
    events: Vec<Event>,
}

impl Pair {
    /// Creates an empty pair. `token0` and `token1` must already be in
    /// canonical order; the [`Registry`](crate::registry::Registry) is
    /// the intended caller.
    #[must_use]
    pub fn new(id: Address, token0: Address, token1: Address, chain_id: u64) -> Self {
        let shares = TokenLedger::new(
            id,
            LedgerConfig {
                name: SHARE_NAME.to_string(),
                symbol: SHARE_SYMBOL.to_string(),
                decimals: 18,
                chain_id,
            },
        );
        Self {
            id,
            token0,
            token1,
            reserve0: U256::ZERO,
            reserve1: U256::ZERO,
            last_update: 0,
            price0_cumulative: U256::ZERO,
            price1_cumulative: U256::ZERO,
            k_last: U256::ZERO,
            shares,
            locked: false,
            events: Vec::new(),
        }
    }

    /// The pair's own 20-byte identity.
    #[must_use]
    pub const fn id(&self) -> Address {
        self.id
    }

    /// First asset in canonical order.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Second asset in canonical order.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Current reserves and the timestamp of the last reserve update.
    #[must_use]
    pub const fn reserves(&self) -> (U256, U256, u64) {
        (self.reserve0, self.reserve1, self.last_update)
    }

    /// Cumulative token1-per-token0 price, Q112 fixed point, wrapping.
    #[must_use]
    pub const fn price0_cumulative(&self) -> U256 {
        self.price0_cumulative
    }

    /// Cumulative token0-per-token1 price, Q112 fixed point, wrapping.
    #[must_use]
    pub const fn price1_cumulative(&self) -> U256 {
        self.price1_cumulative
    }

    /// Reserve product recorded after the most recent liquidity event,
    /// zero while protocol-fee collection is off.
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// Drains and returns the accumulated event log.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -- share ledger surface --------------------------------------------

    /// Shares in circulation.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.shares.total_supply()
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.shares.balance_of(owner)
    }

    /// Share allowance granted by `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.shares.allowance(owner, spender)
    }

    /// Next unused permit nonce for `owner` on the share ledger.
    #[must_use]
    pub fn nonce_of(&self, owner: Address) -> u64 {
        self.shares.nonce_of(owner)
    }

    /// Domain separator of the share ledger.
    #[must_use]
    pub const fn domain_separator(&self) -> B256 {
        self.shares.domain_separator()
    }

    /// Moves shares between holders.
    ///
    /// # Errors
    ///
    /// Propagates ledger errors such as [`AmmError::InsufficientBalance`].
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), AmmError> {
        let result = self.shares.transfer(from, to, value);
        self.events.extend(self.shares.take_events());
        result
    }

    /// Sets a share allowance.
    pub fn approve(&mut self, owner: Address, spender: Address, value: U256) {
        self.shares.approve(owner, spender, value);
        self.events.extend(self.shares.take_events());
    }

    /// Moves shares on behalf of an owner, spending an allowance.
    ///
    /// # Errors
    ///
    /// Propagates ledger errors such as
    /// [`AmmError::InsufficientAllowance`].
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), AmmError> {
        let result = self.shares.transfer_from(spender, from, to, value);
        self.events.extend(self.shares.take_events());
        result
    }

    /// Digest an owner signs to authorize a share-allowance permit.
    #[must_use]
    pub fn permit_digest(
        &self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: u64,
    ) -> B256 {
        self.shares.permit_digest(owner, spender, value, deadline)
    }

    /// Applies a signed share-allowance grant.
    ///
    /// # Errors
    ///
    /// Propagates [`AmmError::ExpiredDeadline`] and
    /// [`AmmError::InvalidSignature`] from the share ledger.
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: u64,
        signature: &EcdsaSignature,
        now: u64,
    ) -> Result<(), AmmError> {
        let result = self
            .shares
            .permit(owner, spender, value, deadline, signature, now);
        self.events.extend(self.shares.take_events());
        result
    }

    // -- pool operations -------------------------------------------------

    /// Mints liquidity shares for assets already deposited to the pair.
    ///
    /// The caller first transfers both assets to the pair's identity;
    /// `mint` measures the deposit as the difference between balances and
    /// reserves. On the very first mint, [`MINIMUM_LIQUIDITY`] shares are
    /// locked to the null identity and the depositor receives
    /// `isqrt(amount0 * amount1) - MINIMUM_LIQUIDITY`. Afterwards the
    /// depositor receives shares pro rata to the smaller side of the
    /// deposit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientInitialLiquidity`] when a first
    /// deposit cannot cover the locked minimum, and
    /// [`AmmError::InsufficientLiquidityMinted`] when a deposit rounds to
    /// zero shares. On any error the pair and all ledgers are unchanged.
    pub fn mint(
        &mut self,
        tokens: &mut TokenSet,
        registry: &Registry,
        to: Address,
        now: u64,
    ) -> Result<U256, AmmError> {
        self.enter()?;
        let pair_snapshot = self.clone();
        let token_snapshot = tokens.clone();
        let result = self.mint_locked(tokens, registry, to, now);
        if result.is_err() {
            *self = pair_snapshot;
            *tokens = token_snapshot;
        }
        self.exit();
        result
    }

    fn mint_locked(
        &mut self,
        tokens: &mut TokenSet,
        registry: &Registry,
        to: Address,
        now: u64,
    ) -> Result<U256, AmmError> {
        let balance0 = tokens.get(self.token0)?.balance_of(self.id);
        let balance1 = tokens.get(self.token1)?.balance_of(self.id);
        let amount0 = balance0
            .checked_sub(self.reserve0)
            .ok_or(AmmError::ArithmeticOverflow)?;
        let amount1 = balance1
            .checked_sub(self.reserve1)
            .ok_or(AmmError::ArithmeticOverflow)?;

        let fee_on = self.mint_protocol_fee(registry)?;
        let supply = self.shares.total_supply();

        let liquidity = if supply.is_zero() {
            let product = amount0
                .checked_mul(amount1)
                .ok_or(AmmError::ArithmeticOverflow)?;
            let liquidity = isqrt(product)
                .checked_sub(MINIMUM_LIQUIDITY)
                .ok_or(AmmError::InsufficientInitialLiquidity)?;
            // The locked floor is unownable and never redeemable.
            self.shares.mint(Address::ZERO, MINIMUM_LIQUIDITY)?;
            liquidity
        } else {
            // A drained reserve (shares outstanding, nothing backing one
            // side) prices new deposits at zero.
            if self.reserve0.is_zero() || self.reserve1.is_zero() {
                return Err(AmmError::InsufficientLiquidityMinted);
            }
            let share0 = amount0
                .checked_mul(supply)
                .ok_or(AmmError::ArithmeticOverflow)?
                / self.reserve0;
            let share1 = amount1
                .checked_mul(supply)
                .ok_or(AmmError::ArithmeticOverflow)?
                / self.reserve1;
            share0.min(share1)
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        self.shares.mint(to, liquidity)?;

        self.events.extend(self.shares.take_events());
        self.update(balance0, balance1, now)?;
        if fee_on {
            self.k_last = self.reserve0 * self.reserve1;
        }
        self.events.push(Event::Mint {
            to,
            amount0,
            amount1,
        });
        debug!(pair = %self.id, %to, %amount0, %amount1, %liquidity, "minted liquidity");
        Ok(liquidity)
    }

    /// Redeems liquidity shares held by the pair for both assets.
    ///
    /// The caller first transfers shares to the pair's identity; `burn`
    /// destroys that whole holding and pays out both assets pro rata to
    /// `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientLiquidityBurned`] when either
    /// payout rounds to zero. On any error the pair and all ledgers are
    /// unchanged.
    pub fn burn(
        &mut self,
        tokens: &mut TokenSet,
        registry: &Registry,
        to: Address,
        now: u64,
    ) -> Result<(U256, U256), AmmError> {
        self.enter()?;
        let pair_snapshot = self.clone();
        let token_snapshot = tokens.clone();
        let result = self.burn_locked(tokens, registry, to, now);
        if result.is_err() {
            *self = pair_snapshot;
            *tokens = token_snapshot;
        }
        self.exit();
        result
    }

    fn burn_locked(
        &mut self,
        tokens: &mut TokenSet,
        registry: &Registry,
        to: Address,
        now: u64,
    ) -> Result<(U256, U256), AmmError> {
        let balance0 = tokens.get(self.token0)?.balance_of(self.id);
        let balance1 = tokens.get(self.token1)?.balance_of(self.id);
        let liquidity = self.shares.balance_of(self.id);

        let fee_on = self.mint_protocol_fee(registry)?;
        let supply = self.shares.total_supply();
        if supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let amount0 = liquidity
            .checked_mul(balance0)
            .ok_or(AmmError::ArithmeticOverflow)?
            / supply;
        let amount1 = liquidity
            .checked_mul(balance1)
            .ok_or(AmmError::ArithmeticOverflow)?
            / supply;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        self.shares.burn(self.id, liquidity)?;
        tokens.get_mut(self.token0)?.transfer(self.id, to, amount0)?;
        tokens.get_mut(self.token1)?.transfer(self.id, to, amount1)?;
        let balance0 = tokens.get(self.token0)?.balance_of(self.id);
        let balance1 = tokens.get(self.token1)?.balance_of(self.id);

        self.events.extend(self.shares.take_events());
        self.update(balance0, balance1, now)?;
        if fee_on {
            self.k_last = self.reserve0 * self.reserve1;
        }
        self.events.push(Event::Burn {
            to,
            amount0,
            amount1,
        });
        debug!(pair = %self.id, %to, %amount0, %amount1, %liquidity, "burned liquidity");
        Ok((amount0, amount1))
    }

    /// Swaps one asset for the other.
    ///
    /// Outputs are paid out first; the input payment is whatever balance
    /// appeared on the pair by the time the invariant is checked, so the
    /// caller either deposits input beforehand or deposits it from inside
    /// the `callback` (a flash swap). The fee-adjusted invariant
    /// `(b0*1000 - in0*3)(b1*1000 - in1*3) >= r0*r1*10^6` must hold or
    /// the whole operation unwinds.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientOutputAmount`] when both outputs
    /// are zero, [`AmmError::InsufficientLiquidity`] when an output
    /// reaches its reserve, [`AmmError::InvalidRecipient`] when `to` is
    /// one of the pool's assets, [`AmmError::InsufficientInputAmount`]
    /// when nothing was paid in, and [`AmmError::InvariantViolation`]
    /// when the payment is short. On any error the pair and all ledgers
    /// are unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        tokens: &mut TokenSet,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        data: &[u8],
        callback: Option<&mut dyn SwapCallback>,
        now: u64,
    ) -> Result<(), AmmError> {
        self.enter()?;
        let pair_snapshot = self.clone();
        let token_snapshot = tokens.clone();
        let result = self.swap_locked(tokens, amount0_out, amount1_out, to, data, callback, now);
        if result.is_err() {
            *self = pair_snapshot;
            *tokens = token_snapshot;
        }
        self.exit();
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn swap_locked(
        &mut self,
        tokens: &mut TokenSet,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
        data: &[u8],
        callback: Option<&mut dyn SwapCallback>,
        now: u64,
    ) -> Result<(), AmmError> {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        if amount0_out >= self.reserve0 || amount1_out >= self.reserve1 {
            return Err(AmmError::InsufficientLiquidity);
        }
        if to == self.token0 || to == self.token1 {
            return Err(AmmError::InvalidRecipient);
        }

        // Optimistic payout: outputs leave before the input is known.
        if !amount0_out.is_zero() {
            tokens
                .get_mut(self.token0)?
                .transfer(self.id, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            tokens
                .get_mut(self.token1)?
                .transfer(self.id, to, amount1_out)?;
        }
        if let Some(hook) = callback {
            hook.on_swap(self, tokens, to, amount0_out, amount1_out, data)?;
        }

        let balance0 = tokens.get(self.token0)?.balance_of(self.id);
        let balance1 = tokens.get(self.token1)?.balance_of(self.id);
        let amount0_in = balance0.saturating_sub(self.reserve0 - amount0_out);
        let amount1_in = balance1.saturating_sub(self.reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        let fee = U256::from(FEE_PER_MILLE);
        let per_mille = U256::from(1000u64);
        let adjusted0 = balance0
            .checked_mul(per_mille)
            .ok_or(AmmError::ArithmeticOverflow)?
            .checked_sub(amount0_in * fee)
            .ok_or(AmmError::ArithmeticOverflow)?;
        let adjusted1 = balance1
            .checked_mul(per_mille)
            .ok_or(AmmError::ArithmeticOverflow)?
            .checked_sub(amount1_in * fee)
            .ok_or(AmmError::ArithmeticOverflow)?;
        let adjusted_product = adjusted0
            .checked_mul(adjusted1)
            .ok_or(AmmError::ArithmeticOverflow)?;
        let required = self.reserve0 * self.reserve1 * per_mille * per_mille;
        if adjusted_product < required {
            return Err(AmmError::InvariantViolation);
        }

        self.update(balance0, balance1, now)?;
        self.events.push(Event::Swap {
            to,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        });
        debug!(
            pair = %self.id, %to,
            %amount0_in, %amount1_in, %amount0_out, %amount1_out,
            "swap"
        );
        Ok(())
    }

    /// Forces reserves to match the pair's actual asset balances.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ArithmeticOverflow`] if a balance exceeds
    /// [`RESERVE_LIMIT`], and [`AmmError::Reentrant`] from inside a
    /// callback.
    pub fn sync(&mut self, tokens: &mut TokenSet, now: u64) -> Result<(), AmmError> {
        self.enter()?;
        let pair_snapshot = self.clone();
        let result = (|| {
            let balance0 = tokens.get(self.token0)?.balance_of(self.id);
            let balance1 = tokens.get(self.token1)?.balance_of(self.id);
            self.update(balance0, balance1, now)
        })();
        if result.is_err() {
            *self = pair_snapshot;
        }
        self.exit();
        result
    }

    /// Pays out any balance in excess of the reserves to `to`.
    ///
    /// The inverse of [`Pair::sync`]: it realigns balances to reserves
    /// instead of reserves to balances, letting anyone sweep assets that
    /// were transferred to the pair outside a pool operation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Reentrant`] from inside a callback and
    /// propagates ledger errors.
    pub fn skim(&mut self, tokens: &mut TokenSet, to: Address) -> Result<(), AmmError> {
        self.enter()?;
        let token_snapshot = tokens.clone();
        let result = (|| {
            let excess0 = tokens
                .get(self.token0)?
                .balance_of(self.id)
                .saturating_sub(self.reserve0);
            let excess1 = tokens
                .get(self.token1)?
                .balance_of(self.id)
                .saturating_sub(self.reserve1);
            if !excess0.is_zero() {
                tokens.get_mut(self.token0)?.transfer(self.id, to, excess0)?;
            }
            if !excess1.is_zero() {
                tokens.get_mut(self.token1)?.transfer(self.id, to, excess1)?;
            }
            Ok(())
        })();
        if result.is_err() {
            *tokens = token_snapshot;
        }
        self.exit();
        result
    }

    // -- internals -------------------------------------------------------

    fn enter(&mut self) -> Result<(), AmmError> {
        if self.locked {
            return Err(AmmError::Reentrant);
        }
        self.locked = true;
        Ok(())
    }

    fn exit(&mut self) {
        self.locked = false;
    }

    /// Commits new reserves, advancing the cumulative price accumulators
    /// by the old reserve ratio times the elapsed time. The accumulators
    /// wrap on overflow; consumers work with differences.
    fn update(&mut self, balance0: U256, balance1: U256, now: u64) -> Result<(), AmmError> {
        if balance0 > RESERVE_LIMIT || balance1 > RESERVE_LIMIT {
            return Err(AmmError::ArithmeticOverflow);
        }
        let elapsed = now.saturating_sub(self.last_update);
        if elapsed > 0 && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            if let (Some(price0), Some(price1)) = (
                encode_ratio(self.reserve1, self.reserve0),
                encode_ratio(self.reserve0, self.reserve1),
            ) {
                let dt = U256::from(elapsed);
                self.price0_cumulative =
                    self.price0_cumulative.wrapping_add(price0.wrapping_mul(dt));
                self.price1_cumulative =
                    self.price1_cumulative.wrapping_add(price1.wrapping_mul(dt));
            }
        }
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.last_update = now;
        self.events.push(Event::Sync {
            reserve0: balance0,
            reserve1: balance1,
        });
        Ok(())
    }

    /// Mints the protocol's share of fee growth since the last liquidity
    /// event, when collection is enabled: `supply * (rk - rk_last) /
    /// (5 * rk + rk_last)` where `rk = isqrt(reserve0 * reserve1)`.
    ///
    /// When collection is off, any recorded `k_last` is cleared so a
    /// later re-enable does not capture growth that predates it.
    fn mint_protocol_fee(&mut self, registry: &Registry) -> Result<bool, AmmError> {
        match registry.fee_to() {
            Some(fee_to) => {
                if !self.k_last.is_zero() {
                    let root_k = isqrt(self.reserve0 * self.reserve1);
                    let root_k_last = isqrt(self.k_last);
                    if root_k > root_k_last {
                        let numerator = self
                            .shares
                            .total_supply()
                            .checked_mul(root_k - root_k_last)
                            .ok_or(AmmError::ArithmeticOverflow)?;
                        let denominator = root_k * U256::from(5u64) + root_k_last;
                        let liquidity = numerator / denominator;
                        if !liquidity.is_zero() {
                            self.shares.mint(fee_to, liquidity)?;
                        }
                    }
                }
                Ok(true)
            }
            None => {
                if !self.k_last.is_zero() {
                    self.k_last = U256::ZERO;
                }
                Ok(false)
            }
        }
    }
}
