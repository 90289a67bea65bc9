//! GAV, NAV and share-price calculation.
//!
//! `calc_gav` iterates the owned-asset set, pricing direct balances plus
//! exchange custody, and rebuilds the set as it goes: an asset stays owned only
//! while it represents actual exposure. A single stale price fails the whole
//! pass; the rollback discipline guarantees the owned set is untouched by a
//! failed call.

use rust_decimal::Decimal;

use super::core::Fund;
use super::results::{FundError, PerformedCalculations};
use crate::compliance::Compliance;
use crate::events::{AssetObservationEvent, EventPayload};
use crate::fees;
use crate::math;
use crate::oracle::{PriceOracle, PRICE_DECIMALS};
use crate::risk::RiskManagement;
use crate::shares;
use crate::token::Holder;
use crate::types::AssetId;

impl<O: PriceOracle, C: Compliance, R: RiskManagement> Fund<O, C, R> {
    /// Quantity of `asset` escrowed with exchanges for open make orders.
    /// Lazily clears spent custody entries and the in-open-make-order flag.
    pub fn custody_held(&mut self, asset: AssetId) -> Decimal {
        let exchanges = &self.modules.exchanges;
        self.state.ledger.custody_held(asset, |exchange, order| {
            exchanges
                .get(exchange.index())
                .and_then(|slot| slot.adapter.get_order(order))
                .map(|terms| terms.sell_quantity)
                .unwrap_or(Decimal::ZERO)
        })
    }

    /// Gross asset value in denomination units, over direct balances plus
    /// custody. Fails on the first owned asset without a recent price.
    pub fn calc_gav(&mut self) -> Result<Decimal, FundError> {
        self.with_rollback(|fund| fund.calc_gav_inner())
    }

    pub(crate) fn calc_gav_inner(&mut self) -> Result<Decimal, FundError> {
        let denomination = self.config.denomination_asset;
        let owned: Vec<AssetId> = self.state.ledger.owned_assets().to_vec();

        let mut gav = Decimal::ZERO;
        let mut kept: Vec<AssetId> = Vec::with_capacity(owned.len());

        for asset in owned {
            let balance = self.state.token.balance_of(asset, Holder::Fund);
            let custody = self.custody_held(asset);
            let holdings = math::checked_add(balance, custody)?;

            let quote = self
                .modules
                .oracle
                .price(asset)
                .filter(|q| q.is_recent)
                .ok_or(FundError::StalePrice(asset))?;

            gav = math::checked_add(gav, math::checked_mul(holdings, quote.price)?)?;

            self.emit_event(EventPayload::AssetObservation(AssetObservationEvent {
                asset,
                balance,
                custody_held: custody,
                holdings,
                price: quote.price,
            }));

            // membership rule: exposure, denomination, or open make order
            if holdings > Decimal::ZERO
                || asset == denomination
                || self.state.ledger.has_open_make_order(asset)
            {
                kept.push(asset);
            }
        }

        self.state.ledger.set_owned(kept);
        Ok(math::truncate(gav, PRICE_DECIMALS))
    }

    /// One full pricing pass: GAV, accrued rewards since the last allocation,
    /// NAV, and the share price with the manager's pending reward shares
    /// already priced in. Does not advance the accrual clock.
    pub fn perform_calculations(&mut self) -> Result<PerformedCalculations, FundError> {
        self.with_rollback(|fund| fund.perform_calculations_inner())
    }

    pub(crate) fn perform_calculations_inner(&mut self) -> Result<PerformedCalculations, FundError> {
        let gav = self.calc_gav_inner()?;

        let elapsed = self
            .state
            .calculations
            .timestamp
            .elapsed_seconds(&self.current_time);
        let total_supply = self.state.shares.total_supply();

        let rewards = fees::calc_unclaimed_rewards(
            gav,
            elapsed,
            total_supply,
            self.state.calculations.high_water_mark,
            self.config.management_rate,
            self.config.performance_rate,
        )?;

        let nav = math::checked_sub(gav, rewards.total)?;

        // dilution convention: the reward shares are priced in before any mint
        let reward_share_quantity = if gav.is_zero() {
            Decimal::ZERO
        } else {
            math::mul_div(total_supply, rewards.total, gav, self.config.share_decimals)?
        };
        let total_supply_with_rewards = math::checked_add(total_supply, reward_share_quantity)?;

        let share_price = if nav > Decimal::ZERO {
            shares::calc_value_per_share(nav, total_supply_with_rewards)?
        } else {
            Decimal::ONE
        };

        Ok(PerformedCalculations {
            gav,
            management_reward: rewards.management,
            performance_reward: rewards.performance,
            unclaimed_rewards: rewards.total,
            nav,
            reward_share_quantity,
            total_supply_with_rewards,
            share_price,
        })
    }

    pub fn calc_share_price(&mut self) -> Result<Decimal, FundError> {
        Ok(self.perform_calculations()?.share_price)
    }
}
