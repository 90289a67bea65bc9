//! Reward allocation.
//!
//! The only code path that advances the high-water-mark and the accrual clock.
//! Every other GAV/NAV read is a view.

use rust_decimal::Decimal;

use super::core::Fund;
use super::results::{FundError, PerformedCalculations};
use crate::compliance::Compliance;
use crate::events::{EventPayload, RewardsAllocatedEvent, SharesMintedEvent};
use crate::fees::Calculations;
use crate::oracle::PriceOracle;
use crate::risk::RiskManagement;
use crate::token::Holder;
use crate::types::ParticipantId;

impl<O: PriceOracle, C: Compliance, R: RiskManagement> Fund<O, C, R> {
    /// Convert unclaimed rewards into manager shares and snapshot a new
    /// Calculations record. Manager only.
    pub fn allocate_unclaimed_rewards(
        &mut self,
        caller: ParticipantId,
    ) -> Result<PerformedCalculations, FundError> {
        self.with_rollback(|fund| {
            fund.require_manager(caller)?;

            let calc = fund.perform_calculations_inner()?;

            if calc.reward_share_quantity > Decimal::ZERO {
                let manager = Holder::Participant(fund.config.manager);
                fund.state.shares.mint(manager, calc.reward_share_quantity);
                fund.emit_event(EventPayload::SharesMinted(SharesMintedEvent {
                    to: manager,
                    quantity: calc.reward_share_quantity,
                    new_total_supply: fund.state.shares.total_supply(),
                }));
            }

            let high_water_mark = fund
                .state
                .calculations
                .high_water_mark
                .max(calc.share_price);

            fund.state.calculations = Calculations {
                gav: calc.gav,
                management_reward: calc.management_reward,
                performance_reward: calc.performance_reward,
                unclaimed_rewards: calc.unclaimed_rewards,
                nav: calc.nav,
                high_water_mark,
                total_supply: fund.state.shares.total_supply(),
                timestamp: fund.current_time,
            };

            fund.emit_event(EventPayload::RewardsAllocated(RewardsAllocatedEvent {
                management_reward: calc.management_reward,
                performance_reward: calc.performance_reward,
                reward_share_quantity: calc.reward_share_quantity,
                share_price: calc.share_price,
                high_water_mark,
            }));

            Ok(calc)
        })
    }
}
