// 6.0 fees.rs: reward accrual math. management rewards accrue with time against GAV,
// performance rewards accrue on share-price gains above the high-water-mark.
// pure functions over a Calculations snapshot; the fund aggregate owns the only
// code path that advances the snapshot (allocate_unclaimed_rewards).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::math::{self, MathError};
use crate::shares::{self, SHARE_PRICE_DECIMALS};
use crate::types::Timestamp;

pub const SECONDS_PER_YEAR: Decimal = dec!(31_536_000);

// 6.1: snapshot written each time unclaimed rewards are converted to shares.
// high_water_mark never decreases; nav is always gav minus unclaimed rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculations {
    pub gav: Decimal,
    pub management_reward: Decimal,
    pub performance_reward: Decimal,
    pub unclaimed_rewards: Decimal,
    pub nav: Decimal,
    pub high_water_mark: Decimal,
    pub total_supply: Decimal,
    pub timestamp: Timestamp,
}

impl Calculations {
    pub fn initial(timestamp: Timestamp) -> Self {
        Self {
            gav: Decimal::ZERO,
            management_reward: Decimal::ZERO,
            performance_reward: Decimal::ZERO,
            unclaimed_rewards: Decimal::ZERO,
            nav: Decimal::ZERO,
            // one denomination unit per share
            high_water_mark: Decimal::ONE,
            total_supply: Decimal::ZERO,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclaimedRewards {
    pub management: Decimal,
    pub performance: Decimal,
    pub total: Decimal,
}

// 6.2: gav * elapsed / secondsPerYear * rate. the year division happens before
// the rate multiply; truncation only at the end of the chain.
pub fn management_reward(
    gav: Decimal,
    elapsed_seconds: Decimal,
    annual_rate: Decimal,
) -> Result<Decimal, MathError> {
    let time_slice = math::checked_div(math::checked_mul(gav, elapsed_seconds)?, SECONDS_PER_YEAR)?;
    Ok(math::truncate(
        math::checked_mul(time_slice, annual_rate)?,
        SHARE_PRICE_DECIMALS,
    ))
}

// 6.3: reward on share-price gain above the high-water-mark, measured on the value
// per share net of the management reward. never negative; the mark never ratchets down.
pub fn performance_reward(
    gav: Decimal,
    management_reward: Decimal,
    total_supply: Decimal,
    high_water_mark: Decimal,
    rate: Decimal,
) -> Result<Decimal, MathError> {
    let value_excl_management = math::checked_sub(gav, management_reward)?;

    let value_per_share = if total_supply.is_zero() {
        Decimal::ONE
    } else {
        shares::calc_value_per_share(value_excl_management, total_supply)?
    };

    if value_per_share <= high_water_mark {
        return Ok(Decimal::ZERO);
    }

    let gain = math::checked_sub(value_per_share, high_water_mark)?;
    let profits = math::checked_mul(gain, total_supply)?;
    Ok(math::truncate(
        math::checked_mul(profits, rate)?,
        SHARE_PRICE_DECIMALS,
    ))
}

pub fn calc_unclaimed_rewards(
    gav: Decimal,
    elapsed_seconds: Decimal,
    total_supply: Decimal,
    high_water_mark: Decimal,
    management_rate: Decimal,
    performance_rate: Decimal,
) -> Result<UnclaimedRewards, MathError> {
    let management = management_reward(gav, elapsed_seconds, management_rate)?;
    let performance = performance_reward(gav, management, total_supply, high_water_mark, performance_rate)?;
    let total = math::checked_add(management, performance)?;

    Ok(UnclaimedRewards {
        management,
        performance,
        total,
    })
}
