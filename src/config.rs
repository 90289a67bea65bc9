// 9.0 config.rs: all fund settings in one place. identities, reward rates, and the
// owned-asset ceiling. set at construction, immutable afterwards.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{AssetId, ParticipantId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundConfig {
    // Human readable fund name
    pub name: String,
    // The manager: may trade, allocate rewards, and administer the fund
    pub manager: ParticipantId,
    // Asset the fund accounts in; GAV, NAV and share price are in these units
    pub denomination_asset: AssetId,
    // The host ledger's native asset; subscriptions/redemptions may settle in it
    pub native_asset: AssetId,
    // Asset id under which the fund's own shares circulate; never tradable by the fund
    pub share_asset: AssetId,
    // Decimal precision of share quantities
    pub share_decimals: u32,
    // Annual management reward rate as a fraction (0.02 = 2% per year)
    pub management_rate: Decimal,
    // Performance reward rate on gains above the high-water-mark (0.2 = 20%)
    pub performance_rate: Decimal,
    // Hard cap on the owned-asset set; trades that would exceed it are rejected
    pub owned_asset_ceiling: usize,
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            name: "Example Fund".to_string(),
            manager: ParticipantId(0),
            denomination_asset: AssetId(0),
            native_asset: AssetId(1),
            share_asset: AssetId(1000),
            share_decimals: 18,
            management_rate: dec!(0.01),
            performance_rate: dec!(0.10),
            owned_asset_ceiling: 90,
        }
    }
}
