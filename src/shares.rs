// 5.0 shares.rs: the fund's own share token. balance bookkeeping, total supply,
// and the value-per-share division rule everything downstream prices against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::math::{self, MathError};
use crate::token::Holder;

// precision of a computed share price
pub const SHARE_PRICE_DECIMALS: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("insufficient shares: requested {requested}, held {held}")]
    InsufficientShares { requested: Decimal, held: Decimal },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLedger {
    balances: HashMap<Holder, Decimal>,
    total_supply: Decimal,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> Decimal {
        self.total_supply
    }

    pub fn balance_of(&self, holder: Holder) -> Decimal {
        self.balances.get(&holder).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn mint(&mut self, holder: Holder, quantity: Decimal) {
        let entry = self.balances.entry(holder).or_insert(Decimal::ZERO);
        *entry += quantity;
        self.total_supply += quantity;
    }

    pub fn burn(&mut self, holder: Holder, quantity: Decimal) -> Result<(), ShareError> {
        let held = self.balance_of(holder);
        if quantity > held {
            return Err(ShareError::InsufficientShares {
                requested: quantity,
                held,
            });
        }
        self.balances.insert(holder, held - quantity);
        self.total_supply -= quantity;
        Ok(())
    }

    // used to escrow shares with the fund for transfer-initiated redemptions
    pub fn transfer(&mut self, from: Holder, to: Holder, quantity: Decimal) -> Result<(), ShareError> {
        let held = self.balance_of(from);
        if quantity > held {
            return Err(ShareError::InsufficientShares {
                requested: quantity,
                held,
            });
        }
        self.balances.insert(from, held - quantity);
        let to_balance = self.balance_of(to);
        self.balances.insert(to, to_balance + quantity);
        Ok(())
    }
}

/// Value of one share given a total value and a share count. Fails on a zero
/// share count. Division happens at full precision and is truncated after, so
/// fractional value is preserved rather than lost early.
pub fn calc_value_per_share(total_value: Decimal, num_shares: Decimal) -> Result<Decimal, MathError> {
    let price = math::checked_div(total_value, num_shares)?;
    Ok(math::truncate(price, SHARE_PRICE_DECIMALS))
}
