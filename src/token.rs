// 3.0 token.rs: ERC20-style multi-asset ledger. balances and allowances for every
// tradable/holdable asset, keyed by holder. the fund state owns one of these, so the
// operation-level snapshot discipline also reverts transfers issued mid-operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::math;
use crate::types::{AssetId, ExchangeId, ParticipantId};

// who holds a balance. the fund and each exchange slot are first-class holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holder {
    Participant(ParticipantId),
    Fund,
    Exchange(ExchangeId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("asset {0:?} is not registered")]
    UnknownAsset(AssetId),

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Decimal, available: Decimal },

    #[error("insufficient allowance: requested {requested}, approved {approved}")]
    InsufficientAllowance { requested: Decimal, approved: Decimal },

    #[error("transfer quantity must be non-negative")]
    NegativeQuantity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    assets: HashMap<AssetId, AssetInfo>,
    balances: HashMap<(AssetId, Holder), Decimal>,
    // (asset, owner, spender) -> remaining approval
    allowances: HashMap<(AssetId, Holder, Holder), Decimal>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_asset(&mut self, asset: AssetId, symbol: &str, decimals: u32) {
        self.assets.entry(asset).or_insert(AssetInfo {
            symbol: symbol.to_string(),
            decimals,
        });
    }

    pub fn asset_info(&self, asset: AssetId) -> Option<&AssetInfo> {
        self.assets.get(&asset)
    }

    pub fn decimals(&self, asset: AssetId) -> Result<u32, TokenError> {
        self.assets
            .get(&asset)
            .map(|info| info.decimals)
            .ok_or(TokenError::UnknownAsset(asset))
    }

    pub fn balance_of(&self, asset: AssetId, holder: Holder) -> Decimal {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    // test/setup entry point, the ledger equivalent of a faucet
    pub fn mint(&mut self, asset: AssetId, holder: Holder, quantity: Decimal) {
        let entry = self.balances.entry((asset, holder)).or_insert(Decimal::ZERO);
        *entry += quantity;
    }

    pub fn transfer(
        &mut self,
        asset: AssetId,
        from: Holder,
        to: Holder,
        quantity: Decimal,
    ) -> Result<(), TokenError> {
        if quantity < Decimal::ZERO {
            return Err(TokenError::NegativeQuantity);
        }
        if !self.assets.contains_key(&asset) {
            return Err(TokenError::UnknownAsset(asset));
        }

        let available = self.balance_of(asset, from);
        if quantity > available {
            return Err(TokenError::InsufficientBalance {
                requested: quantity,
                available,
            });
        }

        self.balances.insert((asset, from), available - quantity);
        let to_balance = self.balance_of(asset, to);
        self.balances.insert((asset, to), to_balance + quantity);
        Ok(())
    }

    pub fn approve(&mut self, asset: AssetId, owner: Holder, spender: Holder, quantity: Decimal) {
        self.allowances.insert((asset, owner, spender), quantity);
    }

    pub fn allowance(&self, asset: AssetId, owner: Holder, spender: Holder) -> Decimal {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    // spender moves owner's funds, consuming approval
    pub fn transfer_from(
        &mut self,
        asset: AssetId,
        spender: Holder,
        from: Holder,
        to: Holder,
        quantity: Decimal,
    ) -> Result<(), TokenError> {
        let approved = self.allowance(asset, from, spender);
        if quantity > approved {
            return Err(TokenError::InsufficientAllowance {
                requested: quantity,
                approved,
            });
        }

        self.transfer(asset, from, to, quantity)?;
        self.allowances
            .insert((asset, from, spender), approved - quantity);
        Ok(())
    }

    // round a quantity down to what this asset can actually represent
    pub fn truncate_to_asset(&self, asset: AssetId, quantity: Decimal) -> Result<Decimal, TokenError> {
        Ok(math::truncate(quantity, self.decimals(asset)?))
    }
}
