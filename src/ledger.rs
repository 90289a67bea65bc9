// 4.0 ledger.rs: per-fund record of exposure. tracks which assets the fund owns,
// which of them back an open make order, and which exchange order holds the custody.
// the owned set is rebuilt on every GAV cycle so it never drifts from actual exposure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::{AssetId, ExchangeId, ExchangeOrderId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLedger {
    denomination_asset: AssetId,
    // ordered for deterministic GAV iteration. the denomination asset is always a member.
    owned: Vec<AssetId>,
    in_open_make_order: HashSet<AssetId>,
    // (exchange, asset) -> open make order on that venue. absent means no order.
    custody: HashMap<(ExchangeId, AssetId), ExchangeOrderId>,
}

impl AssetLedger {
    pub fn new(denomination_asset: AssetId) -> Self {
        Self {
            denomination_asset,
            owned: vec![denomination_asset],
            in_open_make_order: HashSet::new(),
            custody: HashMap::new(),
        }
    }

    pub fn denomination_asset(&self) -> AssetId {
        self.denomination_asset
    }

    pub fn owned_assets(&self) -> &[AssetId] {
        &self.owned
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    pub fn is_owned(&self, asset: AssetId) -> bool {
        self.owned.contains(&asset)
    }

    pub fn add_owned(&mut self, asset: AssetId) {
        if !self.owned.contains(&asset) {
            self.owned.push(asset);
        }
    }

    /// Replace the owned set after a GAV rebuild. The denomination asset is
    /// kept a member no matter what the rebuild concluded.
    pub fn set_owned(&mut self, mut assets: Vec<AssetId>) {
        if !assets.contains(&self.denomination_asset) {
            assets.push(self.denomination_asset);
        }
        self.owned = assets;
    }

    pub fn has_open_make_order(&self, asset: AssetId) -> bool {
        self.in_open_make_order.contains(&asset)
    }

    pub fn custody_entry(&self, exchange: ExchangeId, asset: AssetId) -> Option<ExchangeOrderId> {
        self.custody.get(&(exchange, asset)).copied()
    }

    /// Record a freshly placed make order's custody.
    pub fn record_make_order(&mut self, exchange: ExchangeId, asset: AssetId, order: ExchangeOrderId) {
        self.custody.insert((exchange, asset), order);
        self.in_open_make_order.insert(asset);
        self.add_owned(asset);
    }

    /// Total sell quantity still escrowed for `asset` across all exchange slots.
    /// `remaining` reports the open quantity of one venue order.
    ///
    /// Side effects: spent custody entries are dropped, and if nothing remains
    /// anywhere the in-open-make-order flag is cleared.
    pub fn custody_held<F>(&mut self, asset: AssetId, remaining: F) -> Decimal
    where
        F: Fn(ExchangeId, ExchangeOrderId) -> Decimal,
    {
        let entries: Vec<(ExchangeId, ExchangeOrderId)> = self
            .custody
            .iter()
            .filter(|((_, entry_asset), _)| *entry_asset == asset)
            .map(|((exchange, _), order)| (*exchange, *order))
            .collect();

        let mut total = Decimal::ZERO;
        for (exchange, order) in entries {
            let quantity = remaining(exchange, order);
            if quantity.is_zero() {
                self.custody.remove(&(exchange, asset));
            } else {
                total += quantity;
            }
        }

        if total.is_zero() {
            self.in_open_make_order.remove(&asset);
        }
        total
    }
}
