// Price Oracle Integration
//
// The engine is agnostic to where prices come from. Everything it needs is behind
// the PriceOracle trait: per-asset prices in the quote (denomination) asset,
// a recency flag per asset, and an update counter the request engine uses as a
// staleness baseline. MockPriceOracle is the deterministic in-memory source used
// by tests and the simulation binary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::math;
use crate::types::{AssetId, UpdateId};

// precision for derived (inverted / cross) prices
pub const PRICE_DECIMALS: u32 = 18;

/// A single observed price: quote units per one whole unit of the asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: Decimal,
    pub decimals: u32,
    pub is_recent: bool,
}

pub trait PriceOracle {
    /// Price of one whole unit of `asset`, in quote-asset units.
    fn price(&self, asset: AssetId) -> Option<PriceQuote>;

    /// Asset units per one quote unit.
    fn inverted_price(&self, asset: AssetId) -> Option<PriceQuote>;

    /// Units of `quote` per one unit of `base`, derived from the two quote prices.
    fn reference_price(&self, base: AssetId, quote: AssetId) -> Option<PriceQuote>;

    fn has_recent_price(&self, asset: AssetId) -> bool {
        self.price(asset).map(|q| q.is_recent).unwrap_or(false)
    }

    fn has_recent_prices(&self, assets: &[AssetId]) -> bool {
        assets.iter().all(|asset| self.has_recent_price(*asset))
    }

    fn exists_price_on_pair(&self, base: AssetId, quote: AssetId) -> bool {
        self.price(base).is_some() && self.price(quote).is_some()
    }

    /// Monotonically increasing counter, bumped on every feed update.
    fn last_update_id(&self) -> UpdateId;

    /// Expected milliseconds between feed updates.
    fn interval_ms(&self) -> i64;

    fn quote_asset(&self) -> AssetId;
}

/// Mock oracle for tests and simulation. Prices are set directly; every update
/// bumps the update counter the way a real feed's batch update would.
#[derive(Debug, Clone)]
pub struct MockPriceOracle {
    quote_asset: AssetId,
    interval_ms: i64,
    last_update_id: UpdateId,
    prices: HashMap<AssetId, PriceQuote>,
}

impl MockPriceOracle {
    pub fn new(quote_asset: AssetId, interval_ms: i64) -> Self {
        let mut prices = HashMap::new();
        // the quote asset is always worth exactly one of itself
        prices.insert(
            quote_asset,
            PriceQuote {
                price: Decimal::ONE,
                decimals: PRICE_DECIMALS,
                is_recent: true,
            },
        );

        Self {
            quote_asset,
            interval_ms,
            last_update_id: UpdateId(0),
            prices,
        }
    }

    pub fn set_price(&mut self, asset: AssetId, price: Decimal) {
        self.prices.insert(
            asset,
            PriceQuote {
                price,
                decimals: PRICE_DECIMALS,
                is_recent: true,
            },
        );
        self.last_update_id = self.last_update_id.advanced_by(1);
    }

    // one batch update: several assets, one counter bump
    pub fn set_prices(&mut self, updates: &[(AssetId, Decimal)]) {
        for (asset, price) in updates {
            self.prices.insert(
                *asset,
                PriceQuote {
                    price: *price,
                    decimals: PRICE_DECIMALS,
                    is_recent: true,
                },
            );
        }
        self.last_update_id = self.last_update_id.advanced_by(1);
    }

    pub fn mark_stale(&mut self, asset: AssetId) {
        if let Some(quote) = self.prices.get_mut(&asset) {
            quote.is_recent = false;
        }
    }

    // counter bump with no price change, e.g. a heartbeat tick
    pub fn tick(&mut self) {
        self.last_update_id = self.last_update_id.advanced_by(1);
    }
}

impl PriceOracle for MockPriceOracle {
    fn price(&self, asset: AssetId) -> Option<PriceQuote> {
        self.prices.get(&asset).copied()
    }

    fn inverted_price(&self, asset: AssetId) -> Option<PriceQuote> {
        let quote = self.price(asset)?;
        let inverted = math::invert(quote.price, PRICE_DECIMALS).ok()?;
        Some(PriceQuote {
            price: inverted,
            decimals: PRICE_DECIMALS,
            is_recent: quote.is_recent,
        })
    }

    fn reference_price(&self, base: AssetId, quote: AssetId) -> Option<PriceQuote> {
        let base_quote = self.price(base)?;
        let quote_quote = self.price(quote)?;
        let cross = math::checked_div(base_quote.price, quote_quote.price).ok()?;
        Some(PriceQuote {
            price: math::truncate(cross, PRICE_DECIMALS),
            decimals: PRICE_DECIMALS,
            is_recent: base_quote.is_recent && quote_quote.is_recent,
        })
    }

    fn last_update_id(&self) -> UpdateId {
        self.last_update_id
    }

    fn interval_ms(&self) -> i64 {
        self.interval_ms
    }

    fn quote_asset(&self) -> AssetId {
        self.quote_asset
    }
}
