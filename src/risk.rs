//! Risk management gate for manager trading.
//!
//! Consulted by the order router before any order is delegated to an exchange
//! adapter. The policy compares the order's implied price against the oracle's
//! reference price for the pair; orders priced too far off-market are rejected
//! before any value moves.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::AssetId;

pub trait RiskManagement {
    /// May the manager place a make order at `order_price` when the oracle
    /// reference is `reference_price`?
    fn is_make_permitted(
        &self,
        order_price: Decimal,
        reference_price: Decimal,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> bool;

    /// Mirrored check for taking a resting order.
    fn is_take_permitted(
        &self,
        order_price: Decimal,
        reference_price: Decimal,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> bool;
}

/// Permits orders whose implied price deviates from the reference by at most
/// `max_deviation` (a fraction, e.g. 0.10 for 10%).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceTolerancePolicy {
    pub max_deviation: Decimal,
}

impl Default for PriceTolerancePolicy {
    fn default() -> Self {
        Self {
            max_deviation: dec!(0.10),
        }
    }
}

impl PriceTolerancePolicy {
    pub fn new(max_deviation: Decimal) -> Self {
        Self { max_deviation }
    }

    fn within_tolerance(&self, order_price: Decimal, reference_price: Decimal) -> bool {
        if reference_price.is_zero() {
            return false;
        }
        let deviation = ((order_price - reference_price) / reference_price).abs();
        deviation <= self.max_deviation
    }
}

impl RiskManagement for PriceTolerancePolicy {
    fn is_make_permitted(
        &self,
        order_price: Decimal,
        reference_price: Decimal,
        _sell_asset: AssetId,
        _buy_asset: AssetId,
        _sell_quantity: Decimal,
        _buy_quantity: Decimal,
    ) -> bool {
        self.within_tolerance(order_price, reference_price)
    }

    fn is_take_permitted(
        &self,
        order_price: Decimal,
        reference_price: Decimal,
        _sell_asset: AssetId,
        _buy_asset: AssetId,
        _sell_quantity: Decimal,
        _buy_quantity: Decimal,
    ) -> bool {
        self.within_tolerance(order_price, reference_price)
    }
}
