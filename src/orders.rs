// 7.1 orders.rs: the fund-side mirror of on-exchange order state. append-only like
// requests; status and fill_quantity are the only mutable fields. a make order's
// true fill state lives on the venue and is pulled back in by sync_order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AssetId, ExchangeId, ExchangeOrderId, OrderId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Make,
    Take,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Active,
    PartiallyFilled,
    FullyFilled,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub exchange: ExchangeId,
    pub exchange_order_id: ExchangeOrderId,
    pub status: OrderStatus,
    pub kind: OrderKind,
    pub sell_asset: AssetId,
    pub buy_asset: AssetId,
    // make: quantities as placed. take: quantities actually traded.
    pub sell_quantity: Decimal,
    pub buy_quantity: Decimal,
    pub created_at: Timestamp,
    // sell-asset quantity filled so far
    pub fill_quantity: Decimal,
}

impl Order {
    pub fn is_open(&self) -> bool {
        matches!(self.status, OrderStatus::Active | OrderStatus::PartiallyFilled)
    }
}
