// 8.0: every state change produces an event. used for audit trails, state
// reconstruction, and notifying external systems. the EventPayload enum lists all
// event types. events sit inside the fund state so a rolled-back operation leaves
// no trace of itself in the log either.

use crate::orders::OrderStatus;
use crate::requests::RequestKind;
use crate::token::Holder;
use crate::types::{
    AssetId, ExchangeId, ExchangeOrderId, OrderId, ParticipantId, RequestId, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Request lifecycle
    RequestCreated(RequestCreatedEvent),
    RequestCancelled(RequestCancelledEvent),
    RequestExecuted(RequestExecutedEvent),

    // Share supply
    SharesMinted(SharesMintedEvent),
    SharesBurned(SharesBurnedEvent),

    // Accounting
    AssetObservation(AssetObservationEvent),
    RewardsAllocated(RewardsAllocatedEvent),

    // Trading
    OrderMade(OrderMadeEvent),
    OrderTaken(OrderTakenEvent),
    OrderCancelled(OrderCancelledEvent),
    OrderSynced(OrderSyncedEvent),

    // Emergency paths
    EmergencyRedemption(EmergencyRedemptionEvent),
    FundShutDown(FundShutDownEvent),

    // Administration
    SubscriptionToggled(ToggleEvent),
    RedemptionToggled(ToggleEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCreatedEvent {
    pub request_id: RequestId,
    pub participant: ParticipantId,
    pub kind: RequestKind,
    pub asset: AssetId,
    pub share_quantity: Decimal,
    pub give_quantity: Decimal,
    pub receive_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCancelledEvent {
    pub request_id: RequestId,
    pub by: ParticipantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestExecutedEvent {
    pub request_id: RequestId,
    pub participant: ParticipantId,
    pub kind: RequestKind,
    pub asset: AssetId,
    pub cost_quantity: Decimal,
    pub share_quantity: Decimal,
    pub share_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharesMintedEvent {
    pub to: Holder,
    pub quantity: Decimal,
    pub new_total_supply: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharesBurnedEvent {
    pub from: Holder,
    pub quantity: Decimal,
    pub new_total_supply: Decimal,
}

// one per owned asset per GAV cycle, for auditability of the valuation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetObservationEvent {
    pub asset: AssetId,
    pub balance: Decimal,
    pub custody_held: Decimal,
    pub holdings: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsAllocatedEvent {
    pub management_reward: Decimal,
    pub performance_reward: Decimal,
    pub reward_share_quantity: Decimal,
    pub share_price: Decimal,
    pub high_water_mark: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMadeEvent {
    pub order_id: OrderId,
    pub exchange: ExchangeId,
    pub exchange_order_id: ExchangeOrderId,
    pub sell_asset: AssetId,
    pub buy_asset: AssetId,
    pub sell_quantity: Decimal,
    pub buy_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTakenEvent {
    pub order_id: OrderId,
    pub exchange: ExchangeId,
    pub exchange_order_id: ExchangeOrderId,
    pub receive_asset: AssetId,
    pub receive_quantity: Decimal,
    pub spend_asset: AssetId,
    pub spend_quantity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order_id: OrderId,
    pub by: ParticipantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSyncedEvent {
    pub order_id: OrderId,
    pub fill_quantity: Decimal,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyRedemptionEvent {
    pub participant: ParticipantId,
    pub share_quantity: Decimal,
    pub payouts: Vec<(AssetId, Decimal)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundShutDownEvent {
    pub reason: ShutdownReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    Manager,
    AccountingInconsistency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleEvent {
    pub enabled: bool,
}
