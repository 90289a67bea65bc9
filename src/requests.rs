// 7.0 requests.rs: queued subscribe/redeem requests. an append-only log; a request's
// position is its identifier for life. only the status field ever changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AssetId, ParticipantId, RequestId, Timestamp, UpdateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Subscribe,
    Redeem,
    // redemption initiated by transferring shares to the fund; shares sit in
    // fund escrow until the request executes or is cancelled
    TokenFallbackRedeem,
}

impl RequestKind {
    pub fn is_redemption(&self) -> bool {
        matches!(self, RequestKind::Redeem | RequestKind::TokenFallbackRedeem)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Active,
    Cancelled,
    Executed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub participant: ParticipantId,
    pub status: RequestStatus,
    pub kind: RequestKind,
    pub asset: AssetId,
    pub share_quantity: Decimal,
    // subscribe: most the participant will pay. redeem: unused (zero).
    pub give_quantity: Decimal,
    // redeem: least the participant will accept. subscribe: unused (zero).
    pub receive_quantity: Decimal,
    pub created_at: Timestamp,
    // oracle update counter at creation; the freshness gate measures from here
    pub update_id_at_creation: UpdateId,
}

impl Request {
    pub fn is_active(&self) -> bool {
        self.status == RequestStatus::Active
    }
}
