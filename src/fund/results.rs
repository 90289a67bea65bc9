// 10.0.2: result types and errors for fund operations.

use rust_decimal::Decimal;

use crate::adapter::AdapterError;
use crate::math::MathError;
use crate::shares::ShareError;
use crate::token::TokenError;
use crate::types::{AssetId, ExchangeId, ExchangeOrderId, OrderId, RequestId};

/// Everything one pricing pass produces: GAV, accrued rewards, NAV, the
/// dilution-adjusted supply, and the share price derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformedCalculations {
    pub gav: Decimal,
    pub management_reward: Decimal,
    pub performance_reward: Decimal,
    pub unclaimed_rewards: Decimal,
    pub nav: Decimal,
    // shares the manager would receive if rewards were allocated right now;
    // priced into the share price before any mint happens
    pub reward_share_quantity: Decimal,
    pub total_supply_with_rewards: Decimal,
    pub share_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct ExecutedRequest {
    pub request_id: RequestId,
    pub cost_quantity: Decimal,
    pub share_quantity: Decimal,
    pub share_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct EmergencyRedemption {
    pub share_quantity: Decimal,
    pub payouts: Vec<(AssetId, Decimal)>,
}

#[derive(Debug, Clone, Copy)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub exchange_order_id: ExchangeOrderId,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FundError {
    #[error("caller is not permitted to perform this operation")]
    PermissionDenied,

    #[error("precondition failed: {0}")]
    PreconditionFailed(&'static str),

    #[error("no recent price for asset {0:?}")]
    StalePrice(AssetId),

    #[error("request {0:?} is not yet executable")]
    NotYetExecutable(RequestId),

    #[error("computed quantity {computed} breaches bound {bound}")]
    SlippageExceeded { computed: Decimal, bound: Decimal },

    #[error("owned-asset ceiling of {0} reached")]
    CapacityExceeded(usize),

    #[error("asset transfer failed: {0}")]
    TransferFailed(#[from] TokenError),

    #[error("share ledger error: {0}")]
    Shares(#[from] ShareError),

    #[error("exchange adapter call failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("pro-rata owed {owed} of asset {asset:?} exceeds held balance {held}; fund shut down")]
    AccountingInconsistency {
        asset: AssetId,
        owed: Decimal,
        held: Decimal,
    },

    #[error("share price requested with zero share supply")]
    DivisionByZero,

    #[error("arithmetic overflow in fund calculation")]
    ArithmeticOverflow,

    #[error("request {0:?} not found")]
    RequestNotFound(RequestId),

    #[error("order {0:?} not found")]
    OrderNotFound(OrderId),

    #[error("order {0:?} not found on exchange")]
    ExchangeOrderNotFound(ExchangeOrderId),

    #[error("exchange {0:?} not found")]
    ExchangeNotFound(ExchangeId),
}

impl From<MathError> for FundError {
    fn from(error: MathError) -> Self {
        match error {
            MathError::Overflow => FundError::ArithmeticOverflow,
            MathError::DivisionByZero => FundError::DivisionByZero,
        }
    }
}
