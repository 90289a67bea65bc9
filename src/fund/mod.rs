// 10.0: the fund aggregate. coordinates asset accounting, reward accrual, share
// pricing, the request queue, and the order router over the module boundary
// (oracle, compliance, risk, exchange adapters). deterministic with no external I/O;
// every public mutating operation is all-or-nothing.

mod core;
mod fees;
mod orders;
mod pricing;
mod requests;
mod results;

pub use self::core::{ExchangeSlot, Fund, Modules};
pub use results::{
    EmergencyRedemption, ExecutedRequest, FundError, PerformedCalculations, PlacedOrder,
};
