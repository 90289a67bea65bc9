// fund-core: pooled investment fund engine.
// accounting-first architecture: share pricing and asset accounting take priority.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AssetId, ParticipantId, RequestId, Timestamp
//   2.x  math.rs: checked fixed-point arithmetic, truncation, ratio scaling
//   3.x  token.rs: ERC20-style multi-asset ledger (balances, allowances)
//   4.x  ledger.rs: owned-asset set, exchange custody tracking
//   5.x  shares.rs: share supply, mint/burn, value-per-share rule
//   6.x  fees.rs: management/performance reward accrual, high-water-mark
//   7.x  requests.rs, orders.rs: append-only request/order records
//   8.x  events.rs: state transition events for audit
//   9.x  config.rs: fund identities, rates, owned-asset ceiling
//   10.x fund/: the aggregate: pricing, reward allocation, request engine, order router
//        oracle.rs / compliance.rs / risk.rs / adapter.rs: collaborator boundaries (mocked)

// core accounting modules
pub mod config;
pub mod fees;
pub mod fund;
pub mod ledger;
pub mod math;
pub mod orders;
pub mod requests;
pub mod shares;
pub mod token;
pub mod types;

// collaborator boundaries
pub mod adapter;
pub mod compliance;
pub mod oracle;
pub mod risk;

// audit trail
pub mod events;

// re exports for convenience
pub use config::*;
pub use events::*;
pub use fees::*;
pub use fund::*;
pub use ledger::*;
pub use orders::*;
pub use requests::*;
pub use shares::*;
pub use types::*;
pub use adapter::{AdapterError, ExchangeAdapter, MockExchange, OrderTerms};
pub use compliance::{Compliance, OpenCompliance, WhitelistCompliance};
pub use math::MathError;
pub use oracle::{MockPriceOracle, PriceOracle, PriceQuote, PRICE_DECIMALS};
pub use risk::{PriceTolerancePolicy, RiskManagement};
pub use token::{Holder, TokenError, TokenLedger};
