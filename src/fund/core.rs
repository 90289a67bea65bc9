// 10.1 fund/core.rs: the fund struct itself. all state lives here, behind the
// snapshot/rollback discipline that gives every public operation all-or-nothing
// semantics: a failed operation is indistinguishable from one never attempted,
// except that an accounting inconsistency leaves the shutdown flag set.

use rust_decimal::Decimal;

use super::results::FundError;
use crate::adapter::ExchangeAdapter;
use crate::compliance::Compliance;
use crate::config::FundConfig;
use crate::events::{Event, EventId, EventPayload, FundShutDownEvent, ShutdownReason, ToggleEvent};
use crate::fees::Calculations;
use crate::ledger::AssetLedger;
use crate::oracle::PriceOracle;
use crate::orders::Order;
use crate::requests::Request;
use crate::risk::RiskManagement;
use crate::shares::ShareLedger;
use crate::token::{Holder, TokenLedger};
use crate::types::{AssetId, ExchangeId, OrderId, ParticipantId, RequestId, Timestamp};

/// One (exchange, adapter) pair in the module registry. The slot's position is
/// its `ExchangeId`.
pub struct ExchangeSlot {
    pub id: ExchangeId,
    pub name: String,
    pub adapter: Box<dyn ExchangeAdapter>,
}

impl ExchangeSlot {
    pub fn new(id: ExchangeId, name: &str, adapter: Box<dyn ExchangeAdapter>) -> Self {
        Self {
            id,
            name: name.to_string(),
            adapter,
        }
    }
}

/// References to the fund's external collaborators. Set once at construction;
/// immutable thereafter (no hot-swap).
pub struct Modules<O, C, R> {
    pub oracle: O,
    pub compliance: C,
    pub risk: R,
    pub exchanges: Vec<ExchangeSlot>,
}

// every field a public operation may mutate. cloned wholesale for rollback.
#[derive(Debug, Clone)]
pub(crate) struct FundState {
    pub token: TokenLedger,
    pub shares: ShareLedger,
    pub ledger: AssetLedger,
    pub calculations: Calculations,
    pub requests: Vec<Request>,
    pub orders: Vec<Order>,
    pub shut_down: bool,
    pub subscriptions_allowed: bool,
    pub redemptions_allowed: bool,
    pub events: Vec<Event>,
    pub next_event_id: u64,
}

pub struct Fund<O, C, R> {
    pub(crate) config: FundConfig,
    pub(crate) modules: Modules<O, C, R>,
    pub(crate) state: FundState,
    pub(crate) current_time: Timestamp,
}

impl<O: PriceOracle, C: Compliance, R: RiskManagement> Fund<O, C, R> {
    pub fn new(config: FundConfig, modules: Modules<O, C, R>, token: TokenLedger, now: Timestamp) -> Self {
        let ledger = AssetLedger::new(config.denomination_asset);
        Self {
            config,
            modules,
            state: FundState {
                token,
                shares: ShareLedger::new(),
                ledger,
                calculations: Calculations::initial(now),
                requests: Vec::new(),
                orders: Vec::new(),
                shut_down: false,
                subscriptions_allowed: true,
                redemptions_allowed: true,
                events: Vec::new(),
                next_event_id: 1,
            },
            current_time: now,
        }
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn config(&self) -> &FundConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.modules.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.modules.oracle
    }

    pub fn exchange(&self, id: ExchangeId) -> Option<&ExchangeSlot> {
        self.modules.exchanges.get(id.index())
    }

    pub fn exchange_count(&self) -> usize {
        self.modules.exchanges.len()
    }

    pub fn token_ledger(&self) -> &TokenLedger {
        &self.state.token
    }

    // test and simulation access; real deployments drive balances via transfers
    pub fn token_ledger_mut(&mut self) -> &mut TokenLedger {
        &mut self.state.token
    }

    pub fn total_supply(&self) -> Decimal {
        self.state.shares.total_supply()
    }

    pub fn share_balance_of(&self, participant: ParticipantId) -> Decimal {
        self.state.shares.balance_of(Holder::Participant(participant))
    }

    pub fn calculations(&self) -> &Calculations {
        &self.state.calculations
    }

    pub fn owned_assets(&self) -> &[AssetId] {
        self.state.ledger.owned_assets()
    }

    pub fn request(&self, id: RequestId) -> Option<&Request> {
        self.state.requests.get(id.0 as usize)
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.len()
    }

    pub fn last_request_id(&self) -> Option<RequestId> {
        self.state.requests.last().map(|r| r.id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.state.orders.get(id.0 as usize)
    }

    pub fn order_count(&self) -> usize {
        self.state.orders.len()
    }

    pub fn last_order_id(&self) -> Option<OrderId> {
        self.state.orders.last().map(|o| o.id)
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.shut_down
    }

    pub fn subscriptions_allowed(&self) -> bool {
        self.state.subscriptions_allowed
    }

    pub fn redemptions_allowed(&self) -> bool {
        self.state.redemptions_allowed
    }

    pub fn events(&self) -> &[Event] {
        &self.state.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.state.events.len().saturating_sub(count);
        &self.state.events[start..]
    }

    // ---- administration ----

    pub fn shut_down(&mut self, caller: ParticipantId) -> Result<(), FundError> {
        self.require_manager(caller)?;
        self.state.shut_down = true;
        self.emit_event(EventPayload::FundShutDown(FundShutDownEvent {
            reason: ShutdownReason::Manager,
        }));
        Ok(())
    }

    pub fn set_subscriptions_allowed(
        &mut self,
        caller: ParticipantId,
        enabled: bool,
    ) -> Result<(), FundError> {
        self.require_manager(caller)?;
        self.state.subscriptions_allowed = enabled;
        self.emit_event(EventPayload::SubscriptionToggled(ToggleEvent { enabled }));
        Ok(())
    }

    pub fn set_redemptions_allowed(
        &mut self,
        caller: ParticipantId,
        enabled: bool,
    ) -> Result<(), FundError> {
        self.require_manager(caller)?;
        self.state.redemptions_allowed = enabled;
        self.emit_event(EventPayload::RedemptionToggled(ToggleEvent { enabled }));
        Ok(())
    }

    // ---- shared guards and plumbing ----

    pub(crate) fn require_manager(&self, caller: ParticipantId) -> Result<(), FundError> {
        if caller != self.config.manager {
            return Err(FundError::PermissionDenied);
        }
        Ok(())
    }

    pub(crate) fn require_not_shut_down(&self) -> Result<(), FundError> {
        if self.state.shut_down {
            return Err(FundError::PreconditionFailed("fund is shut down"));
        }
        Ok(())
    }

    pub(crate) fn require_recent_price(&self, asset: AssetId) -> Result<(), FundError> {
        if !self.modules.oracle.has_recent_price(asset) {
            return Err(FundError::StalePrice(asset));
        }
        Ok(())
    }

    pub(crate) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.state.next_event_id), self.current_time, payload);
        self.state.next_event_id += 1;
        self.state.events.push(event);
    }

    /// Run `op` all-or-nothing: on any error the entire fund state, including
    /// the event log, is restored to its pre-call value. An accounting
    /// inconsistency is the one failure with an observable side effect: the
    /// shutdown flag survives the rollback.
    pub(crate) fn with_rollback<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, FundError>,
    ) -> Result<T, FundError> {
        let snapshot = self.state.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                self.state = snapshot;
                if matches!(error, FundError::AccountingInconsistency { .. }) {
                    self.state.shut_down = true;
                    self.emit_event(EventPayload::FundShutDown(FundShutDownEvent {
                        reason: ShutdownReason::AccountingInconsistency,
                    }));
                }
                Err(error)
            }
        }
    }
}
