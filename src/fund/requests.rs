// 10.2 fund/requests.rs: the request engine. subscribe/redeem requests queue up,
// pass a freshness gate, and execute against a freshly computed share price.
// emergency_redeem is the price-feed-independent escape hatch.

use rust_decimal::Decimal;

use super::core::Fund;
use super::results::{EmergencyRedemption, ExecutedRequest, FundError};
use crate::compliance::Compliance;
use crate::events::{
    EmergencyRedemptionEvent, EventPayload, RequestCancelledEvent, RequestCreatedEvent,
    RequestExecutedEvent, SharesBurnedEvent, SharesMintedEvent,
};
use crate::math;
use crate::oracle::PriceOracle;
use crate::requests::{Request, RequestKind, RequestStatus};
use crate::risk::RiskManagement;
use crate::token::Holder;
use crate::types::{AssetId, ParticipantId, RequestId};

impl<O: PriceOracle, C: Compliance, R: RiskManagement> Fund<O, C, R> {
    pub fn request_subscription(
        &mut self,
        participant: ParticipantId,
        asset: AssetId,
        give_quantity: Decimal,
        share_quantity: Decimal,
    ) -> Result<RequestId, FundError> {
        self.with_rollback(|fund| {
            fund.require_not_shut_down()?;
            if !fund.state.subscriptions_allowed {
                return Err(FundError::PreconditionFailed("subscriptions are disabled"));
            }
            fund.require_settlement_asset(asset)?;
            if !fund
                .modules
                .compliance
                .is_subscription_permitted(participant, give_quantity, share_quantity)
            {
                return Err(FundError::PermissionDenied);
            }

            Ok(fund.push_request(
                participant,
                RequestKind::Subscribe,
                asset,
                share_quantity,
                give_quantity,
                Decimal::ZERO,
            ))
        })
    }

    pub fn request_redemption(
        &mut self,
        participant: ParticipantId,
        asset: AssetId,
        share_quantity: Decimal,
        receive_quantity: Decimal,
    ) -> Result<RequestId, FundError> {
        self.with_rollback(|fund| {
            fund.check_redemption_request(participant, asset, share_quantity, receive_quantity)?;

            Ok(fund.push_request(
                participant,
                RequestKind::Redeem,
                asset,
                share_quantity,
                Decimal::ZERO,
                receive_quantity,
            ))
        })
    }

    /// Redemption initiated by transferring shares to the fund itself. The
    /// shares sit in fund escrow until execution burns them or cancellation
    /// returns them.
    pub fn request_redemption_by_transfer(
        &mut self,
        participant: ParticipantId,
        asset: AssetId,
        share_quantity: Decimal,
        receive_quantity: Decimal,
    ) -> Result<RequestId, FundError> {
        self.with_rollback(|fund| {
            fund.check_redemption_request(participant, asset, share_quantity, receive_quantity)?;

            fund.state
                .shares
                .transfer(Holder::Participant(participant), Holder::Fund, share_quantity)?;

            Ok(fund.push_request(
                participant,
                RequestKind::TokenFallbackRedeem,
                asset,
                share_quantity,
                Decimal::ZERO,
                receive_quantity,
            ))
        })
    }

    /// Cancel an active request. Only its participant may cancel, or anyone
    /// once the fund is shut down (emergency exit).
    pub fn cancel_request(&mut self, caller: ParticipantId, id: RequestId) -> Result<(), FundError> {
        self.with_rollback(|fund| {
            let request = fund
                .state
                .requests
                .get(id.0 as usize)
                .cloned()
                .ok_or(FundError::RequestNotFound(id))?;

            if !request.is_active() {
                return Err(FundError::PreconditionFailed("request is not active"));
            }
            if caller != request.participant && !fund.state.shut_down {
                return Err(FundError::PermissionDenied);
            }

            if request.kind == RequestKind::TokenFallbackRedeem {
                fund.state.shares.transfer(
                    Holder::Fund,
                    Holder::Participant(request.participant),
                    request.share_quantity,
                )?;
            }

            fund.state.requests[id.0 as usize].status = RequestStatus::Cancelled;
            fund.emit_event(EventPayload::RequestCancelled(RequestCancelledEvent {
                request_id: id,
                by: caller,
            }));
            Ok(())
        })
    }

    /// Execute an active request against a freshly computed share price.
    /// Callable by anyone once the freshness gate is satisfied.
    pub fn execute_request(&mut self, id: RequestId) -> Result<ExecutedRequest, FundError> {
        self.with_rollback(|fund| fund.execute_request_inner(id))
    }

    fn execute_request_inner(&mut self, id: RequestId) -> Result<ExecutedRequest, FundError> {
        let request = self
            .state
            .requests
            .get(id.0 as usize)
            .cloned()
            .ok_or(FundError::RequestNotFound(id))?;

        if !request.is_active() {
            return Err(FundError::PreconditionFailed("request is not active"));
        }

        if request.kind.is_redemption() {
            let holder = Self::redemption_share_holder(&request);
            if self.state.shares.balance_of(holder) < request.share_quantity {
                return Err(FundError::PreconditionFailed(
                    "participant does not hold the requested shares",
                ));
            }
        }

        // freshness gate: one pricing interval and two oracle updates since
        // creation. bypassed only for the bootstrap subscription into an
        // empty fund, which has no meaningful prior price to front-run.
        let bootstrap =
            self.state.shares.total_supply().is_zero() && request.kind == RequestKind::Subscribe;
        if !bootstrap {
            let interval_elapsed = self.current_time.as_millis()
                >= request.created_at.as_millis() + self.modules.oracle.interval_ms();
            let updates_seen = self.modules.oracle.last_update_id()
                >= request.update_id_at_creation.advanced_by(2);
            if !interval_elapsed || !updates_seen {
                return Err(FundError::NotYetExecutable(id));
            }
        }

        self.require_recent_price(self.config.denomination_asset)?;
        for asset in self.state.ledger.owned_assets().to_vec() {
            self.require_recent_price(asset)?;
        }

        let calc = self.perform_calculations_inner()?;

        // cost in denomination units, then through the inverted price when the
        // request settles in the native asset
        let denomination = self.config.denomination_asset;
        let mut cost_quantity = self
            .state
            .token
            .truncate_to_asset(denomination, math::checked_mul(request.share_quantity, calc.share_price)?)?;
        if request.asset != denomination {
            let inverted = self
                .modules
                .oracle
                .inverted_price(request.asset)
                .ok_or(FundError::StalePrice(request.asset))?;
            if !inverted.is_recent {
                return Err(FundError::StalePrice(request.asset));
            }
            cost_quantity = self
                .state
                .token
                .truncate_to_asset(request.asset, math::checked_mul(cost_quantity, inverted.price)?)?;
        }

        let participant = Holder::Participant(request.participant);
        match request.kind {
            RequestKind::Subscribe => {
                // investor never pays more than they offered
                if cost_quantity > request.give_quantity {
                    return Err(FundError::SlippageExceeded {
                        computed: cost_quantity,
                        bound: request.give_quantity,
                    });
                }

                self.state.token.transfer_from(
                    request.asset,
                    Holder::Fund,
                    participant,
                    Holder::Fund,
                    cost_quantity,
                )?;
                self.state.shares.mint(participant, request.share_quantity);
                self.state.ledger.add_owned(request.asset);

                self.emit_event(EventPayload::SharesMinted(SharesMintedEvent {
                    to: participant,
                    quantity: request.share_quantity,
                    new_total_supply: self.state.shares.total_supply(),
                }));
            }
            RequestKind::Redeem | RequestKind::TokenFallbackRedeem => {
                // investor never receives less than they demanded
                if request.receive_quantity > cost_quantity {
                    return Err(FundError::SlippageExceeded {
                        computed: cost_quantity,
                        bound: request.receive_quantity,
                    });
                }

                let holder = Self::redemption_share_holder(&request);
                self.state.shares.burn(holder, request.share_quantity)?;
                self.emit_event(EventPayload::SharesBurned(SharesBurnedEvent {
                    from: holder,
                    quantity: request.share_quantity,
                    new_total_supply: self.state.shares.total_supply(),
                }));

                self.state
                    .token
                    .transfer(request.asset, Holder::Fund, participant, cost_quantity)?;
            }
        }

        self.state.requests[id.0 as usize].status = RequestStatus::Executed;
        self.emit_event(EventPayload::RequestExecuted(RequestExecutedEvent {
            request_id: id,
            participant: request.participant,
            kind: request.kind,
            asset: request.asset,
            cost_quantity,
            share_quantity: request.share_quantity,
            share_price: calc.share_price,
        }));

        Ok(ExecutedRequest {
            request_id: id,
            cost_quantity,
            share_quantity: request.share_quantity,
            share_price: calc.share_price,
        })
    }

    /// Redeem a pro-rata slice of actual on-hand balances, ignoring prices
    /// entirely. If accounting says the fund owes more of an asset than it
    /// directly holds (e.g. unreturned exchange custody), the fund shuts down
    /// defensively and nothing is paid out or burned.
    pub fn emergency_redeem(
        &mut self,
        participant: ParticipantId,
        share_quantity: Decimal,
    ) -> Result<EmergencyRedemption, FundError> {
        self.with_rollback(|fund| {
            let total_supply = fund.state.shares.total_supply();
            if total_supply.is_zero() {
                return Err(FundError::PreconditionFailed("fund has no shares outstanding"));
            }

            let holder = Holder::Participant(participant);
            if fund.state.shares.balance_of(holder) < share_quantity {
                return Err(FundError::PreconditionFailed(
                    "participant does not hold the requested shares",
                ));
            }

            // pass 1: compute every owed amount before touching anything
            let owned: Vec<AssetId> = fund.state.ledger.owned_assets().to_vec();
            let mut payouts: Vec<(AssetId, Decimal)> = Vec::new();
            for asset in owned {
                let balance = fund.state.token.balance_of(asset, Holder::Fund);
                let custody = fund.custody_held(asset);
                let holdings = math::checked_add(balance, custody)?;
                if holdings.is_zero() {
                    continue;
                }

                let owed = math::mul_div(
                    holdings,
                    share_quantity,
                    total_supply,
                    fund.state.token.decimals(asset)?,
                )?;

                if owed > balance {
                    return Err(FundError::AccountingInconsistency {
                        asset,
                        owed,
                        held: balance,
                    });
                }
                if !owed.is_zero() {
                    payouts.push((asset, owed));
                }
            }

            // pass 2: burn before transferring
            fund.state.shares.burn(holder, share_quantity)?;
            fund.emit_event(EventPayload::SharesBurned(SharesBurnedEvent {
                from: holder,
                quantity: share_quantity,
                new_total_supply: fund.state.shares.total_supply(),
            }));

            for (asset, owed) in &payouts {
                fund.state
                    .token
                    .transfer(*asset, Holder::Fund, holder, *owed)?;
            }

            fund.emit_event(EventPayload::EmergencyRedemption(EmergencyRedemptionEvent {
                participant,
                share_quantity,
                payouts: payouts.clone(),
            }));

            Ok(EmergencyRedemption {
                share_quantity,
                payouts,
            })
        })
    }

    // ---- helpers ----

    fn check_redemption_request(
        &self,
        participant: ParticipantId,
        asset: AssetId,
        share_quantity: Decimal,
        receive_quantity: Decimal,
    ) -> Result<(), FundError> {
        self.require_not_shut_down()?;
        if !self.state.redemptions_allowed {
            return Err(FundError::PreconditionFailed("redemptions are disabled"));
        }
        self.require_settlement_asset(asset)?;
        if !self
            .modules
            .compliance
            .is_redemption_permitted(participant, share_quantity, receive_quantity)
        {
            return Err(FundError::PermissionDenied);
        }
        Ok(())
    }

    fn require_settlement_asset(&self, asset: AssetId) -> Result<(), FundError> {
        if asset != self.config.denomination_asset && asset != self.config.native_asset {
            return Err(FundError::PreconditionFailed(
                "requests settle in the denomination or native asset",
            ));
        }
        Ok(())
    }

    fn redemption_share_holder(request: &Request) -> Holder {
        match request.kind {
            // escrowed with the fund at request creation
            RequestKind::TokenFallbackRedeem => Holder::Fund,
            _ => Holder::Participant(request.participant),
        }
    }

    fn push_request(
        &mut self,
        participant: ParticipantId,
        kind: RequestKind,
        asset: AssetId,
        share_quantity: Decimal,
        give_quantity: Decimal,
        receive_quantity: Decimal,
    ) -> RequestId {
        let id = RequestId(self.state.requests.len() as u64);
        self.state.requests.push(Request {
            id,
            participant,
            status: RequestStatus::Active,
            kind,
            asset,
            share_quantity,
            give_quantity,
            receive_quantity,
            created_at: self.current_time,
            update_id_at_creation: self.modules.oracle.last_update_id(),
        });

        self.emit_event(EventPayload::RequestCreated(RequestCreatedEvent {
            request_id: id,
            participant,
            kind,
            asset,
            share_quantity,
            give_quantity,
            receive_quantity,
        }));
        id
    }
}
