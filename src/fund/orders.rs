// 10.3 fund/orders.rs: the order router. manager trading through pluggable exchange
// adapters, with custody recorded under (exchange, sell asset). adapter calls are
// opaque; the router only validates reported outcomes against its own invariants.
// within one operation nothing fallible runs after a successful adapter call, so
// the rollback discipline never has to unwind venue-side state.

use rust_decimal::Decimal;

use super::core::Fund;
use super::results::{FundError, PlacedOrder};
use crate::compliance::Compliance;
use crate::events::{
    EventPayload, OrderCancelledEvent, OrderMadeEvent, OrderSyncedEvent, OrderTakenEvent,
};
use crate::math;
use crate::oracle::{PriceOracle, PRICE_DECIMALS};
use crate::orders::{Order, OrderKind, OrderStatus};
use crate::risk::RiskManagement;
use crate::token::Holder;
use crate::types::{AssetId, ExchangeId, ExchangeOrderId, OrderId, ParticipantId};

impl<O: PriceOracle, C: Compliance, R: RiskManagement> Fund<O, C, R> {
    /// Place a make order: offer `sell_quantity` of `sell_asset` for
    /// `buy_quantity` of `buy_asset` on the given exchange. Manager only; one
    /// open make order per sell asset at a time.
    pub fn make_order(
        &mut self,
        caller: ParticipantId,
        exchange: ExchangeId,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> Result<PlacedOrder, FundError> {
        self.with_rollback(|fund| {
            fund.require_manager(caller)?;
            fund.require_not_shut_down()?;
            fund.require_not_share_asset(sell_asset)?;
            fund.require_not_share_asset(buy_asset)?;

            if sell_quantity <= Decimal::ZERO || buy_quantity <= Decimal::ZERO {
                return Err(FundError::PreconditionFailed("order quantities must be positive"));
            }

            // one open make order per sell asset; custody_held refreshes lazily
            if !fund.custody_held(sell_asset).is_zero() {
                return Err(FundError::PreconditionFailed(
                    "an open make order already holds custody of the sell asset",
                ));
            }

            fund.require_recent_price(sell_asset)?;
            fund.require_recent_price(buy_asset)?;
            let reference = fund
                .modules
                .oracle
                .reference_price(sell_asset, buy_asset)
                .ok_or(FundError::StalePrice(sell_asset))?;

            let order_price = math::checked_div(buy_quantity, sell_quantity)?;
            if !fund.modules.risk.is_make_permitted(
                order_price,
                reference.price,
                sell_asset,
                buy_asset,
                sell_quantity,
                buy_quantity,
            ) {
                return Err(FundError::PreconditionFailed("risk policy rejected the order"));
            }

            fund.require_capacity_for(buy_asset)?;

            // escrow approval, then the venue pulls the sell quantity
            fund.state
                .token
                .approve(sell_asset, Holder::Fund, Holder::Exchange(exchange), sell_quantity);

            let slot = fund
                .modules
                .exchanges
                .get_mut(exchange.index())
                .ok_or(FundError::ExchangeNotFound(exchange))?;
            let exchange_order_id = slot.adapter.make_order(
                &mut fund.state.token,
                exchange,
                sell_asset,
                buy_asset,
                sell_quantity,
                buy_quantity,
            )?;
            if exchange_order_id.is_zero() {
                return Err(FundError::PreconditionFailed("venue reported no order id"));
            }

            fund.state
                .ledger
                .record_make_order(exchange, sell_asset, exchange_order_id);
            fund.state.ledger.add_owned(buy_asset);

            let order_id = OrderId(fund.state.orders.len() as u64);
            fund.state.orders.push(Order {
                id: order_id,
                exchange,
                exchange_order_id,
                status: OrderStatus::Active,
                kind: OrderKind::Make,
                sell_asset,
                buy_asset,
                sell_quantity,
                buy_quantity,
                created_at: fund.current_time,
                fill_quantity: Decimal::ZERO,
            });

            fund.emit_event(EventPayload::OrderMade(OrderMadeEvent {
                order_id,
                exchange,
                exchange_order_id,
                sell_asset,
                buy_asset,
                sell_quantity,
                buy_quantity,
            }));

            Ok(PlacedOrder {
                order_id,
                exchange_order_id,
            })
        })
    }

    /// Take `receive_quantity` of a resting order's sell asset, spending the
    /// proportional amount of its buy asset. Manager only.
    pub fn take_order(
        &mut self,
        caller: ParticipantId,
        exchange: ExchangeId,
        exchange_order_id: ExchangeOrderId,
        receive_quantity: Decimal,
    ) -> Result<OrderId, FundError> {
        self.with_rollback(|fund| {
            fund.require_manager(caller)?;
            fund.require_not_shut_down()?;

            let terms = fund
                .modules
                .exchanges
                .get(exchange.index())
                .ok_or(FundError::ExchangeNotFound(exchange))?
                .adapter
                .get_order(exchange_order_id)
                .ok_or(FundError::ExchangeOrderNotFound(exchange_order_id))?;

            fund.require_not_share_asset(terms.sell_asset)?;
            fund.require_not_share_asset(terms.buy_asset)?;

            if receive_quantity <= Decimal::ZERO {
                return Err(FundError::PreconditionFailed("order quantities must be positive"));
            }
            if receive_quantity > terms.sell_quantity {
                return Err(FundError::PreconditionFailed(
                    "receive quantity exceeds the order's open quantity",
                ));
            }

            fund.require_recent_price(terms.sell_asset)?;
            fund.require_recent_price(terms.buy_asset)?;
            let reference = fund
                .modules
                .oracle
                .reference_price(terms.sell_asset, terms.buy_asset)
                .ok_or(FundError::StalePrice(terms.sell_asset))?;

            let order_price = math::checked_div(terms.buy_quantity, terms.sell_quantity)?;
            if !fund.modules.risk.is_take_permitted(
                order_price,
                reference.price,
                terms.sell_asset,
                terms.buy_asset,
                terms.sell_quantity,
                terms.buy_quantity,
            ) {
                return Err(FundError::PreconditionFailed("risk policy rejected the order"));
            }

            // the fund receives the maker's sell asset
            fund.require_capacity_for(terms.sell_asset)?;

            // proportional spend, same truncation the venue applies
            let spend_quantity = math::mul_div(
                receive_quantity,
                terms.buy_quantity,
                terms.sell_quantity,
                PRICE_DECIMALS,
            )?;

            let slot = fund
                .modules
                .exchanges
                .get_mut(exchange.index())
                .ok_or(FundError::ExchangeNotFound(exchange))?;
            slot.adapter.take_order(
                &mut fund.state.token,
                exchange,
                Holder::Fund,
                exchange_order_id,
                receive_quantity,
            )?;

            fund.state.ledger.add_owned(terms.sell_asset);

            let order_id = OrderId(fund.state.orders.len() as u64);
            fund.state.orders.push(Order {
                id: order_id,
                exchange,
                exchange_order_id,
                status: OrderStatus::FullyFilled,
                kind: OrderKind::Take,
                sell_asset: terms.sell_asset,
                buy_asset: terms.buy_asset,
                sell_quantity: receive_quantity,
                buy_quantity: spend_quantity,
                created_at: fund.current_time,
                fill_quantity: receive_quantity,
            });

            fund.emit_event(EventPayload::OrderTaken(OrderTakenEvent {
                order_id,
                exchange,
                exchange_order_id,
                receive_asset: terms.sell_asset,
                receive_quantity,
                spend_asset: terms.buy_asset,
                spend_quantity,
            }));

            Ok(order_id)
        })
    }

    /// Cancel an open make order. Manager only, or anyone once the fund is
    /// shut down. Unspent escrow returns to the fund; the custody entry clears
    /// lazily on the next custody_held pass.
    pub fn cancel_order(&mut self, caller: ParticipantId, id: OrderId) -> Result<(), FundError> {
        self.with_rollback(|fund| {
            let order = fund
                .state
                .orders
                .get(id.0 as usize)
                .cloned()
                .ok_or(FundError::OrderNotFound(id))?;

            if caller != fund.config.manager && !fund.state.shut_down {
                return Err(FundError::PermissionDenied);
            }
            if order.kind != OrderKind::Make || !order.is_open() {
                return Err(FundError::PreconditionFailed("order is not cancellable"));
            }

            let slot = fund
                .modules
                .exchanges
                .get_mut(order.exchange.index())
                .ok_or(FundError::ExchangeNotFound(order.exchange))?;
            slot.adapter
                .cancel_order(&mut fund.state.token, order.exchange, order.exchange_order_id)?;

            fund.state.orders[id.0 as usize].status = OrderStatus::Cancelled;
            fund.emit_event(EventPayload::OrderCancelled(OrderCancelledEvent {
                order_id: id,
                by: caller,
            }));
            Ok(())
        })
    }

    /// Reconcile a make order's fill state against the venue. Callable by
    /// anyone; pure bookkeeping.
    pub fn sync_order(&mut self, id: OrderId) -> Result<OrderStatus, FundError> {
        self.with_rollback(|fund| {
            let order = fund
                .state
                .orders
                .get(id.0 as usize)
                .cloned()
                .ok_or(FundError::OrderNotFound(id))?;

            if order.kind != OrderKind::Make || !order.is_open() {
                return Err(FundError::PreconditionFailed("order is not open"));
            }

            let remaining = fund
                .modules
                .exchanges
                .get(order.exchange.index())
                .ok_or(FundError::ExchangeNotFound(order.exchange))?
                .adapter
                .get_order(order.exchange_order_id)
                .map(|terms| terms.sell_quantity)
                .unwrap_or(Decimal::ZERO);

            let fill_quantity = (order.sell_quantity - remaining).max(Decimal::ZERO);
            let status = if remaining.is_zero() {
                OrderStatus::FullyFilled
            } else if fill_quantity > Decimal::ZERO {
                OrderStatus::PartiallyFilled
            } else {
                OrderStatus::Active
            };

            let entry = &mut fund.state.orders[id.0 as usize];
            entry.fill_quantity = fill_quantity;
            entry.status = status;

            fund.emit_event(EventPayload::OrderSynced(OrderSyncedEvent {
                order_id: id,
                fill_quantity,
                status,
            }));
            Ok(status)
        })
    }

    // ---- helpers ----

    fn require_not_share_asset(&self, asset: AssetId) -> Result<(), FundError> {
        if asset == self.config.share_asset {
            return Err(FundError::PreconditionFailed("fund cannot trade its own shares"));
        }
        Ok(())
    }

    fn require_capacity_for(&self, asset: AssetId) -> Result<(), FundError> {
        if !self.state.ledger.is_owned(asset)
            && self.state.ledger.owned_count() >= self.config.owned_asset_ceiling
        {
            return Err(FundError::CapacityExceeded(self.config.owned_asset_ceiling));
        }
        Ok(())
    }
}
