// adapter.rs: pluggable exchange venues. the order router speaks only this trait;
// adapter-internal behavior is opaque to it. escrow moves go through the fund's
// token ledger so the venue's custody is visible to GAV accounting.
//
// MockExchange is the in-memory venue used by tests and the simulation binary.
// it hands out a shared handle (cheap clone) so a test can keep one side and the
// fund's module registry the other, simulating counterparty fills mid-scenario.

use rust_decimal::Decimal;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::math;
use crate::oracle::PRICE_DECIMALS;
use crate::token::{Holder, TokenError, TokenLedger};
use crate::types::{AssetId, ExchangeId, ExchangeOrderId};

/// Terms of a resting order as reported by the venue. Quantities are what
/// remains open, not the original size.
#[derive(Debug, Clone, Copy)]
pub struct OrderTerms {
    pub sell_asset: AssetId,
    pub buy_asset: AssetId,
    pub sell_quantity: Decimal,
    pub buy_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("order {0:?} not found on exchange")]
    UnknownOrder(ExchangeOrderId),

    #[error("requested {requested} exceeds open quantity {available}")]
    InsufficientQuantity { requested: Decimal, available: Decimal },

    #[error("escrow transfer failed: {0}")]
    Escrow(#[from] TokenError),

    #[error("venue rejected the order")]
    Rejected,
}

pub trait ExchangeAdapter {
    /// Place a make order on behalf of the fund. The adapter pulls the sell
    /// quantity into exchange escrow (the router approves it first) and
    /// returns the venue's order id. A zero id means the venue failed.
    fn make_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> Result<ExchangeOrderId, AdapterError>;

    /// Take `receive_quantity` of a resting order's sell asset, paying the
    /// proportional amount of its buy asset from `taker`.
    fn take_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        taker: Holder,
        order_id: ExchangeOrderId,
        receive_quantity: Decimal,
    ) -> Result<(), AdapterError>;

    /// Cancel a resting order, returning unspent escrow to its maker.
    fn cancel_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        order_id: ExchangeOrderId,
    ) -> Result<(), AdapterError>;

    fn get_order(&self, order_id: ExchangeOrderId) -> Option<OrderTerms>;

    fn last_order_id(&self) -> ExchangeOrderId;
}

#[derive(Debug, Clone)]
struct VenueOrder {
    maker: Holder,
    sell_asset: AssetId,
    buy_asset: AssetId,
    original_sell: Decimal,
    original_buy: Decimal,
    remaining_sell: Decimal,
}

impl VenueOrder {
    // remaining buy quantity, proportional to remaining sell
    fn remaining_buy(&self) -> Decimal {
        if self.original_sell.is_zero() {
            return Decimal::ZERO;
        }
        math::truncate(
            self.remaining_sell * self.original_buy / self.original_sell,
            PRICE_DECIMALS,
        )
    }
}

#[derive(Debug, Default)]
struct VenueBook {
    next_id: u64,
    orders: HashMap<ExchangeOrderId, VenueOrder>,
    last_order_id: ExchangeOrderId,
    // test hooks
    reject_next_make: bool,
    zero_id_next_make: bool,
}

/// In-memory venue. Cloning yields another handle to the same book.
#[derive(Debug, Clone, Default)]
pub struct MockExchange {
    book: Rc<RefCell<VenueBook>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a third-party resting order, escrowing the maker's sell quantity.
    pub fn seed_order(
        &self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        maker: Holder,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> Result<ExchangeOrderId, AdapterError> {
        ledger.transfer(sell_asset, maker, Holder::Exchange(exchange), sell_quantity)?;
        Ok(self.insert_order(maker, sell_asset, buy_asset, sell_quantity, buy_quantity))
    }

    /// Simulate an external counterparty partially or fully filling an order.
    pub fn fill_order(
        &self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        taker: Holder,
        order_id: ExchangeOrderId,
        receive_quantity: Decimal,
    ) -> Result<(), AdapterError> {
        self.execute_take(ledger, exchange, taker, order_id, receive_quantity)
    }

    /// Make the next make_order call report failure.
    pub fn reject_next_make(&self) {
        self.book.borrow_mut().reject_next_make = true;
    }

    /// Make the next make_order call return the zero order id.
    pub fn zero_id_next_make(&self) {
        self.book.borrow_mut().zero_id_next_make = true;
    }

    pub fn open_order_count(&self) -> usize {
        self.book
            .borrow()
            .orders
            .values()
            .filter(|o| !o.remaining_sell.is_zero())
            .count()
    }

    fn insert_order(
        &self,
        maker: Holder,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> ExchangeOrderId {
        let mut book = self.book.borrow_mut();
        book.next_id += 1;
        let id = ExchangeOrderId(book.next_id);
        book.orders.insert(
            id,
            VenueOrder {
                maker,
                sell_asset,
                buy_asset,
                original_sell: sell_quantity,
                original_buy: buy_quantity,
                remaining_sell: sell_quantity,
            },
        );
        book.last_order_id = id;
        id
    }

    fn execute_take(
        &self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        taker: Holder,
        order_id: ExchangeOrderId,
        receive_quantity: Decimal,
    ) -> Result<(), AdapterError> {
        let (maker, sell_asset, buy_asset, spend) = {
            let book = self.book.borrow();
            let order = book
                .orders
                .get(&order_id)
                .ok_or(AdapterError::UnknownOrder(order_id))?;

            if receive_quantity > order.remaining_sell {
                return Err(AdapterError::InsufficientQuantity {
                    requested: receive_quantity,
                    available: order.remaining_sell,
                });
            }

            let spend = math::truncate(
                receive_quantity * order.original_buy / order.original_sell,
                PRICE_DECIMALS,
            );
            (order.maker, order.sell_asset, order.buy_asset, spend)
        };

        // taker pays the maker, escrow releases to the taker
        ledger.transfer(buy_asset, taker, maker, spend)?;
        ledger.transfer(sell_asset, Holder::Exchange(exchange), taker, receive_quantity)?;

        let mut book = self.book.borrow_mut();
        let order = book
            .orders
            .get_mut(&order_id)
            .ok_or(AdapterError::UnknownOrder(order_id))?;
        order.remaining_sell -= receive_quantity;
        Ok(())
    }
}

impl ExchangeAdapter for MockExchange {
    fn make_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        sell_asset: AssetId,
        buy_asset: AssetId,
        sell_quantity: Decimal,
        buy_quantity: Decimal,
    ) -> Result<ExchangeOrderId, AdapterError> {
        {
            let mut book = self.book.borrow_mut();
            if book.reject_next_make {
                book.reject_next_make = false;
                return Err(AdapterError::Rejected);
            }
            if book.zero_id_next_make {
                book.zero_id_next_make = false;
                return Ok(ExchangeOrderId(0));
            }
        }

        // the maker approved us; pull the sell quantity into escrow
        ledger.transfer_from(
            sell_asset,
            Holder::Exchange(exchange),
            Holder::Fund,
            Holder::Exchange(exchange),
            sell_quantity,
        )?;

        Ok(self.insert_order(Holder::Fund, sell_asset, buy_asset, sell_quantity, buy_quantity))
    }

    fn take_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        taker: Holder,
        order_id: ExchangeOrderId,
        receive_quantity: Decimal,
    ) -> Result<(), AdapterError> {
        self.execute_take(ledger, exchange, taker, order_id, receive_quantity)
    }

    fn cancel_order(
        &mut self,
        ledger: &mut TokenLedger,
        exchange: ExchangeId,
        order_id: ExchangeOrderId,
    ) -> Result<(), AdapterError> {
        let (maker, sell_asset, remaining) = {
            let book = self.book.borrow();
            let order = book
                .orders
                .get(&order_id)
                .ok_or(AdapterError::UnknownOrder(order_id))?;
            (order.maker, order.sell_asset, order.remaining_sell)
        };

        if !remaining.is_zero() {
            ledger.transfer(sell_asset, Holder::Exchange(exchange), maker, remaining)?;
        }

        self.book.borrow_mut().orders.remove(&order_id);
        Ok(())
    }

    fn get_order(&self, order_id: ExchangeOrderId) -> Option<OrderTerms> {
        let book = self.book.borrow();
        let order = book.orders.get(&order_id)?;
        Some(OrderTerms {
            sell_asset: order.sell_asset,
            buy_asset: order.buy_asset,
            sell_quantity: order.remaining_sell,
            buy_quantity: order.remaining_buy(),
        })
    }

    fn last_order_id(&self) -> ExchangeOrderId {
        self.book.borrow().last_order_id
    }
}
