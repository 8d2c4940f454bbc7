//! Order identity, the caller-facing submission schema, and the mutable
//! execution state the book tracks for a resting order.

use crate::orderbook::BookError;
use crate::types::{OrderKind, OrderStatus, ParsedAmount, Price, Qty, Side};
use serde::{Deserialize, Serialize};

/// Opaque, caller-assigned order identifier. The core never generates one.
pub type OrderId = String;

/// The order input schema collaborators build: everything needed to admit
/// an order, before sequence-number assignment or validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    /// Raw signed ticks so `quantity <= 0` can be rejected with the
    /// offending value rather than failing to parse.
    pub quantity: i128,
    /// Required unless `kind == Market`.
    pub price: Option<i128>,
}

impl NewOrder {
    /// Convenience constructor taking human-readable decimal strings,
    /// grounded in the teacher's `add_limit_order`-style ergonomic
    /// constructors.
    pub fn from_decimal(
        order_id: impl Into<OrderId>,
        symbol: impl Into<String>,
        side: Side,
        kind: OrderKind,
        quantity: &str,
        price: Option<&str>,
    ) -> Result<Self, BookError> {
        let quantity = ParsedAmount::from_decimal_str(quantity)
            .map_err(|e| BookError::InvalidQuantity { quantity: e.0 })?
            .0;
        let price = price
            .map(ParsedAmount::from_decimal_str)
            .transpose()
            .map_err(|e| BookError::MissingPrice {
                order_id: "<unparsed>".to_string(),
                reason: e.0,
            })?
            .map(|p| p.0);
        Ok(NewOrder {
            order_id: order_id.into(),
            symbol: symbol.into(),
            side,
            kind,
            quantity,
            price,
        })
    }

    /// Parses a `NewOrder` from its JSON wire record, the shape a gateway
    /// receives from an inbound order entry session.
    pub fn from_json(s: &str) -> serde_json::Result<NewOrder> {
        serde_json::from_str(s)
    }
}

/// A resting or in-flight order. Identity fields (`order_id`, `symbol`,
/// `side`, `kind`, `quantity`, `price`) are immutable after admission;
/// `filled_quantity` and `status` are the only fields the matching engine
/// ever mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Qty,
    pub price: Option<Price>,
    /// Monotonic admission sequence number (see `Book::next_sequence`),
    /// the basis for time priority among same-price orders.
    pub timestamp: u64,
    pub filled_quantity: Qty,
    pub status: OrderStatus,
}

impl Order {
    /// Caller contract: `input.quantity` is in `1..=u64::MAX` and
    /// `input.price`, if present, is positive — both enforced by
    /// `Book::validate` before this ever runs, so the casts below cannot
    /// silently truncate or sign-wrap.
    pub(crate) fn new(input: NewOrder, timestamp: u64) -> Order {
        Order {
            order_id: input.order_id,
            symbol: input.symbol,
            side: input.side,
            kind: input.kind,
            quantity: Qty(input.quantity as u64),
            price: input.price.map(|p| Price(p as u128)),
            timestamp,
            filled_quantity: Qty::ZERO,
            status: OrderStatus::New,
        }
    }

    /// `quantity - filled_quantity`, the derived invariant from §3.
    pub fn remaining(&self) -> Qty {
        self.quantity - self.filled_quantity
    }

    /// Applies a fill of `qty` (caller guarantees `qty <= remaining()`) and
    /// recomputes status. Never called on a terminal order.
    pub(crate) fn apply_fill(&mut self, qty: Qty) {
        self.filled_quantity = self.filled_quantity + qty;
        self.recompute_status();
    }

    fn recompute_status(&mut self) {
        self.status = if self.remaining().is_zero() {
            OrderStatus::Filled
        } else if self.filled_quantity.is_zero() {
            OrderStatus::New
        } else {
            OrderStatus::Partial
        };
    }

    /// Marks a non-resting order (MARKET/IOC/FOK) whose residual is
    /// discarded rather than rested. `apply_fill` already leaves `Partial`
    /// or `Filled` in place; an order that never traded at all is left at
    /// `New` by `apply_fill`, which this promotes to `CANCELLED`.
    pub(crate) fn finalize_as_non_resting(&mut self) {
        if self.status == OrderStatus::New {
            self.status = OrderStatus::Cancelled;
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
    }

    /// Renders this order as the JSON wire record a gateway would echo
    /// back as an execution report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
