//! The per-symbol order book: price-level indexed sides, the order index,
//! and the public submit/cancel/snapshot contract.

use crate::order::{NewOrder, Order, OrderId};
use crate::orderbook::error::BookError;
use crate::orderbook::matching;
use crate::price_level::PriceLevel;
use crate::trade::Trade;
use crate::types::{OrderKind, Price, Qty, Side};
use crossbeam::atomic::AtomicCell;
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::trace;
use uuid::Uuid;

/// Invoked synchronously, once per trade, as `Book::submit` produces it.
/// Grounded in the teacher's `TradeListener` field on `OrderBook`: this is
/// how a gateway observes fills without the core depending on any
/// transport.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;

/// Optional validation knobs a book can be configured with. `None` (the
/// default) disables the corresponding check, matching `spec.md`'s
/// validation list exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookConfig {
    pub tick_size: Option<u128>,
    pub lot_size: Option<u64>,
}

/// Owns one symbol's bid side, ask side, and order index. `submit`/`cancel`
/// are documented as callable from exactly one serialising owner at a time
/// (see `crate::orderbook::manager`); the lock-free sides and index exist
/// so read-only observers can run concurrently with that single writer
/// without blocking it, not to make the writer itself thread-safe.
pub struct Book {
    pub(crate) symbol: String,
    pub(crate) bids: SkipMap<u128, Arc<PriceLevel>>,
    pub(crate) asks: SkipMap<u128, Arc<PriceLevel>>,
    pub(crate) order_locations: DashMap<OrderId, (Side, u128)>,
    sequence: AtomicU64,
    last_trade_price: AtomicCell<u128>,
    has_traded: AtomicBool,
    pub(crate) trade_listener: Option<TradeListener>,
    config: BookConfig,
}

impl Book {
    pub fn new(symbol: impl Into<String>) -> Book {
        Book {
            symbol: symbol.into(),
            bids: SkipMap::new(),
            asks: SkipMap::new(),
            order_locations: DashMap::new(),
            sequence: AtomicU64::new(0),
            last_trade_price: AtomicCell::new(0),
            has_traded: AtomicBool::new(false),
            trade_listener: None,
            config: BookConfig::default(),
        }
    }

    pub fn with_config(symbol: impl Into<String>, config: BookConfig) -> Book {
        Book {
            config,
            ..Book::new(symbol)
        }
    }

    pub fn with_trade_listener(symbol: impl Into<String>, listener: TradeListener) -> Book {
        Book {
            trade_listener: Some(listener),
            ..Book::new(symbol)
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Highest resting bid, or `None` if the bid side is empty.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.back().map(|e| Price(*e.key()))
    }

    /// Lowest resting ask, or `None` if the ask side is empty.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.front().map(|e| Price(*e.key()))
    }

    /// Price of the most recent trade on this book, if any has occurred.
    pub fn last_trade_price(&self) -> Option<Price> {
        if self.has_traded.load(Ordering::Relaxed) {
            Some(Price(self.last_trade_price.load()))
        } else {
            None
        }
    }

    pub(crate) fn side_map(&self, side: Side) -> &SkipMap<u128, Arc<PriceLevel>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::AcqRel)
    }

    pub(crate) fn next_trade_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub(crate) fn record_trade_price(&self, price: Price) {
        self.last_trade_price.store(price.0);
        self.has_traded.store(true, Ordering::Relaxed);
    }

    fn validate(&self, input: &NewOrder) -> Result<(), BookError> {
        if input.symbol != self.symbol {
            return Err(BookError::SymbolMismatch {
                expected: self.symbol.clone(),
                actual: input.symbol.clone(),
            });
        }
        if input.quantity <= 0 || input.quantity > u64::MAX as i128 {
            return Err(BookError::InvalidQuantity {
                quantity: input.quantity,
            });
        }
        if let Some(lot_size) = self.config.lot_size {
            if input.quantity % lot_size as i128 != 0 {
                return Err(BookError::InvalidLotSize {
                    quantity: input.quantity,
                    lot_size: lot_size as i128,
                });
            }
        }
        match input.price {
            Some(price) => {
                if price <= 0 {
                    return Err(BookError::InvalidPrice { price });
                }
                if let Some(tick_size) = self.config.tick_size {
                    if price % tick_size as i128 != 0 {
                        return Err(BookError::InvalidTickSize {
                            price,
                            tick_size: tick_size as i128,
                        });
                    }
                }
            }
            None if input.kind.requires_price() => {
                return Err(BookError::MissingPrice {
                    order_id: input.order_id.clone(),
                    reason: format!("{} orders require a price", input.kind),
                });
            }
            None => {}
        }
        Ok(())
    }

    /// Admits an order: validate, dispatch on order type, match, rest the
    /// residual if the type allows it. Atomic from the caller's
    /// perspective — a validation failure leaves the book untouched.
    pub fn submit(&self, input: NewOrder) -> Result<(Vec<Trade>, Order), BookError> {
        self.validate(&input)?;
        let sequence = self.next_sequence();
        let mut order = Order::new(input, sequence);
        trace!(
            order_id = %order.order_id,
            symbol = %order.symbol,
            side = %order.side,
            kind = %order.kind,
            "admitting order"
        );
        let trades = match order.kind {
            OrderKind::Limit => matching::match_limit(self, &mut order),
            OrderKind::Market => matching::match_market(self, &mut order),
            OrderKind::Ioc => matching::match_ioc(self, &mut order),
            OrderKind::Fok => matching::match_fok(self, &mut order),
        };
        trace!(
            order_id = %order.order_id,
            status = ?order.status,
            trade_count = trades.len(),
            "order admitted"
        );
        Ok((trades, order))
    }

    /// Places a crossing-free residual on the taker's own side, creating
    /// the price level if it does not already exist.
    pub(crate) fn rest(&self, order: Order) {
        let side = order.side;
        let price = order.price.expect("resting order always carries a price").0;
        let side_map = self.side_map(side);
        let level = side_map
            .get_or_insert_with(price, || Arc::new(PriceLevel::new(Price(price))))
            .value()
            .clone();
        self.order_locations
            .insert(order.order_id.clone(), (side, price));
        level.push_back(order);
    }

    /// Cancels a resting order. Returns `None` for an unknown or terminal
    /// order id — terminal orders are never present in the index, so that
    /// case collapses into the same miss as "unknown" automatically.
    pub fn cancel_order(&self, order_id: &str) -> Option<Order> {
        let order_id = order_id.to_string();
        let (side, price) = *self.order_locations.get(&order_id)?;
        let side_map = self.side_map(side);
        let level = side_map.get(&price)?.value().clone();
        let mut removed = level.remove(&order_id)?;
        self.order_locations.remove(&order_id);
        if level.is_empty() {
            side_map.remove(&price);
        }
        removed.cancel();
        trace!(order_id = %removed.order_id, "order cancelled");
        Some(removed)
    }

    /// `true` iff an order was cancelled just now.
    pub fn cancel(&self, order_id: &str) -> bool {
        self.cancel_order(order_id).is_some()
    }

    /// Best-first `(price, aggregate_qty)` pairs on the bid side.
    pub fn iterate_bids(&self) -> impl Iterator<Item = (Price, Qty)> + '_ {
        self.bids
            .iter()
            .rev()
            .map(|e| (Price(*e.key()), e.value().aggregate_qty()))
    }

    /// Best-first `(price, aggregate_qty)` pairs on the ask side.
    pub fn iterate_asks(&self) -> impl Iterator<Item = (Price, Qty)> + '_ {
        self.asks
            .iter()
            .map(|e| (Price(*e.key()), e.value().aggregate_qty()))
    }
}
