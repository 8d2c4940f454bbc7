//! # clob-core
//!
//! A price-time-priority limit order book for a single trading venue,
//! built around lock-free reads and a single serialising writer per
//! symbol.
//!
//! ## Key properties
//!
//! - **Fixed-point arithmetic**: prices and quantities are stored as
//!   scaled integers (`Price`, `Qty`), never binary floats — see
//!   [`types`] for the representation and parsing rules.
//! - **Order types**: `LIMIT`, `MARKET`, `IOC` and `FOK`, each a thin
//!   wrapper around one shared matching loop (`orderbook::matching`).
//! - **Concurrency model**: one book has exactly one writer
//!   (`Book::submit`/`Book::cancel`) active at a time; best bid/ask,
//!   snapshots and depth iteration are lock-free and safe to call
//!   concurrently with that writer. [`orderbook::BookManager`] and its
//!   std/Tokio implementations route trades from many books to one
//!   consumer.
//! - **No I/O**: the core never touches the network, disk or wall clock.
//!   Callers supply timestamps and own persistence and transport.
//!
//! ## Example
//!
//! ```
//! use clob_core::prelude::*;
//!
//! let book = Book::new("BTC-USD");
//! book.submit(NewOrder::from_decimal(
//!     "resting-1", "BTC-USD", Side::Sell, OrderKind::Limit, "1.0", Some("50000"),
//! ).unwrap()).unwrap();
//!
//! let (trades, taker) = book.submit(NewOrder::from_decimal(
//!     "taker-1", "BTC-USD", Side::Buy, OrderKind::Market, "0.5", None,
//! ).unwrap()).unwrap();
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(taker.status, OrderStatus::Filled);
//! ```

pub mod order;
pub mod orderbook;
mod price_level;
pub mod prelude;
pub mod trade;
pub mod types;
mod utils;

pub use order::{NewOrder, Order, OrderId};
pub use orderbook::{
    Book, BookConfig, BookError, BookManager, BookManagerStd, BookManagerTokio, Snapshot,
    TradeEvent, TradeListener,
};
pub use trade::Trade;
pub use types::{OrderKind, OrderStatus, Price, Qty, Side};
pub use utils::current_time_millis;
