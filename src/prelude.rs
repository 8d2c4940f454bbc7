//! Convenience re-exports of the crate's everyday types.
//!
//! ```
//! use clob_core::prelude::*;
//! ```

pub use crate::order::{NewOrder, Order, OrderId};
pub use crate::orderbook::{
    Book, BookConfig, BookError, BookManager, BookManagerStd, BookManagerTokio, Snapshot,
    TradeEvent, TradeListener,
};
pub use crate::trade::Trade;
pub use crate::types::{OrderKind, OrderStatus, Price, Qty, Side};
pub use crate::utils::current_time_millis;
