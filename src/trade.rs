//! The `Trade` record emitted for every match step.

use crate::order::OrderId;
use crate::types::{Price, Qty, Side};
use serde::{Deserialize, Serialize};

/// A single execution between a resting maker and the incoming taker.
/// Derived, never stored by the book — callers that need history must
/// retain what `Book::submit` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub symbol: String,
    pub price: Price,
    pub quantity: Qty,
    pub timestamp: u64,
    pub aggressor_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
}

impl Trade {
    /// Renders this trade as the JSON wire record a gateway would publish
    /// to subscribers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        trade_id: String,
        symbol: String,
        price: Price,
        quantity: Qty,
        timestamp: u64,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
    ) -> Trade {
        Trade {
            trade_id,
            symbol,
            price,
            quantity,
            timestamp,
            aggressor_side,
            maker_order_id,
            taker_order_id,
        }
    }
}
