//! A point-in-time, depth-limited view of both sides of a book.

use crate::orderbook::book::Book;
use crate::types::{Price, Qty};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Best-first `(price, aggregate_qty)` levels on each side, truncated to a
/// requested depth. Carries its own timestamp since the two sides are read
/// independently and the book may mutate between them under concurrent
/// access from other readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub timestamp: u64,
    pub bids: Vec<(Price, Qty)>,
    pub asks: Vec<(Price, Qty)>,
}

impl Snapshot {
    /// Renders this snapshot as the JSON wire record a market-data feed
    /// would publish on subscription or depth-refresh.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a snapshot back from its JSON wire record.
    pub fn from_json(s: &str) -> serde_json::Result<Snapshot> {
        serde_json::from_str(s)
    }

    /// Digests the level data deterministically, for callers that need to
    /// cheaply compare two snapshots (or detect corruption in a persisted
    /// one) without a full structural comparison.
    pub fn checksum(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.symbol.as_bytes());
        for (price, qty) in &self.bids {
            hasher.update(price.0.to_be_bytes());
            hasher.update(qty.0.to_be_bytes());
        }
        hasher.update(b"|");
        for (price, qty) in &self.asks {
            hasher.update(price.0.to_be_bytes());
            hasher.update(qty.0.to_be_bytes());
        }
        hasher.finalize().into()
    }
}

impl Book {
    /// Takes a depth-limited snapshot of both sides, best-first.
    /// `timestamp` is supplied by the caller (see `crate::utils`) so the
    /// core never reads the wall clock itself.
    pub fn snapshot(&self, depth: usize, timestamp: u64) -> Snapshot {
        Snapshot {
            symbol: self.symbol.clone(),
            timestamp,
            bids: self.iterate_bids().take(depth).collect(),
            asks: self.iterate_asks().take(depth).collect(),
        }
    }
}
