//! Multi-book management with centralized trade event routing.
//!
//! Trait-based so callers can pick a channel implementation: `BookManagerStd`
//! for a plain OS thread consumer, `BookManagerTokio` for an async one.

use crate::orderbook::book::{Book, TradeListener};
use crate::trade::Trade;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// A trade paired with the symbol and wall-clock time it was routed at,
/// the unit `BookManager` implementations hand to their trade processor.
#[derive(Debug, Clone)]
pub struct TradeEvent {
    pub symbol: String,
    pub trade: Trade,
    pub timestamp: u64,
}

/// Interface for managing multiple books with centralized trade routing,
/// generic over the channel implementation `add_book` wires up.
pub trait BookManager {
    fn add_book(&mut self, symbol: &str);
    fn get_book(&self, symbol: &str) -> Option<&Book>;
    fn get_book_mut(&mut self, symbol: &str) -> Option<&mut Book>;
    fn symbols(&self) -> Vec<String>;
    fn remove_book(&mut self, symbol: &str) -> Option<Book>;
    fn has_book(&self, symbol: &str) -> bool;
    fn book_count(&self) -> usize;
}

fn log_trade_event(event: &TradeEvent) {
    info!(
        symbol = %event.symbol,
        trade_id = %event.trade.trade_id,
        price = %event.trade.price,
        quantity = %event.trade.quantity,
        "trade routed"
    );
}

/// `BookManager` backed by `std::sync::mpsc` — suited to a plain
/// OS-thread trade processor.
pub struct BookManagerStd {
    books: HashMap<String, Book>,
    trade_sender: std::sync::mpsc::Sender<TradeEvent>,
    trade_receiver: Option<std::sync::mpsc::Receiver<TradeEvent>>,
}

impl BookManagerStd {
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        BookManagerStd {
            books: HashMap::new(),
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// Spawns the trade event processor on its own thread. Panics if
    /// called twice — the receiver is moved out on first use.
    pub fn start_trade_processor(&mut self) -> std::thread::JoinHandle<()> {
        let receiver = self
            .trade_receiver
            .take()
            .expect("trade processor already started");
        std::thread::spawn(move || {
            info!("trade processor started");
            while let Ok(event) = receiver.recv() {
                log_trade_event(&event);
            }
            info!("trade processor stopped");
        })
    }
}

impl Default for BookManagerStd {
    fn default() -> Self {
        Self::new()
    }
}

impl BookManager for BookManagerStd {
    fn add_book(&mut self, symbol: &str) {
        let sender = self.trade_sender.clone();
        let symbol_owned = symbol.to_string();
        let listener: TradeListener = Arc::new(move |trade: &Trade| {
            let event = TradeEvent {
                symbol: symbol_owned.clone(),
                trade: trade.clone(),
                timestamp: trade.timestamp,
            };
            if let Err(e) = sender.send(event) {
                error!(symbol = %symbol_owned, error = %e, "failed to route trade event");
            }
        });
        let book = Book::with_trade_listener(symbol, listener);
        self.books.insert(symbol.to_string(), book);
        info!(symbol, "book added");
    }

    fn get_book(&self, symbol: &str) -> Option<&Book> {
        self.books.get(symbol)
    }

    fn get_book_mut(&mut self, symbol: &str) -> Option<&mut Book> {
        self.books.get_mut(symbol)
    }

    fn symbols(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }

    fn remove_book(&mut self, symbol: &str) -> Option<Book> {
        let removed = self.books.remove(symbol);
        if removed.is_some() {
            info!(symbol, "book removed");
        }
        removed
    }

    fn has_book(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    fn book_count(&self) -> usize {
        self.books.len()
    }
}

/// `BookManager` backed by `tokio::sync::mpsc` — suited to an async trade
/// processor running on the same runtime as the rest of a gateway.
pub struct BookManagerTokio {
    books: HashMap<String, Book>,
    trade_sender: tokio::sync::mpsc::UnboundedSender<TradeEvent>,
    trade_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<TradeEvent>>,
}

impl BookManagerTokio {
    pub fn new() -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        BookManagerTokio {
            books: HashMap::new(),
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// Spawns the trade event processor as an async task on the current
    /// runtime. Panics if called twice.
    pub fn start_trade_processor(&mut self) -> tokio::task::JoinHandle<()> {
        let mut receiver = self
            .trade_receiver
            .take()
            .expect("trade processor already started");
        tokio::spawn(async move {
            info!("trade processor started");
            while let Some(event) = receiver.recv().await {
                log_trade_event(&event);
            }
            info!("trade processor stopped");
        })
    }
}

impl Default for BookManagerTokio {
    fn default() -> Self {
        Self::new()
    }
}

impl BookManager for BookManagerTokio {
    fn add_book(&mut self, symbol: &str) {
        let sender = self.trade_sender.clone();
        let symbol_owned = symbol.to_string();
        let listener: TradeListener = Arc::new(move |trade: &Trade| {
            let event = TradeEvent {
                symbol: symbol_owned.clone(),
                trade: trade.clone(),
                timestamp: trade.timestamp,
            };
            if let Err(e) = sender.send(event) {
                error!(symbol = %symbol_owned, error = %e, "failed to route trade event");
            }
        });
        let book = Book::with_trade_listener(symbol, listener);
        self.books.insert(symbol.to_string(), book);
        info!(symbol, "book added");
    }

    fn get_book(&self, symbol: &str) -> Option<&Book> {
        self.books.get(symbol)
    }

    fn get_book_mut(&mut self, symbol: &str) -> Option<&mut Book> {
        self.books.get_mut(symbol)
    }

    fn symbols(&self) -> Vec<String> {
        self.books.keys().cloned().collect()
    }

    fn remove_book(&mut self, symbol: &str) -> Option<Book> {
        let removed = self.books.remove(symbol);
        if removed.is_some() {
            info!(symbol, "book removed");
        }
        removed
    }

    fn has_book(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    fn book_count(&self) -> usize {
        self.books.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_book_tracks_count() {
        let mut manager = BookManagerStd::new();
        manager.add_book("BTC-USD");
        manager.add_book("ETH-USD");
        assert_eq!(manager.book_count(), 2);
        assert!(manager.has_book("BTC-USD"));
        assert!(manager.remove_book("BTC-USD").is_some());
        assert_eq!(manager.book_count(), 1);
    }

    #[test]
    fn trade_listener_routes_through_std_channel() {
        let mut manager = BookManagerStd::new();
        manager.add_book("BTC-USD");
        let handle = manager.start_trade_processor();

        {
            use crate::order::NewOrder;
            use crate::types::{OrderKind, Side};
            let book = manager.get_book("BTC-USD").unwrap();
            book.submit(
                NewOrder::from_decimal("m", "BTC-USD", Side::Sell, OrderKind::Limit, "1", Some("100"))
                    .unwrap(),
            )
            .unwrap();
            book.submit(
                NewOrder::from_decimal("t", "BTC-USD", Side::Buy, OrderKind::Market, "1", None)
                    .unwrap(),
            )
            .unwrap();
        }

        drop(manager);
        handle.join().unwrap();
    }
}
