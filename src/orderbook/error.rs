//! Book error types.
//!
//! These are programming/protocol errors, reported to the caller and never
//! retried — matching never performs I/O and has no transient failure mode.

use std::fmt;

/// Errors `Book::submit` can return. Matched against the teacher's manual
/// `Display`/`Error` impl style rather than `thiserror` (the teacher
/// declares `thiserror` as a dependency but never actually uses it for its
/// own `OrderBookError`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BookError {
    /// `quantity <= 0` or `quantity > u64::MAX` (ticks). Carries the
    /// rejected raw value for diagnostics — both ends are rejected here
    /// rather than truncated/wrapped by the `i128 -> u64` cast in
    /// `Order::new`.
    InvalidQuantity { quantity: i128 },

    /// `price <= 0` (ticks). Carries the rejected raw value — left
    /// unchecked, a non-positive price would be reinterpreted as a
    /// near-maximum `u128` by the `i128 -> u128` cast in `Order::new`,
    /// corrupting price-time ordering.
    InvalidPrice { price: i128 },

    /// LIMIT/IOC/FOK submitted without a price, or a price string failed
    /// to parse.
    MissingPrice { order_id: String, reason: String },

    /// `order.symbol != book.symbol`.
    SymbolMismatch { expected: String, actual: String },

    /// Price is not an exact multiple of the book's configured tick size.
    InvalidTickSize { price: i128, tick_size: i128 },

    /// Quantity is not an exact multiple of the book's configured lot size.
    InvalidLotSize { quantity: i128, lot_size: i128 },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::InvalidQuantity { quantity } => {
                write!(
                    f,
                    "invalid quantity: {quantity} must be positive and at most {}",
                    u64::MAX
                )
            }
            BookError::InvalidPrice { price } => {
                write!(f, "invalid price: {price} is not positive")
            }
            BookError::MissingPrice { order_id, reason } => {
                write!(f, "order {order_id} missing required price: {reason}")
            }
            BookError::SymbolMismatch { expected, actual } => {
                write!(f, "symbol mismatch: book is {expected}, order is {actual}")
            }
            BookError::InvalidTickSize { price, tick_size } => {
                write!(f, "price {price} is not a multiple of tick size {tick_size}")
            }
            BookError::InvalidLotSize { quantity, lot_size } => {
                write!(
                    f,
                    "quantity {quantity} is not a multiple of lot size {lot_size}"
                )
            }
        }
    }
}

impl std::error::Error for BookError {}
