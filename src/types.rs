//! Scalar types shared across the book: sides, order kinds, statuses and the
//! fixed-point `Price`/`Qty` newtypes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point scale applied to every price and quantity. Ten decimal
/// places would overflow `u128` multiplication headroom for BTC-sized
/// notional values, eight does not.
pub const SCALE: i128 = 100_000_000;

/// Which book a taker or maker order sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// The four order-type state machines the matching engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Market,
    Limit,
    Ioc,
    Fok,
}

impl OrderKind {
    /// LIMIT, IOC and FOK all require a limit price; MARKET never carries one.
    pub fn requires_price(self) -> bool {
        !matches!(self, OrderKind::Market)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "market"),
            OrderKind::Limit => write!(f, "limit"),
            OrderKind::Ioc => write!(f, "ioc"),
            OrderKind::Fok => write!(f, "fok"),
        }
    }
}

/// Lifecycle status of an order. See `Order::recompute_status` for the
/// correspondence with `filled`/`remaining`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Partial,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses are never mutated further and never appear in the
    /// order index.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// A non-negative fixed-point quantity, stored as ticks (`real_value *
/// [`SCALE`]`). Quantities never go negative: the engine only ever adds
/// `min(taker.remaining, maker.remaining)` to `filled`, never more than
/// `quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Qty(pub u64);

impl Qty {
    pub const ZERO: Qty = Qty(0);

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Qty) -> Qty {
        Qty(self.0.min(other.0))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

impl std::ops::Add for Qty {
    type Output = Qty;
    fn add(self, rhs: Qty) -> Qty {
        Qty(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Qty {
    type Output = Qty;
    fn sub(self, rhs: Qty) -> Qty {
        Qty(self.0 - rhs.0)
    }
}

/// A positive fixed-point price, stored as ticks. Prices are compared and
/// ordered as plain integers — exact equality, no epsilon games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub u128);

impl Price {
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

/// Error returned while parsing a decimal string into ticks. Used only at
/// the input boundary (`ParsedAmount::from_decimal_str`); the book itself
/// never re-parses a value it has already accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalParseError(pub String);

impl fmt::Display for DecimalParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal amount: {}", self.0)
    }
}

impl std::error::Error for DecimalParseError {}

/// A signed fixed-point amount parsed from a decimal string, before it has
/// been validated into a `Qty` or `Price`. Kept signed and unchecked so
/// `Book::submit` can reject `quantity <= 0` with the offending value
/// instead of failing to parse at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParsedAmount(pub i128);

impl ParsedAmount {
    /// Parses a plain decimal string (`"50000"`, `"0.5"`, `"-1.25"`) into
    /// fixed-point ticks without ever routing through a binary float.
    pub fn from_decimal_str(s: &str) -> Result<Self, DecimalParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecimalParseError(s.to_string()));
        }
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let mut parts = s.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalParseError(s.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DecimalParseError(s.to_string()));
        }
        if frac_part.len() > 8 {
            return Err(DecimalParseError(s.to_string()));
        }
        let int_value: i128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| DecimalParseError(s.to_string()))?
        };
        let mut frac_value: i128 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|_| DecimalParseError(s.to_string()))?
        };
        for _ in frac_part.len()..8 {
            frac_value *= 10;
        }
        let magnitude = int_value * SCALE + frac_value;
        Ok(ParsedAmount(if negative { -magnitude } else { magnitude }))
    }

    pub fn to_decimal_string(self) -> String {
        let negative = self.0 < 0;
        let magnitude = self.0.unsigned_abs();
        let int_part = magnitude / SCALE as u128;
        let frac_part = magnitude % SCALE as u128;
        let sign = if negative { "-" } else { "" };
        if frac_part == 0 {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part:08}")
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ParsedAmount(self.0 as i128).to_decimal_string())
    }
}

impl fmt::Display for Qty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ParsedAmount(self.0 as i128).to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integer() {
        assert_eq!(ParsedAmount::from_decimal_str("50000").unwrap().0, 50_000 * SCALE);
    }

    #[test]
    fn parses_fraction() {
        assert_eq!(ParsedAmount::from_decimal_str("0.5").unwrap().0, SCALE / 2);
    }

    #[test]
    fn parses_negative() {
        assert_eq!(ParsedAmount::from_decimal_str("-1.25").unwrap().0, -125_000_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(ParsedAmount::from_decimal_str("12.34.56").is_err());
        assert!(ParsedAmount::from_decimal_str("abc").is_err());
        assert!(ParsedAmount::from_decimal_str("").is_err());
    }

    #[test]
    fn round_trips_to_decimal_string() {
        let v = ParsedAmount::from_decimal_str("50000.5").unwrap();
        assert_eq!(v.to_decimal_string(), "50000.5");
        let v = ParsedAmount::from_decimal_str("10").unwrap();
        assert_eq!(v.to_decimal_string(), "10");
    }

    #[test]
    fn opposite_is_involution() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }
}
