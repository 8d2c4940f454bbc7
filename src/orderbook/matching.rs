//! The walk-and-match loop shared by all four order types, plus the
//! FOK preflight check.
//!
//! Each order type differs only in its crossing predicate and what happens
//! to an unfilled residual: LIMIT and MARKET both walk until the taker is
//! done or the book is exhausted, IOC additionally discards its residual,
//! and FOK runs a lock-free preflight before touching a single level.

use crate::order::Order;
use crate::orderbook::book::Book;
use crate::trade::Trade;
use crate::types::{OrderKind, Qty, Side};

/// Walks price levels on `taker.side.opposite()` best-first, filling
/// against resting orders while `crosses` holds, until the taker is
/// exhausted or the book runs out of matching liquidity. Mutates `taker`
/// in place and returns every trade produced, in execution order.
fn run_match(book: &Book, taker: &mut Order, crosses: impl Fn(u128) -> bool) -> Vec<Trade> {
    let mut trades = Vec::new();
    let opposite = book.side_map(taker.side.opposite());

    loop {
        if taker.remaining().is_zero() {
            break;
        }
        let Some(entry) = (match taker.side {
            Side::Buy => opposite.front(),
            Side::Sell => opposite.back(),
        }) else {
            break;
        };
        let level_price = *entry.key();
        if !crosses(level_price) {
            break;
        }
        let level = entry.value().clone();

        loop {
            if taker.remaining().is_zero() {
                break;
            }
            let taker_remaining = taker.remaining();
            let Some((maker, traded)) = level.match_head(|maker| {
                let fill = taker_remaining.min(maker.remaining());
                maker.apply_fill(fill);
                fill
            }) else {
                break;
            };
            taker.apply_fill(traded);

            let trade = Trade::new(
                book.next_trade_id(),
                taker.symbol.clone(),
                maker.price.expect("resting order always carries a price"),
                traded,
                taker.timestamp,
                taker.side,
                maker.order_id.clone(),
                taker.order_id.clone(),
            );
            book.record_trade_price(trade.price);
            if let Some(listener) = &book.trade_listener {
                listener(&trade);
            }
            trades.push(trade);

            if maker.status.is_terminal() {
                book.order_locations.remove(&maker.order_id);
            }
        }

        if level.is_empty() {
            opposite.remove(&level_price);
        }
    }

    trades
}

/// A LIMIT order crosses the opposite side at `level_price` when its own
/// price would not be bettered, i.e. a buy crosses asks at or below its
/// price and a sell crosses bids at or above its price.
fn limit_crosses(taker_side: Side, limit_price: u128) -> impl Fn(u128) -> bool {
    move |level_price| match taker_side {
        Side::Buy => level_price <= limit_price,
        Side::Sell => level_price >= limit_price,
    }
}

/// LIMIT: match against crossing levels, then rest any residual on the
/// taker's own side at its limit price.
pub(crate) fn match_limit(book: &Book, taker: &mut Order) -> Vec<Trade> {
    let limit_price = taker.price.expect("limit order always carries a price").0;
    let trades = run_match(book, taker, limit_crosses(taker.side, limit_price));
    if !taker.remaining().is_zero() {
        book.rest(taker.clone());
    }
    trades
}

/// MARKET: match against every level the book has, in price order,
/// regardless of the taker's (absent) price. Any residual is discarded —
/// a market order never rests.
pub(crate) fn match_market(book: &Book, taker: &mut Order) -> Vec<Trade> {
    let trades = run_match(book, taker, |_| true);
    taker.finalize_as_non_resting();
    trades
}

/// IOC: identical crossing rule to LIMIT, but never rests — any residual
/// is discarded immediately.
pub(crate) fn match_ioc(book: &Book, taker: &mut Order) -> Vec<Trade> {
    let limit_price = taker.price.expect("ioc order always carries a price").0;
    let trades = run_match(book, taker, limit_crosses(taker.side, limit_price));
    taker.finalize_as_non_resting();
    trades
}

/// FOK: a lock-free preflight determines whether the crossing levels can
/// fill the taker completely; if not, no level is touched and the order is
/// cancelled untraded. If so, it executes exactly like IOC — the preflight
/// guarantees that pass will exhaust the taker.
pub(crate) fn match_fok(book: &Book, taker: &mut Order) -> Vec<Trade> {
    let limit_price = taker.price.expect("fok order always carries a price").0;
    let crosses = limit_crosses(taker.side, limit_price);
    if !preflight_fillable(book, taker.side, taker.remaining(), &crosses) {
        taker.finalize_as_non_resting();
        return Vec::new();
    }
    let trades = run_match(book, taker, crosses);
    taker.finalize_as_non_resting();
    trades
}

/// Sums resting aggregate quantity across crossing levels, best-first,
/// stopping as soon as `required` is covered. Reads only the lock-free
/// `PriceLevel::aggregate_qty` cache, so it never blocks or interleaves
/// with a concurrent match — by the time `match_fok` proceeds to
/// `run_match`, it is still the sole writer, so the figure it preflighted
/// against cannot have moved.
fn preflight_fillable(
    book: &Book,
    taker_side: Side,
    required: Qty,
    crosses: &impl Fn(u128) -> bool,
) -> bool {
    let opposite = book.side_map(taker_side.opposite());
    let mut covered = Qty::ZERO;
    let levels: Box<dyn Iterator<Item = _>> = match taker_side {
        Side::Buy => Box::new(opposite.iter()),
        Side::Sell => Box::new(opposite.iter().rev()),
    };
    for entry in levels {
        if !crosses(*entry.key()) {
            break;
        }
        covered = covered + entry.value().aggregate_qty();
        if covered >= required {
            return true;
        }
    }
    false
}
