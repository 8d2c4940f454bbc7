//! Property-based checks of the universal invariants every match must
//! uphold, run against randomly generated order sequences.

use clob_core::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct OrderSpec {
    side: Side,
    kind: OrderKind,
    quantity: u64,
    price: u128,
}

fn order_spec_strategy() -> impl Strategy<Value = OrderSpec> {
    (
        prop_oneof![Just(Side::Buy), Just(Side::Sell)],
        prop_oneof![
            Just(OrderKind::Limit),
            Just(OrderKind::Market),
            Just(OrderKind::Ioc),
            Just(OrderKind::Fok),
        ],
        1u64..200,
        95u128..106,
    )
        .prop_map(|(side, kind, quantity, price)| OrderSpec {
            side,
            kind,
            quantity,
            price,
        })
}

fn submit(book: &Book, seq: usize, spec: &OrderSpec) -> (Vec<Trade>, Order) {
    let id = format!("o{seq}");
    let price = if spec.kind == OrderKind::Market {
        None
    } else {
        Some(spec.price.to_string())
    };
    let new_order = NewOrder::from_decimal(
        id,
        "BTC-USD",
        spec.side,
        spec.kind,
        &spec.quantity.to_string(),
        price.as_deref(),
    )
    .unwrap();
    book.submit(new_order).unwrap()
}

proptest! {
    // filled + remaining always reconstructs the original quantity.
    #[test]
    fn fill_conservation(specs in prop::collection::vec(order_spec_strategy(), 1..40)) {
        let book = Book::new("BTC-USD");
        for (i, spec) in specs.iter().enumerate() {
            let (_, order) = submit(&book, i, spec);
            prop_assert_eq!(order.filled_quantity + order.remaining(), order.quantity);
        }
    }

    // best_bid is always strictly less than best_ask once both exist —
    // a crossing pair never survives the match loop uncrossed.
    #[test]
    fn book_is_never_left_crossed(specs in prop::collection::vec(order_spec_strategy(), 1..60)) {
        let book = Book::new("BTC-USD");
        for (i, spec) in specs.iter().enumerate() {
            submit(&book, i, spec);
            if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
                prop_assert!(bid < ask, "book left crossed: bid {:?} >= ask {:?}", bid, ask);
            }
        }
    }

    // every trade's quantity is positive and its price lands on a level
    // that was actually resting, i.e. within the generated price band.
    #[test]
    fn trade_prices_are_sane(specs in prop::collection::vec(order_spec_strategy(), 1..60)) {
        let book = Book::new("BTC-USD");
        for (i, spec) in specs.iter().enumerate() {
            let (trades, _) = submit(&book, i, spec);
            for trade in trades {
                prop_assert!(!trade.quantity.is_zero());
                prop_assert!(trade.price >= Price(95 * clob_core::types::SCALE as u128));
                prop_assert!(trade.price <= Price(106 * clob_core::types::SCALE as u128));
            }
        }
    }

    // a FOK that reports zero trades never mutated the book: the resting
    // aggregate on each side is the same before and after a rejected FOK.
    #[test]
    fn rejected_fok_is_a_no_op(specs in prop::collection::vec(order_spec_strategy(), 1..40)) {
        let book = Book::new("BTC-USD");
        for (i, spec) in specs.iter().enumerate() {
            if spec.kind != OrderKind::Fok {
                submit(&book, i, spec);
                continue;
            }
            let before: Vec<_> = book.iterate_bids().chain(book.iterate_asks()).collect();
            let (trades, order) = submit(&book, i, spec);
            if trades.is_empty() {
                prop_assert_eq!(order.status, OrderStatus::Cancelled);
                let after: Vec<_> = book.iterate_bids().chain(book.iterate_asks()).collect();
                prop_assert_eq!(before, after);
            }
        }
    }

    // order status always corresponds to its filled/remaining quantities.
    #[test]
    fn status_matches_fill_state(specs in prop::collection::vec(order_spec_strategy(), 1..60)) {
        let book = Book::new("BTC-USD");
        for (i, spec) in specs.iter().enumerate() {
            let (_, order) = submit(&book, i, spec);
            match order.status {
                OrderStatus::Filled => prop_assert!(order.remaining().is_zero()),
                OrderStatus::New => prop_assert!(order.filled_quantity.is_zero()),
                OrderStatus::Partial => {
                    prop_assert!(!order.filled_quantity.is_zero());
                    prop_assert!(!order.remaining().is_zero());
                }
                OrderStatus::Cancelled => {}
            }
        }
    }

    // a non-positive price is always rejected and never admitted as a
    // wrapped near-`u128::MAX` tick value.
    #[test]
    fn non_positive_price_is_always_rejected(price in i128::MIN..=0, side in prop_oneof![Just(Side::Buy), Just(Side::Sell)]) {
        let book = Book::new("BTC-USD");
        let new_order = NewOrder {
            order_id: "bad".to_string(),
            symbol: "BTC-USD".to_string(),
            side,
            kind: OrderKind::Limit,
            quantity: 1,
            price: Some(price),
        };
        let result = book.submit(new_order);
        prop_assert!(matches!(result, Err(BookError::InvalidPrice { .. })));
        prop_assert_eq!(book.best_bid(), None);
        prop_assert_eq!(book.best_ask(), None);
    }

    // a quantity outside `1..=u64::MAX` is always rejected and never
    // admitted as a truncated/wrapped `u64`.
    #[test]
    fn out_of_range_quantity_is_always_rejected(
        quantity in prop_oneof![i128::MIN..=0, (u64::MAX as i128 + 1)..=i128::MAX],
        side in prop_oneof![Just(Side::Buy), Just(Side::Sell)],
    ) {
        let book = Book::new("BTC-USD");
        let new_order = NewOrder {
            order_id: "bad".to_string(),
            symbol: "BTC-USD".to_string(),
            side,
            kind: OrderKind::Limit,
            quantity,
            price: Some(100),
        };
        let result = book.submit(new_order);
        prop_assert!(matches!(result, Err(BookError::InvalidQuantity { .. })));
        prop_assert_eq!(book.best_bid(), None);
        prop_assert_eq!(book.best_ask(), None);
    }
}

#[test]
fn cancelling_a_resting_order_is_idempotent() {
    let book = Book::new("BTC-USD");
    book.submit(
        NewOrder::from_decimal("r1", "BTC-USD", Side::Buy, OrderKind::Limit, "1", Some("100"))
            .unwrap(),
    )
    .unwrap();
    assert!(book.cancel("r1"));
    assert!(!book.cancel("r1"));
    assert!(!book.cancel("r1"));
}
