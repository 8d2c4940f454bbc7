//! A single price level: a FIFO queue of resting orders plus a cached
//! aggregate quantity kept coherent on every mutation (never recomputed
//! from scratch on the hot path).

use crate::order::{Order, OrderId};
use crate::types::{Price, Qty};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owns the resting orders at one exact price on one side.
///
/// The queue is behind a `Mutex` (a book has exactly one writer at a time,
/// per the serial command-queue model in §5, so this is never contended in
/// practice) while `aggregate_qty` is a plain atomic so readers — best
/// bid/ask, snapshot projection, FOK preflight — can observe it without
/// ever taking the lock, mirroring the teacher's split between a lock-free
/// cache and a guarded order collection.
pub struct PriceLevel {
    price: Price,
    queue: Mutex<VecDeque<Order>>,
    aggregate_qty: AtomicU64,
}

impl PriceLevel {
    pub fn new(price: Price) -> PriceLevel {
        PriceLevel {
            price,
            queue: Mutex::new(VecDeque::new()),
            aggregate_qty: AtomicU64::new(0),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Cached aggregate remaining quantity. `> 0` whenever the level is
    /// live in its side; readable without locking.
    pub fn aggregate_qty(&self) -> Qty {
        Qty(self.aggregate_qty.load(Ordering::Acquire))
    }

    pub fn is_empty(&self) -> bool {
        self.aggregate_qty.load(Ordering::Acquire) == 0
    }

    pub fn order_count(&self) -> usize {
        self.queue.lock().expect("price level mutex poisoned").len()
    }

    /// Appends a resting order, adjusting the aggregate by its remaining
    /// quantity.
    pub fn push_back(&self, order: Order) {
        let remaining = order.remaining();
        self.queue
            .lock()
            .expect("price level mutex poisoned")
            .push_back(order);
        self.aggregate_qty.fetch_add(remaining.0, Ordering::AcqRel);
    }

    /// Removes a specific resting order by id, wherever it sits in the
    /// queue. `O(queue length)`, acceptable per §4.3 since cancellation is
    /// amortised by the order index pointing directly at this level.
    pub fn remove(&self, order_id: &OrderId) -> Option<Order> {
        let mut queue = self.queue.lock().expect("price level mutex poisoned");
        let pos = queue.iter().position(|o| &o.order_id == order_id)?;
        let removed = queue.remove(pos).expect("position just located");
        self.aggregate_qty
            .fetch_sub(removed.remaining().0, Ordering::AcqRel);
        Some(removed)
    }

    /// Runs `f` against the head resting order and records the fill it
    /// applies against the cached aggregate. Returns `None` once the queue
    /// is empty. If `f` exhausts the head order, it is popped before
    /// returning.
    pub fn match_head<F>(&self, f: F) -> Option<(Order, Qty)>
    where
        F: FnOnce(&mut Order) -> Qty,
    {
        let mut queue = self.queue.lock().expect("price level mutex poisoned");
        let head = queue.front_mut()?;
        let traded = f(head);
        self.aggregate_qty.fetch_sub(traded.0, Ordering::AcqRel);
        let exhausted = head.remaining().is_zero();
        let snapshot = head.clone();
        if exhausted {
            queue.pop_front();
        }
        Some((snapshot, traded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NewOrder;
    use crate::types::{OrderKind, Side};

    fn order(id: &str, qty: u64) -> Order {
        Order::new(
            NewOrder {
                order_id: id.into(),
                symbol: "BTC-USD".into(),
                side: Side::Buy,
                kind: OrderKind::Limit,
                quantity: qty as i128,
                price: Some(50_000),
            },
            1,
        )
    }

    #[test]
    fn push_back_updates_aggregate() {
        let level = PriceLevel::new(Price(50_000));
        level.push_back(order("a", 10));
        level.push_back(order("b", 5));
        assert_eq!(level.aggregate_qty(), Qty(15));
        assert_eq!(level.order_count(), 2);
    }

    #[test]
    fn remove_drops_order_and_adjusts_aggregate() {
        let level = PriceLevel::new(Price(50_000));
        level.push_back(order("a", 10));
        level.push_back(order("b", 5));
        let removed = level.remove(&"a".to_string()).unwrap();
        assert_eq!(removed.order_id, "a");
        assert_eq!(level.aggregate_qty(), Qty(5));
        assert!(level.remove(&"a".to_string()).is_none());
    }

    #[test]
    fn match_head_partially_fills_and_keeps_head() {
        let level = PriceLevel::new(Price(50_000));
        level.push_back(order("a", 10));
        let (maker, traded) = level.match_head(|o| {
            let t = Qty(4);
            o.apply_fill(t);
            t
        }).unwrap();
        assert_eq!(traded, Qty(4));
        assert_eq!(maker.order_id, "a");
        assert_eq!(level.aggregate_qty(), Qty(6));
        assert_eq!(level.order_count(), 1);
    }

    #[test]
    fn match_head_pops_when_exhausted() {
        let level = PriceLevel::new(Price(50_000));
        level.push_back(order("a", 10));
        level.match_head(|o| {
            let t = o.remaining();
            o.apply_fill(t);
            t
        });
        assert!(level.is_empty());
        assert_eq!(level.order_count(), 0);
    }
}
