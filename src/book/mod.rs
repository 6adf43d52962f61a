// limit_core/src/book/mod.rs
//
// Two price-sorted ladders of `PriceLevel`s, each a contiguous sorted `Vec`
// per the "the source uses a contiguous sequence" design note: O(log n)
// insertion via binary search, good cache behavior for the shallow, busy
// books this engine targets. `match` never re-inserts the taker; the caller
// (the matching worker) performs `add` for any residual, per the resolved
// open question on taker re-insertion.

mod level;

pub use level::PriceLevel;

use crate::types::{Order, Price, Quantity, Side, Trade};

#[derive(Debug, Default)]
pub struct OrderBook {
    /// Strictly descending by price.
    bids: Vec<PriceLevel>,
    /// Strictly ascending by price.
    asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self { bids: Vec::new(), asks: Vec::new() }
    }

    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    fn own_ladder_mut(&mut self, side: Side) -> &mut Vec<PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn opposite_ladder_mut(&mut self, side: Side) -> &mut Vec<PriceLevel> {
        match side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        }
    }

    fn crossable(taker_side: Side, taker_price: Price, level_price: Price) -> bool {
        match taker_side {
            Side::Buy => taker_price >= level_price,
            Side::Sell => taker_price <= level_price,
        }
    }

    /// Match `taker` against the opposing ladder in price-time priority.
    /// Mutates `taker`'s filled/status in place and returns trades in
    /// generation order. Never re-inserts `taker`; the caller must `add` any
    /// residual quantity.
    pub fn match_order(&mut self, taker: &mut Order, now_ns: u64) -> Vec<Trade> {
        let mut trades = Vec::new();
        let ladder = self.opposite_ladder_mut(taker.side);

        let mut level_idx = 0usize;
        while level_idx < ladder.len() {
            let level_price = ladder[level_idx].price;
            if !Self::crossable(taker.side, taker.price, level_price) {
                break;
            }

            loop {
                if taker.remaining() == Quantity::ZERO {
                    break;
                }
                let Some(front) = ladder[level_idx].orders.front() else {
                    break;
                };
                if front.remaining() == Quantity::ZERO {
                    ladder[level_idx].orders.pop_front();
                    continue;
                }

                let maker_remaining = front.remaining();
                let q = taker.remaining().min(maker_remaining);

                taker.apply_fill(q);
                let maker = ladder[level_idx].orders.front_mut().unwrap();
                maker.apply_fill(q);

                let (buy_id, sell_id) = match taker.side {
                    Side::Buy => (taker.id.clone(), maker.id.clone()),
                    Side::Sell => (maker.id.clone(), taker.id.clone()),
                };
                trades.push(Trade::new(buy_id, sell_id, level_price, q, now_ns));

                if maker.is_filled() {
                    ladder[level_idx].orders.pop_front();
                }
            }

            // Prune the level before deciding whether to keep walking, so an
            // empty level is never left behind even if this event's last
            // fill exhausted both the taker and the level in the same step.
            if ladder[level_idx].orders.is_empty() {
                ladder.remove(level_idx);
                // The next level shifted into this index; don't advance it.
            } else {
                level_idx += 1;
            }

            if taker.remaining() == Quantity::ZERO {
                break;
            }
        }

        trades
    }

    /// Insert `order` (must have `remaining() > 0`) at the tail of its price
    /// level, creating the level if absent, preserving ladder order.
    pub fn add(&mut self, order: Order) {
        debug_assert!(order.remaining() > Quantity::ZERO, "adding a fully-filled order is a programmer error");
        let side = order.side;
        let price = order.price;
        let ladder = self.own_ladder_mut(side);

        let pos = match side {
            // Descending: the first index whose price is <= target.
            Side::Buy => ladder.partition_point(|lvl| lvl.price > price),
            // Ascending: the first index whose price is >= target.
            Side::Sell => ladder.partition_point(|lvl| lvl.price < price),
        };

        if pos < ladder.len() && ladder[pos].price == price {
            ladder[pos].orders.push_back(order);
        } else {
            let mut level = PriceLevel::new(price);
            level.orders.push_back(order);
            ladder.insert(pos, level);
        }
    }

    /// Locate and excise an order by identifier from either ladder. Returns
    /// whether an order was removed; excises the level too if now empty.
    pub fn remove(&mut self, id: &str) -> bool {
        Self::remove_from(&mut self.bids, id) || Self::remove_from(&mut self.asks, id)
    }

    fn remove_from(ladder: &mut Vec<PriceLevel>, id: &str) -> bool {
        for (level_idx, level) in ladder.iter_mut().enumerate() {
            if let Some(order_idx) = level.orders.iter().position(|o| o.id == id) {
                level.orders.remove(order_idx);
                if level.is_empty() {
                    ladder.remove(level_idx);
                }
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn px(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    fn order(id: &str, side: Side, price: &str, qty: &str) -> Order {
        Order::new(id, side, px(price), px(qty)).unwrap()
    }

    #[test]
    fn add_maintains_ladder_order_s1() {
        let mut book = OrderBook::new();
        book.add(order("sell-1", Side::Sell, "100.5", "2.0"));
        book.add(order("sell-2", Side::Sell, "100.8", "1.5"));
        book.add(order("sell-3", Side::Sell, "100.2", "3.0"));

        let prices: Vec<_> = book.asks().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![px("100.2"), px("100.5"), px("100.8")]);
        assert_eq!(book.asks()[0].orders.front().unwrap().id, "sell-3");
    }

    #[test]
    fn scenario_s2_partial_sweep_of_best_ask() {
        let mut book = OrderBook::new();
        book.add(order("sell-1", Side::Sell, "100.5", "2.0"));
        book.add(order("sell-2", Side::Sell, "100.8", "1.5"));
        book.add(order("sell-3", Side::Sell, "100.2", "3.0"));

        let mut taker = order("buy-A", Side::Buy, "100.3", "1.0");
        let trades = book.match_order(&mut taker, 1);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, px("100.2"));
        assert_eq!(trades[0].quantity, px("1.0"));
        assert_eq!(trades[0].buy_order_id, "buy-A");
        assert_eq!(trades[0].sell_order_id, "sell-3");
        assert!(taker.is_filled());
        assert_eq!(book.asks()[0].orders.front().unwrap().remaining(), px("2.0"));
    }

    #[test]
    fn scenario_s3_fully_consumes_level_then_prunes() {
        let mut book = OrderBook::new();
        book.add(order("sell-1", Side::Sell, "100.5", "2.0"));
        book.add(order("sell-2", Side::Sell, "100.8", "1.5"));
        let mut sell3 = order("sell-3", Side::Sell, "100.2", "3.0");
        sell3.apply_fill(px("1.0"));
        book.add(sell3);

        let mut taker = order("buy-B", Side::Buy, "100.8", "2.0");
        let trades = book.match_order(&mut taker, 2);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, px("100.2"));
        assert_eq!(trades[0].quantity, px("2.0"));
        assert!(taker.is_filled());

        let prices: Vec<_> = book.asks().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![px("100.5"), px("100.8")]);
    }

    #[test]
    fn scenario_s4_no_cross_rests_as_new_bid_level() {
        let mut book = OrderBook::new();
        book.add(order("sell-1", Side::Sell, "100.5", "2.0"));

        let mut taker = order("buy-C", Side::Buy, "100.1", "1.5");
        let trades = book.match_order(&mut taker, 3);
        assert!(trades.is_empty());
        assert_eq!(taker.remaining(), px("1.5"));

        book.add(taker);
        assert_eq!(book.bids()[0].price, px("100.1"));
    }

    #[test]
    fn scenario_s5_cancel_then_second_cancel_is_noop() {
        let mut book = OrderBook::new();
        book.add(order("sell-1", Side::Sell, "100.5", "2.0"));
        assert!(book.remove("sell-1"));
        assert!(book.asks().is_empty());
        assert!(!book.remove("sell-1"));
    }

    #[test]
    fn price_time_priority_within_a_level() {
        let mut book = OrderBook::new();
        book.add(order("m1", Side::Sell, "10.0", "1.0"));
        book.add(order("m2", Side::Sell, "10.0", "1.0"));

        let mut taker = order("taker", Side::Buy, "10.0", "1.0");
        let trades = book.match_order(&mut taker, 1);
        assert_eq!(trades[0].sell_order_id, "m1");
        assert_eq!(book.asks()[0].orders.front().unwrap().id, "m2");
    }

    #[test]
    fn zero_remaining_maker_is_pruned_not_traded() {
        let mut book = OrderBook::new();
        let mut stale = order("stale", Side::Sell, "10.0", "1.0");
        stale.apply_fill(px("1.0"));
        assert!(stale.is_filled());
        book.asks_for_test_push(stale);
        book.add(order("m2", Side::Sell, "10.0", "1.0"));

        let mut taker = order("taker", Side::Buy, "10.0", "1.0");
        let trades = book.match_order(&mut taker, 1);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sell_order_id, "m2");
    }

    impl OrderBook {
        // Test-only helper to force a zero-remaining maker into a level,
        // bypassing `add`'s debug_assert, to exercise the pruning path.
        fn asks_for_test_push(&mut self, order: Order) {
            if self.asks.is_empty() {
                self.asks.push(PriceLevel::new(order.price));
            }
            self.asks[0].orders.push_back(order);
        }
    }
}
