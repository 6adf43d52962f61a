// limit_core/src/book/level.rs

use crate::types::{Order, Price};
use std::collections::VecDeque;

/// A single distinct price with its FIFO queue of resting orders.
///
/// Invariant: every order in `orders` has `remaining() > 0` and matches this
/// level's side; queue order is arrival order at this price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    pub price: Price,
    pub orders: VecDeque<Order>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self { price, orders: VecDeque::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
