// limit_core/src/types/order.rs

use super::decimal::{Price, Quantity};
use super::side::Side;
use std::fmt;

/// Lifecycle status of an order. `Filled` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderStatus {
    New,
    Partial,
    Filled,
    Canceled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "New"),
            OrderStatus::Partial => write!(f, "Partial"),
            OrderStatus::Filled => write!(f, "Filled"),
            OrderStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

/// A limit order, either in flight to the book or resting in a `PriceLevel`.
///
/// `original` never changes after submission. `filled` only ever increases.
/// `remaining` is always derived, never stored, so the two can't drift apart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub id: String,
    pub side: Side,
    pub price: Price,
    pub original: Quantity,
    pub filled: Quantity,
    pub status: OrderStatus,
}

impl Order {
    /// Construct a brand-new order with zero fill and `New` status.
    ///
    /// Returns `None` if `quantity` is not strictly positive; callers at the
    /// engine boundary must reject such input before it reaches the book.
    pub fn new(id: impl Into<String>, side: Side, price: Price, quantity: Quantity) -> Option<Self> {
        if quantity <= Quantity::ZERO {
            return None;
        }
        Some(Self {
            id: id.into(),
            side,
            price,
            original: quantity,
            filled: Quantity::ZERO,
            status: OrderStatus::New,
        })
    }

    pub fn remaining(&self) -> Quantity {
        self.original - self.filled
    }

    pub fn is_filled(&self) -> bool {
        self.filled == self.original
    }

    /// Record a fill of `qty`, updating status. `qty` must not exceed `remaining()`.
    pub fn apply_fill(&mut self, qty: Quantity) {
        debug_assert!(qty <= self.remaining());
        self.filled += qty;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }
}
