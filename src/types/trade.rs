// limit_core/src/types/trade.rs

use super::decimal::{Price, Quantity};
use uuid::Uuid;

/// An executed trade between a taker and a resting maker. Immutable once emitted.
///
/// `price` always equals the maker's (resting) order price, never the taker's limit —
/// the taker only ever receives price improvement, never pays through its own limit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub buy_order_id: String,
    pub sell_order_id: String,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp_ns: u64,
}

impl Trade {
    pub fn new(
        buy_order_id: impl Into<String>,
        sell_order_id: impl Into<String>,
        price: Price,
        quantity: Quantity,
        timestamp_ns: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            buy_order_id: buy_order_id.into(),
            sell_order_id: sell_order_id.into(),
            price,
            quantity,
            timestamp_ns,
        }
    }
}
