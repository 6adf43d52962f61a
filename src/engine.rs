// limit_core/src/engine.rs
//
// The façade consumed by external code: owns the ring, the book, and the
// worker's lifecycle. `submit`/`cancel` are the only way in; the book is
// never touched from any thread but the worker's.

use crate::book::OrderBook;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::ring::EventRing;
use crate::types::{Event, Order, Quantity};
use crate::worker::{EventHandler, MatchingWorker};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Validate an order at the submission boundary: must have a positive
/// remaining quantity and a non-terminal status.
fn validate(order: &Order) -> Result<(), EngineError> {
    if order.remaining() <= Quantity::ZERO {
        return Err(EngineError::InvalidOrder(format!(
            "order {} has non-positive remaining quantity",
            order.id
        )));
    }
    if order.status.is_terminal() {
        return Err(EngineError::InvalidOrder(format!(
            "order {} already has terminal status {}",
            order.id, order.status
        )));
    }
    Ok(())
}

pub struct Engine {
    ring: Arc<EventRing<Event>>,
    book: Arc<Mutex<OrderBook>>,
    worker: MatchingWorker,
}

impl Engine {
    pub fn submit(&self, order: Order) -> Result<bool, EngineError> {
        validate(&order)?;
        let order_id = order.id.clone();
        let published = self.ring.try_publish(Event::new_order(order, now_ns()));
        if !published {
            let backpressure = EngineError::BackPressure;
            tracing::warn!(target: "engine", order_id = %order_id, error = %backpressure, "submit rejected");
        }
        Ok(published)
    }

    /// Wraps a cancellation in a `Cancel` event and publishes it. Returns
    /// `false` iff the ring is full; an unknown identifier is resolved as a
    /// silent no-op by the worker once drained, not here.
    pub fn cancel(&self, order_id: impl Into<String>) -> bool {
        // The cancel payload only needs a valid `id`; other fields are
        // ignored by `handle_cancel`, so a throwaway placeholder order
        // carries it through the ring.
        let order_id = order_id.into();
        let placeholder = Order::new(order_id.clone(), crate::types::Side::Buy, Quantity::ONE, Quantity::ONE)
            .expect("placeholder cancel order is always valid");
        let published = self.ring.try_publish(Event::cancel(placeholder, now_ns()));
        if !published {
            let backpressure = EngineError::BackPressure;
            tracing::warn!(target: "engine", order_id = %order_id, error = %backpressure, "cancel rejected");
        }
        published
    }

    pub fn start(&mut self) {
        self.worker.start();
    }

    pub fn stop(&mut self) {
        self.worker.stop();
    }

    pub fn snapshot_bids(&self) -> Vec<Order> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .bids()
            .iter()
            .flat_map(|level| level.orders.iter().cloned())
            .collect()
    }

    pub fn snapshot_asks(&self) -> Vec<Order> {
        self.book
            .lock()
            .expect("book mutex poisoned")
            .asks()
            .iter()
            .flat_map(|level| level.orders.iter().cloned())
            .collect()
    }
}

/// Construct a new engine. The worker is not started until `start()` is
/// called.
pub fn new_engine(config: EngineConfig, handler: Arc<dyn EventHandler>) -> Engine {
    tracing::info!(target: "engine", instrument = %config.instrument, ring_capacity = config.ring_capacity, "engine constructed");
    let ring = Arc::new(EventRing::new(config.ring_capacity));
    let book = Arc::new(Mutex::new(OrderBook::new()));
    let worker = MatchingWorker::new(ring.clone(), book.clone(), handler);
    Engine { ring, book, worker }
}
