// limit_core/src/worker.rs
//
// The single mutator of the book. Dispatches drained events by kind and
// isolates sink panics so a misbehaving handler can never leave the book
// mid-mutation or take the worker down.

use crate::book::OrderBook;
use crate::ring::EventRing;
use crate::types::{Event, EventKind, Order, OrderStatus, Trade};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Sink invoked by the worker thread for trades and order-status changes.
/// Implementations must not re-enter `submit`/`cancel` in a way that could
/// block on a full ring; only non-blocking re-entry is safe.
pub trait EventHandler: Send + Sync + 'static {
    fn on_trade(&self, trade: &Trade);
    fn on_order_update(&self, order: &Order);
}

fn emit_trade(handler: &Arc<dyn EventHandler>, trade: &Trade) {
    if catch_unwind(AssertUnwindSafe(|| handler.on_trade(trade))).is_err() {
        tracing::error!(target: "engine", trade_id = %trade.id, "sink panicked in on_trade, isolated and continuing");
    }
}

fn emit_order_update(handler: &Arc<dyn EventHandler>, order: &Order) {
    if catch_unwind(AssertUnwindSafe(|| handler.on_order_update(order))).is_err() {
        tracing::error!(target: "engine", order_id = %order.id, "sink panicked in on_order_update, isolated and continuing");
    }
}

fn handle_new(book: &mut OrderBook, mut order: Order, now_ns: u64, handler: &Arc<dyn EventHandler>) {
    let trades = book.match_order(&mut order, now_ns);
    for trade in &trades {
        emit_trade(handler, trade);
    }
    if !order.is_filled() {
        // Even a taker that produced zero trades is `Partial` once it
        // rests, not `New`.
        order.status = OrderStatus::Partial;
        book.add(order.clone());
    }
    emit_order_update(handler, &order);
}

fn handle_cancel(book: &mut OrderBook, mut order: Order, handler: &Arc<dyn EventHandler>) {
    if book.remove(&order.id) {
        order.status = OrderStatus::Canceled;
        emit_order_update(handler, &order);
    } else {
        tracing::debug!(target: "engine", order_id = %order.id, "cancel targeted an unknown order, ignored");
    }
}

fn handle_match(book: &mut OrderBook, mut order: Order, now_ns: u64, handler: &Arc<dyn EventHandler>) {
    let trades = book.match_order(&mut order, now_ns);
    if trades.is_empty() {
        return;
    }
    for trade in &trades {
        emit_trade(handler, trade);
    }
    emit_order_update(handler, &order);
}

fn dispatch(book: &mut OrderBook, event: Event, handler: &Arc<dyn EventHandler>) {
    tracing::trace!(target: "engine", kind = ?event.kind, order_id = %event.order.id, "dispatching event");
    match event.kind {
        EventKind::New => handle_new(book, event.order, event.timestamp_ns, handler),
        EventKind::Cancel => handle_cancel(book, event.order, handler),
        EventKind::Match => handle_match(book, event.order, event.timestamp_ns, handler),
    }
}

/// Owns the book and runs the single dispatch loop on a dedicated thread.
/// `start` is idempotent; `stop` is cooperative, finishing the in-flight
/// event before the thread exits.
pub struct MatchingWorker {
    ring: Arc<EventRing<Event>>,
    book: Arc<Mutex<OrderBook>>,
    handler: Arc<dyn EventHandler>,
    shutdown: Arc<AtomicBool>,
    started: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl MatchingWorker {
    pub fn new(ring: Arc<EventRing<Event>>, book: Arc<Mutex<OrderBook>>, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            ring,
            book,
            handler,
            shutdown: Arc::new(AtomicBool::new(false)),
            started: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    /// Idempotent: a second call while already running is a no-op.
    pub fn start(&mut self) {
        if self.started.swap(true, Ordering::AcqRel) {
            return;
        }
        self.shutdown.store(false, Ordering::Release);

        let ring = self.ring.clone();
        let book = self.book.clone();
        let handler = self.handler.clone();
        let shutdown = self.shutdown.clone();

        let thread = thread::Builder::new()
            .name("matching-worker".to_string())
            .spawn(move || {
                tracing::info!(target: "engine", "matching worker started");
                loop {
                    let processed = {
                        let mut book = book.lock().expect("book mutex poisoned");
                        ring.drain(|event| dispatch(&mut book, event, &handler))
                    };
                    if processed == 0 {
                        if shutdown.load(Ordering::Acquire) {
                            break;
                        }
                        thread::yield_now();
                    }
                }
                tracing::info!(target: "engine", "matching worker stopped");
            })
            .expect("failed to spawn matching worker thread");

        self.thread = Some(thread);
    }

    /// Cooperative halt: signals the worker to stop at the next quiescence
    /// point (ring empty) and joins the thread.
    pub fn stop(&mut self) {
        if !self.started.load(Ordering::Acquire) {
            return;
        }
        self.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        self.started.store(false, Ordering::Release);
    }
}

impl Drop for MatchingWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
