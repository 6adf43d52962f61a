// limit_core/src/lib.rs
//
// Single-instrument limit order matching engine core: event ring, price-time
// priority book, and the matching worker that binds them.

pub mod book;
pub mod config;
pub mod engine;
pub mod error;
pub mod ring;
pub mod types;
pub mod worker;

pub use config::EngineConfig;
pub use engine::{new_engine, Engine};
pub use error::EngineError;
pub use ring::EventRing;
pub use types::{Event, EventKind, Order, OrderStatus, Price, Quantity, Side, Trade};
pub use worker::EventHandler;
