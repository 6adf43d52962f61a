// limit_core/src/error.rs

/// Errors surfaced at the engine's submission boundary. `BackPressure` is
/// not returned as an `Err` from `submit`/`cancel` — those calls return a
/// plain `bool` — but the engine's internal logging constructs this variant
/// to describe the same condition uniformly wherever it logs a rejection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("order rejected: {0}")]
    InvalidOrder(String),
    #[error("ring is full")]
    BackPressure,
}
