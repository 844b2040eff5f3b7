pub mod candle_series;
pub mod kline_stream;
pub mod subscriptions;

// Re-export the core types for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle_series::{Candle, CandleSeries, LiveTick, TickOutcome};
pub use subscriptions::LiveSubscriptions;
