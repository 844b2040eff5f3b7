// =============================================================================
// History Module
// =============================================================================
//
// Bulk OHLC history retrieval:
// - `HistorySource` seam and the REST kline client behind it
// - Serialized loader that fills the signal board one asset at a time

pub mod client;
pub mod loader;

pub use client::{HistorySource, RestHistoryClient};
pub use loader::{load_all_history, LoadReport};
