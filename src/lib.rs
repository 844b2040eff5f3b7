// =============================================================================
// Signal Desk — indicator and trigger engine
// =============================================================================
//
// Core: pure indicator math (`indicators`) and the per-asset trigger
// evaluator (`strategy`). Around it: candle series with live-tick merging,
// the history and tick collaborators, the per-asset signal board and a small
// read-only API.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod history;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod strategy;
