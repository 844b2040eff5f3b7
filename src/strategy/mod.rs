// =============================================================================
// Strategy Module
// =============================================================================
//
// - Static asset → rule-family table
// - Trigger evaluator producing entry/exit signals per asset

pub mod config;
pub mod trigger;

pub use config::{default_assets, AssetRole, AssetTriggerConfig, StrategyFamily};
pub use trigger::{evaluate_trigger, TriggerState, MIN_CANDLES};
