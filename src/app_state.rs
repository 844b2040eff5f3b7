// =============================================================================
// Signal Board — per-asset candle series and trigger state
// =============================================================================
//
// Explicit arena keyed by symbol. Each slot owns its asset's candle series and
// the signal state derived from it; slots are independent, so a failure or a
// tick on one asset never touches another.
//
// Thread safety:
//   - The slot map is built once and never resized; only slot contents change.
//   - Each slot sits behind its own parking_lot::RwLock.
//   - An atomic version counter bumps on every state change so the API can
//     expose a cheap "has anything changed" marker.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::market_data::{Candle, CandleSeries, LiveTick, TickOutcome};
use crate::strategy::config::{AssetTriggerConfig, StrategyFamily};
use crate::strategy::trigger::{evaluate_trigger, TriggerState};

// =============================================================================
// Asset slot
// =============================================================================

#[derive(Debug, Default)]
struct AssetSlot {
    /// `None` until the first successful history fetch.
    series: Option<CandleSeries>,
    state: TriggerState,
    last_error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Serialisable view of one asset for the signal consumer.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSignal {
    pub symbol: String,
    pub interval: String,
    pub family: StrategyFamily,
    pub entry_rule: &'static str,
    pub exit_rule: &'static str,
    pub candles: usize,
    pub last_close: Option<f64>,
    #[serde(flatten)]
    pub state: TriggerState,
    pub last_error: Option<String>,
    pub updated_at: Option<String>,
}

// =============================================================================
// SignalBoard
// =============================================================================

pub struct SignalBoard {
    /// Read-only after construction; preserves table order for snapshots.
    assets: Vec<AssetTriggerConfig>,
    slots: HashMap<String, RwLock<AssetSlot>>,
    version: AtomicU64,
}

impl SignalBoard {
    /// Build a board with every asset in the Loading state.
    ///
    /// Later rows with a symbol already present are ignored.
    pub fn new(configs: Vec<AssetTriggerConfig>) -> Self {
        let mut assets = Vec::with_capacity(configs.len());
        let mut slots = HashMap::with_capacity(configs.len());

        for config in configs {
            if slots.contains_key(&config.symbol) {
                warn!(symbol = %config.symbol, "duplicate asset row ignored");
                continue;
            }
            let slot = AssetSlot {
                state: TriggerState::loading(),
                ..AssetSlot::default()
            };
            slots.insert(config.symbol.clone(), RwLock::new(slot));
            assets.push(config);
        }

        Self {
            assets,
            slots,
            version: AtomicU64::new(1),
        }
    }

    pub fn assets(&self) -> &[AssetTriggerConfig] {
        &self.assets
    }

    pub fn config(&self, symbol: &str) -> Option<&AssetTriggerConfig> {
        self.assets.iter().find(|a| a.symbol == symbol)
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Replace an asset's history with a fresh fetch and re-evaluate.
    ///
    /// Returns `false` if the symbol is not configured.
    pub fn load_history(&self, symbol: &str, candles: Vec<Candle>) -> bool {
        let (Some(config), Some(slot)) = (self.config(symbol), self.slots.get(symbol)) else {
            warn!(symbol, "history for unknown symbol ignored");
            return false;
        };

        let series = CandleSeries::from_history(candles);
        let mut slot = slot.write();
        slot.state = evaluate_trigger(Some(&series), config);
        info!(
            symbol,
            candles = series.len(),
            entry = slot.state.entry,
            exit = slot.state.exit,
            error = slot.state.error,
            "history loaded"
        );
        slot.series = Some(series);
        slot.last_error = None;
        slot.updated_at = Some(Utc::now());
        drop(slot);

        self.bump();
        true
    }

    /// Record a failed history fetch. The asset stays in the error state
    /// until a later successful [`load_history`](Self::load_history).
    pub fn mark_fetch_failed(&self, symbol: &str, reason: impl Into<String>) {
        let Some(slot) = self.slots.get(symbol) else {
            return;
        };

        let mut slot = slot.write();
        slot.series = None;
        slot.state = TriggerState::insufficient();
        slot.last_error = Some(reason.into());
        slot.updated_at = Some(Utc::now());
        drop(slot);

        self.bump();
    }

    /// Merge a live tick and re-evaluate synchronously if the series changed.
    pub fn apply_tick(&self, symbol: &str, tick: &LiveTick) -> TickOutcome {
        let (Some(config), Some(slot)) = (self.config(symbol), self.slots.get(symbol)) else {
            return TickOutcome::Dropped;
        };

        let mut slot = slot.write();
        let outcome = match slot.series.as_mut() {
            Some(series) => series.apply_tick(tick),
            None => TickOutcome::Dropped,
        };

        if outcome.changed() {
            let previous = slot.state;
            slot.state = evaluate_trigger(slot.series.as_ref(), config);
            slot.updated_at = Some(Utc::now());
            if slot.state != previous {
                info!(
                    symbol,
                    entry = slot.state.entry,
                    exit = slot.state.exit,
                    close = tick.close,
                    "signal changed"
                );
            } else {
                debug!(symbol, ?outcome, close = tick.close, "tick merged");
            }
            drop(slot);
            self.bump();
        }

        outcome
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn signal(&self, symbol: &str) -> Option<TriggerState> {
        self.slots.get(symbol).map(|slot| slot.read().state)
    }

    pub fn asset_signal(&self, symbol: &str) -> Option<AssetSignal> {
        let config = self.config(symbol)?;
        let slot = self.slots.get(symbol)?.read();

        Some(AssetSignal {
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            family: config.family,
            entry_rule: config.family.entry_rule(),
            exit_rule: config.family.exit_rule(),
            candles: slot.series.as_ref().map_or(0, CandleSeries::len),
            last_close: slot.series.as_ref().and_then(CandleSeries::last_close),
            state: slot.state,
            last_error: slot.last_error.clone(),
            updated_at: slot.updated_at.map(|t| t.to_rfc3339()),
        })
    }

    /// All assets, in configuration order.
    pub fn snapshot(&self) -> Vec<AssetSignal> {
        self.assets
            .iter()
            .filter_map(|a| self.asset_signal(&a.symbol))
            .collect()
    }
}
