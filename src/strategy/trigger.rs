// =============================================================================
// Trigger Evaluator
// =============================================================================
//
// Turns one asset's candle series into an (entry, exit) signal pair according
// to the asset's strategy family.
//
// States:
//   Loading      no history yet                 -> loading = true
//   Insufficient fewer than MIN_CANDLES candles  -> error = true
//   Ready        family rule evaluated          -> loading = false, error = false
//
// Every evaluation recomputes the derived series from the full history and
// compares against the newest close, which may belong to a still-open bar.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{
    calculate_ema, calculate_sma, find_last_swing_high, find_last_swing_low, last_defined,
};
use crate::market_data::CandleSeries;
use crate::strategy::config::{AssetTriggerConfig, StrategyFamily};

/// Minimum number of candles before any rule is evaluated.
pub const MIN_CANDLES: usize = 20;

/// Signal state exposed to consumers for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerState {
    pub entry: bool,
    pub exit: bool,
    pub loading: bool,
    pub error: bool,
}

impl TriggerState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn insufficient() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    pub fn ready(entry: bool, exit: bool) -> Self {
        Self {
            entry,
            exit,
            loading: false,
            error: false,
        }
    }
}

/// Evaluate `config`'s rule against `series`.
///
/// `None` means the history has not been fetched yet.
pub fn evaluate_trigger(series: Option<&CandleSeries>, config: &AssetTriggerConfig) -> TriggerState {
    let Some(series) = series else {
        return TriggerState::loading();
    };
    if series.len() < MIN_CANDLES {
        return TriggerState::insufficient();
    }
    let Some(close) = series.last_close() else {
        return TriggerState::insufficient();
    };

    let (entry, exit) = match config.family {
        StrategyFamily::MacroTrend => macro_trend(series, close),
        StrategyFamily::StructureBreak => structure_break(series, close, config),
        StrategyFamily::MomentumBreakout => momentum_breakout(series, close),
        StrategyFamily::StructureBreakAlt => structure_break_alt(series, close, config),
    };

    TriggerState::ready(entry, exit)
}

fn macro_trend(series: &CandleSeries, close: f64) -> (bool, bool) {
    let ema = calculate_ema(&series.closes(), StrategyFamily::EMA_PERIOD);
    match last_defined(&ema) {
        Some(level) => (close > level, close < level),
        None => (false, false),
    }
}

fn structure_break(series: &CandleSeries, close: f64, config: &AssetTriggerConfig) -> (bool, bool) {
    let sma = calculate_sma(&series.closes(), StrategyFamily::STRUCTURE_SMA_PERIOD);
    let Some(level) = last_defined(&sma) else {
        return (false, false);
    };

    let swing_high = find_last_swing_high(&series.highs(), config.swing_left, config.swing_right);
    let entry = close > level && swing_high.is_some_and(|swing| close > swing);
    (entry, close < level)
}

fn momentum_breakout(series: &CandleSeries, close: f64) -> (bool, bool) {
    let highs = series.highs();
    let current = highs.len() - 1;
    let start = current.saturating_sub(StrategyFamily::MOMENTUM_LOOKBACK);

    // Prior bars only; the current bar's own high is excluded.
    let prev_high = highs[start..current]
        .iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or(f64::INFINITY);
    let entry = close > prev_high;

    let sma = calculate_sma(&series.closes(), StrategyFamily::MOMENTUM_SMA_PERIOD);
    let exit = last_defined(&sma).is_some_and(|level| close < level);

    (entry, exit)
}

fn structure_break_alt(series: &CandleSeries, close: f64, config: &AssetTriggerConfig) -> (bool, bool) {
    let sma = calculate_sma(&series.closes(), StrategyFamily::STRUCTURE_ALT_SMA_PERIOD);
    let entry = last_defined(&sma).is_some_and(|level| close > level);

    let swing_low = find_last_swing_low(&series.lows(), config.swing_left, config.swing_right);
    let exit = swing_low.is_some_and(|swing| close < swing);

    (entry, exit)
}
