// =============================================================================
// Asset Trigger Configuration
// =============================================================================
//
// Static per-symbol table: which rule family an asset follows and which
// interval its candles are sampled at. Adding an asset means adding a row
// here (or in runtime_config.json); the evaluator never branches on ticker.
// =============================================================================

use serde::{Deserialize, Serialize};

fn default_swing_left() -> usize {
    10
}

fn default_swing_right() -> usize {
    2
}

/// Entry/exit rule template an asset is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyFamily {
    /// Close vs. EMA-21.
    MacroTrend,
    /// Close above SMA-50 and the last swing high; exit below SMA-50.
    StructureBreak,
    /// Close above the prior 20-bar high; exit below SMA-10.
    MomentumBreakout,
    /// Close above SMA-100; exit below the last swing low.
    StructureBreakAlt,
}

impl StrategyFamily {
    pub const EMA_PERIOD: usize = 21;
    pub const STRUCTURE_SMA_PERIOD: usize = 50;
    pub const MOMENTUM_LOOKBACK: usize = 20;
    pub const MOMENTUM_SMA_PERIOD: usize = 10;
    pub const STRUCTURE_ALT_SMA_PERIOD: usize = 100;

    pub fn entry_rule(self) -> &'static str {
        match self {
            Self::MacroTrend => "Close > EMA 21",
            Self::StructureBreak => "Close > SMA 50 and > last swing high",
            Self::MomentumBreakout => "Close > prior 20-bar high",
            Self::StructureBreakAlt => "Close > SMA 100",
        }
    }

    pub fn exit_rule(self) -> &'static str {
        match self {
            Self::MacroTrend => "Close < EMA 21",
            Self::StructureBreak => "Close < SMA 50",
            Self::MomentumBreakout => "Close < SMA 10",
            Self::StructureBreakAlt => "Close < last swing low",
        }
    }
}

impl std::fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacroTrend => write!(f, "Macro Trend"),
            Self::StructureBreak => write!(f, "Structure Break"),
            Self::MomentumBreakout => write!(f, "Momentum Breakout"),
            Self::StructureBreakAlt => write!(f, "Structure Break (alt)"),
        }
    }
}

/// Portfolio role of a tracked asset. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    Anchor,
    Core,
    Satellite,
}

impl Default for AssetRole {
    fn default() -> Self {
        Self::Satellite
    }
}

/// One row of the trigger table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTriggerConfig {
    pub symbol: String,
    #[serde(default)]
    pub role: AssetRole,
    pub family: StrategyFamily,
    /// Candle interval, e.g. "1d" or "4h".
    pub interval: String,
    /// Bars to the left of a swing pivot.
    #[serde(default = "default_swing_left")]
    pub swing_left: usize,
    /// Bars to the right of a swing pivot (confirmation delay).
    #[serde(default = "default_swing_right")]
    pub swing_right: usize,
}

impl AssetTriggerConfig {
    pub fn new(
        symbol: impl Into<String>,
        role: AssetRole,
        family: StrategyFamily,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            role,
            family,
            interval: interval.into(),
            swing_left: default_swing_left(),
            swing_right: default_swing_right(),
        }
    }
}

/// The built-in trigger table used when no config file overrides it.
pub fn default_assets() -> Vec<AssetTriggerConfig> {
    use AssetRole::*;
    use StrategyFamily::*;

    vec![
        AssetTriggerConfig::new("BTCUSDT", Anchor, MacroTrend, "1d"),
        AssetTriggerConfig::new("ETHUSDT", Core, StructureBreak, "1d"),
        AssetTriggerConfig::new("SOLUSDT", Core, StructureBreak, "1d"),
        AssetTriggerConfig::new("LINKUSDT", Satellite, MomentumBreakout, "4h"),
        AssetTriggerConfig::new("AVAXUSDT", Satellite, MomentumBreakout, "4h"),
        AssetTriggerConfig::new("BNBUSDT", Core, StructureBreakAlt, "1d"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_unique_symbols() {
        let assets = default_assets();
        let mut symbols: Vec<&str> = assets.iter().map(|a| a.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), assets.len());
    }

    #[test]
    fn deserialise_row_fills_swing_defaults() {
        let json = r#"{ "symbol": "ETHUSDT", "family": "structure_break", "interval": "1d" }"#;
        let row: AssetTriggerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(row.family, StrategyFamily::StructureBreak);
        assert_eq!(row.role, AssetRole::Satellite);
        assert_eq!(row.swing_left, 10);
        assert_eq!(row.swing_right, 2);
    }

    #[test]
    fn rule_descriptions_are_present() {
        for family in [
            StrategyFamily::MacroTrend,
            StrategyFamily::StructureBreak,
            StrategyFamily::MomentumBreakout,
            StrategyFamily::StructureBreakAlt,
        ] {
            assert!(!family.entry_rule().is_empty());
            assert!(!family.exit_rule().is_empty());
        }
    }
}
