// =============================================================================
// Runtime Configuration — asset table and collaborator endpoints
// =============================================================================
//
// Loaded once at start-up from JSON. The asset table is immutable for the
// life of the process. All fields carry `#[serde(default)]` so that adding
// new fields never breaks loading an older config file. Nothing writes the
// file back; edits take effect on the next start.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::strategy::config::{default_assets, AssetTriggerConfig};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_history_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_history_limit() -> u32 {
    300
}

fn default_stream_base_url() -> String {
    "wss://stream.binance.com:9443".to_string()
}

fn default_history_request_delay_ms() -> u64 {
    500
}

fn default_history_refresh_secs() -> u64 {
    900
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Assets -------------------------------------------------------------

    /// Symbol → strategy family table.
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetTriggerConfig>,

    // --- History source -----------------------------------------------------

    /// Base URL of the REST kline endpoint.
    #[serde(default = "default_history_base_url")]
    pub history_base_url: String,

    /// Bars requested per history fetch.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Pause between consecutive history requests (milliseconds).
    #[serde(default = "default_history_request_delay_ms")]
    pub history_request_delay_ms: u64,

    /// Interval between full history refresh passes (seconds). 0 disables.
    #[serde(default = "default_history_refresh_secs")]
    pub history_refresh_secs: u64,

    // --- Live ticks ---------------------------------------------------------

    /// Base URL of the kline WebSocket.
    #[serde(default = "default_stream_base_url")]
    pub stream_base_url: String,

    /// Wait before reconnecting a dropped stream (seconds).
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    // --- API ----------------------------------------------------------------

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            history_base_url: default_history_base_url(),
            history_limit: default_history_limit(),
            history_request_delay_ms: default_history_request_delay_ms(),
            history_refresh_secs: default_history_refresh_secs(),
            stream_base_url: default_stream_base_url(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            assets = config.assets.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Keep only the assets whose symbol appears in `symbols`
    /// (case-insensitive). An empty filter keeps everything.
    pub fn retain_symbols(&mut self, symbols: &[String]) {
        if symbols.is_empty() {
            return;
        }
        self.assets
            .retain(|a| symbols.iter().any(|s| s.eq_ignore_ascii_case(&a.symbol)));
    }

    pub fn history_request_delay(&self) -> Duration {
        Duration::from_millis(self.history_request_delay_ms)
    }

    pub fn history_refresh(&self) -> Option<Duration> {
        (self.history_refresh_secs > 0).then(|| Duration::from_secs(self.history_refresh_secs))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}
