// =============================================================================
// Signal Desk — Main Entry Point
// =============================================================================
//
// Wires the trigger engine to its collaborators:
//   history REST source  → serialized bulk load (+ periodic refresh)
//   kline WebSocket      → live tick merge, one subscription per asset
//   signal board         → read-only REST API for the dashboard
// =============================================================================

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use signal_desk::api;
use signal_desk::app_state::SignalBoard;
use signal_desk::history::{load_all_history, RestHistoryClient};
use signal_desk::market_data::kline_stream::run_tick_stream;
use signal_desk::market_data::LiveSubscriptions;
use signal_desk::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "runtime_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Signal Desk starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Restrict the asset table from env if requested.
    if let Ok(syms) = std::env::var("SIGNAL_DESK_SYMBOLS") {
        let symbols: Vec<String> = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        config.retain_symbols(&symbols);
    }
    if let Ok(addr) = std::env::var("SIGNAL_DESK_BIND_ADDR") {
        config.bind_addr = addr;
    }

    for asset in &config.assets {
        info!(
            symbol = %asset.symbol,
            interval = %asset.interval,
            family = %asset.family,
            "tracking asset"
        );
    }

    // ── 2. Shared state ──────────────────────────────────────────────────
    let board = Arc::new(SignalBoard::new(config.assets.clone()));
    let history = RestHistoryClient::new(config.history_base_url.clone(), config.history_limit)?;

    // ── 3. API server ────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    let app = api::rest::router(board.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 4. History: initial pass, then periodic refresh ──────────────────
    let hist_board = board.clone();
    let delay = config.history_request_delay();
    let refresh = config.history_refresh();
    tokio::spawn(async move {
        load_all_history(&hist_board, &history, delay).await;

        let Some(period) = refresh else {
            return;
        };
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            load_all_history(&hist_board, &history, delay).await;
        }
    });

    // ── 5. Live ticks (one subscription per asset) ───────────────────────
    let subscriptions = LiveSubscriptions::new();
    for asset in board.assets() {
        let stream_board = board.clone();
        let base_url = config.stream_base_url.clone();
        let symbol = asset.symbol.clone();
        let interval = asset.interval.clone();
        let reconnect = config.reconnect_delay();

        subscriptions.subscribe(&asset.symbol, async move {
            loop {
                if let Err(e) = run_tick_stream(&base_url, &symbol, &interval, &stream_board).await {
                    error!(symbol = %symbol, error = %e, "Kline stream error -- reconnecting");
                }
                tokio::time::sleep(reconnect).await;
            }
        });
    }
    info!(count = subscriptions.len(), "Live tick streams launched");

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received, stopping");

    subscriptions.shutdown();
    info!("Signal Desk shut down complete.");
    Ok(())
}
