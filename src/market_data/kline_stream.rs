use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tracing::{debug, error, info, warn};

use crate::app_state::SignalBoard;
use crate::history::client::parse_f64;
use crate::market_data::LiveTick;

// ---------------------------------------------------------------------------
// Kline WebSocket stream
// ---------------------------------------------------------------------------

/// Build the single-stream URL for one (symbol, interval) pair.
pub fn kline_stream_url(base_url: &str, symbol: &str, interval: &str) -> String {
    let lower = symbol.to_lowercase();
    format!("{}/ws/{lower}@kline_{interval}", base_url.trim_end_matches('/'))
}

/// Parse a kline event into `(SYMBOL, tick)`.
///
/// Accepts both the combined-stream envelope and the bare event:
/// ```json
/// { "stream": "btcusdt@kline_1d", "data": { "s": "BTCUSDT", "k": { ... } } }
/// { "e": "kline", "s": "BTCUSDT", "k": { ... } }
/// ```
/// The kline open time `k.t` (ms) becomes the tick time in seconds, so every
/// update of the same bar carries the same `time`.
pub fn parse_tick_message(text: &str) -> Result<(String, LiveTick)> {
    let root: serde_json::Value = serde_json::from_str(text).context("failed to parse kline JSON")?;

    let data = if root.get("data").is_some() {
        &root["data"]
    } else {
        &root
    };

    let symbol = data["s"]
        .as_str()
        .context("missing field s")?
        .to_uppercase();

    let k = &data["k"];
    let open_time_ms = k["t"].as_i64().context("missing field k.t")?;

    let tick = LiveTick {
        time: open_time_ms / 1000,
        open: parse_f64(&k["o"], "k.o")?,
        high: parse_f64(&k["h"], "k.h")?,
        low: parse_f64(&k["l"], "k.l")?,
        close: parse_f64(&k["c"], "k.c")?,
    };

    Ok((symbol, tick))
}

/// Connect to the kline stream for one asset and merge every tick into
/// `board`.
///
/// Runs until the stream disconnects or errors, then returns so that the
/// caller can reconnect.
pub async fn run_tick_stream(
    base_url: &str,
    symbol: &str,
    interval: &str,
    board: &Arc<SignalBoard>,
) -> Result<()> {
    let url = kline_stream_url(base_url, symbol, interval);
    info!(url = %url, symbol = %symbol, interval = %interval, "connecting to kline WebSocket");

    let (ws_stream, _response) = connect_async(&url)
        .await
        .context("failed to connect to kline WebSocket")?;

    info!(symbol = %symbol, interval = %interval, "kline WebSocket connected");
    let (_write, mut read) = ws_stream.split();

    loop {
        match read.next().await {
            Some(Ok(msg)) => {
                if let tokio_tungstenite::tungstenite::Message::Text(text) = msg {
                    match parse_tick_message(&text) {
                        Ok((tick_symbol, tick)) => {
                            let outcome = board.apply_tick(&tick_symbol, &tick);
                            debug!(symbol = %tick_symbol, close = tick.close, ?outcome, "tick");
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to parse kline message");
                        }
                    }
                }
                // Ping / Pong / Binary / Close frames are ignored --
                // tungstenite answers pings itself.
            }
            Some(Err(e)) => {
                error!(error = %e, "kline WebSocket read error");
                return Err(e.into());
            }
            None => {
                warn!(symbol = %symbol, interval = %interval, "kline WebSocket stream ended");
                return Ok(());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_lowercased() {
        assert_eq!(
            kline_stream_url("wss://stream.binance.com:9443/", "BTCUSDT", "1d"),
            "wss://stream.binance.com:9443/ws/btcusdt@kline_1d"
        );
    }

    #[test]
    fn parse_combined_envelope() {
        let json = r#"{
            "stream": "btcusdt@kline_1m",
            "data": {
                "e": "kline",
                "s": "BTCUSDT",
                "k": {
                    "t": 1700000000000,
                    "T": 1700000059999,
                    "i": "1m",
                    "o": "37000.00",
                    "h": "37050.00",
                    "l": "36990.00",
                    "c": "37020.00",
                    "x": false
                }
            }
        }"#;
        let (symbol, tick) = parse_tick_message(json).expect("should parse");
        assert_eq!(symbol, "BTCUSDT");
        assert_eq!(tick.time, 1_700_000_000);
        assert!((tick.close - 37020.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_bare_event_with_numbers() {
        let json = r#"{ "e": "kline", "s": "ethusdt",
            "k": { "t": 1700000060000, "o": 1.5, "h": 2.0, "l": 1.0, "c": 1.75 } }"#;
        let (symbol, tick) = parse_tick_message(json).unwrap();
        assert_eq!(symbol, "ETHUSDT");
        assert_eq!(tick.time, 1_700_000_060);
        assert_eq!(tick.high, 2.0);
    }

    #[test]
    fn parse_rejects_missing_kline() {
        assert!(parse_tick_message(r#"{ "s": "BTCUSDT" }"#).is_err());
        assert!(parse_tick_message("not json").is_err());
    }
}
