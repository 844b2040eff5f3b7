// =============================================================================
// REST history client — public kline endpoint
// =============================================================================
//
// Fetches OHLC history as an array-of-arrays kline response:
//   [0] openTime (ms), [1] open, [2] high, [3] low, [4] close, ...
// Numeric fields arrive as JSON strings. Open time is converted to seconds.
// =============================================================================

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::market_data::Candle;

/// Anything that can produce an ordered candle history for a symbol.
pub trait HistorySource {
    fn fetch_history(
        &self,
        symbol: &str,
        interval: &str,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send;
}

/// HTTP client for the public klines endpoint.
#[derive(Clone)]
pub struct RestHistoryClient {
    base_url: String,
    limit: u32,
    client: reqwest::Client,
}

impl RestHistoryClient {
    /// Create a client against `base_url` requesting `limit` bars per call.
    pub fn new(base_url: impl Into<String>, limit: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into();
        debug!(base_url = %base_url, limit, "RestHistoryClient initialised");

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit,
            client,
        })
    }

    /// GET /api/v3/klines (public — no signature required).
    #[instrument(skip(self), name = "history::get_klines")]
    pub async fn get_klines(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, symbol, interval, self.limit
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!("GET /api/v3/klines returned {}: {}", status, body);
        }

        let candles = parse_klines(&body)?;
        debug!(symbol, interval, count = candles.len(), "klines fetched");
        Ok(candles)
    }
}

impl HistorySource for RestHistoryClient {
    fn fetch_history(
        &self,
        symbol: &str,
        interval: &str,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send {
        self.get_klines(symbol, interval)
    }
}

/// Convert a klines array-of-arrays body into candles.
///
/// Entries shorter than five elements are skipped with a warning.
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 5 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time_ms = arr[0].as_i64().context("kline open time is not an integer")?;
        candles.push(Candle::new(
            open_time_ms / 1000,
            parse_f64(&arr[1], "open")?,
            parse_f64(&arr[2], "high")?,
            parse_f64(&arr[3], "low")?,
            parse_f64(&arr[4], "close")?,
        ));
    }

    Ok(candles)
}

/// Numeric values may be JSON strings or JSON numbers.
pub(crate) fn parse_f64(val: &serde_json::Value, name: &str) -> Result<f64> {
    match val {
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .with_context(|| format!("failed to parse {name} as f64: {s}")),
        serde_json::Value::Number(n) => n
            .as_f64()
            .with_context(|| format!("field {name} is not a valid f64")),
        _ => anyhow::bail!("field {name} has unexpected JSON type"),
    }
}
