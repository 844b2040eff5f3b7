// =============================================================================
// History loader — serialized, rate-friendly bulk fetch
// =============================================================================
//
// Fetches every configured asset ONE AT A TIME with a fixed pause between
// requests. Upstream providers rate-limit aggressively; parallel fan-out is
// not allowed here.
//
// A failed asset is recorded on the board and skipped; the remaining assets
// are still fetched.
// =============================================================================

use std::time::Duration;

use tracing::{info, warn};

use crate::app_state::SignalBoard;
use crate::history::client::HistorySource;

/// Summary of one loader pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

/// Fetch history for every asset on `board`, in table order.
pub async fn load_all_history<S: HistorySource>(
    board: &SignalBoard,
    source: &S,
    delay: Duration,
) -> LoadReport {
    let mut report = LoadReport::default();

    for (i, asset) in board.assets().iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match source.fetch_history(&asset.symbol, &asset.interval).await {
            Ok(candles) if candles.is_empty() => {
                warn!(symbol = %asset.symbol, interval = %asset.interval, "history fetch returned no candles");
                board.mark_fetch_failed(&asset.symbol, "empty history response");
                report.failed.push(asset.symbol.clone());
            }
            Ok(candles) => {
                board.load_history(&asset.symbol, candles);
                report.loaded.push(asset.symbol.clone());
            }
            Err(e) => {
                warn!(symbol = %asset.symbol, interval = %asset.interval, error = %e, "history fetch failed");
                board.mark_fetch_failed(&asset.symbol, format!("{e:#}"));
                report.failed.push(asset.symbol.clone());
            }
        }
    }

    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "history pass complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::Result;
    use parking_lot::Mutex;

    use crate::market_data::Candle;
    use crate::strategy::config::{AssetRole, AssetTriggerConfig, StrategyFamily};
    use crate::strategy::trigger::TriggerState;

    /// Serves canned histories and records the order and overlap of calls.
    #[derive(Default)]
    struct FakeSource {
        calls: Mutex<Vec<String>>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl HistorySource for FakeSource {
        fn fetch_history(
            &self,
            symbol: &str,
            _interval: &str,
        ) -> impl Future<Output = Result<Vec<Candle>>> + Send {
            self.calls.lock().push(symbol.to_string());
            let symbol = symbol.to_string();
            let in_flight = self.in_flight.clone();
            let max_in_flight = self.max_in_flight.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);
                // Hold the call open long enough for any concurrent caller to overlap.
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);

                match symbol.as_str() {
                    "BADUSDT" => anyhow::bail!("upstream 503"),
                    "EMPTYUSDT" => Ok(Vec::new()),
                    _ => Ok((0..30)
                        .map(|i| {
                            let c = 100.0 + i as f64;
                            Candle::new(i * 86_400, c, c, c, c)
                        })
                        .collect()),
                }
            }
        }
    }

    fn board(symbols: &[&str]) -> SignalBoard {
        SignalBoard::new(
            symbols
                .iter()
                .map(|s| AssetTriggerConfig::new(*s, AssetRole::Core, StrategyFamily::MacroTrend, "1d"))
                .collect(),
        )
    }

    #[tokio::test]
    async fn loads_in_table_order_one_at_a_time() {
        let board = board(&["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        let source = FakeSource::default();

        let report = load_all_history(&board, &source, Duration::from_millis(1)).await;

        assert_eq!(*source.calls.lock(), vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(report.loaded.len(), 3);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn failure_does_not_block_siblings() {
        let board = board(&["BADUSDT", "EMPTYUSDT", "ETHUSDT"]);
        let source = FakeSource::default();

        let report = load_all_history(&board, &source, Duration::ZERO).await;

        assert_eq!(report.failed, vec!["BADUSDT", "EMPTYUSDT"]);
        assert_eq!(report.loaded, vec!["ETHUSDT"]);

        let bad = board.asset_signal("BADUSDT").unwrap();
        assert!(bad.state.error && !bad.state.loading);
        assert!(bad.last_error.unwrap().contains("503"));
        assert_eq!(board.signal("ETHUSDT"), Some(TriggerState::ready(true, false)));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_requests() {
        let board = board(&["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        let source = FakeSource::default();
        let started = tokio::time::Instant::now();

        load_all_history(&board, &source, Duration::from_millis(600)).await;

        assert!(started.elapsed() >= Duration::from_millis(1200));
    }
}
