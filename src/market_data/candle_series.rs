use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One OHLC bar. `time` is the bar's open time in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}

/// A live update for the still-open (or next) bar of one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveTick {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// What [`CandleSeries::apply_tick`] did with a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Same `time` as the last bar: OHLC overwritten in place.
    Updated,
    /// Newer `time`: pushed as a new bar.
    Appended,
    /// Series empty (no bulk load yet): tick discarded, not buffered.
    Dropped,
    /// Older than the last bar: ignored.
    Stale,
}

impl TickOutcome {
    /// `true` when the series changed and derived state must be recomputed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Updated | Self::Appended)
    }
}

// ---------------------------------------------------------------------------
// CandleSeries -- ordered, de-duplicated bars for one (symbol, interval)
// ---------------------------------------------------------------------------

/// Bars sorted ascending by `time` with no duplicate timestamps.
///
/// The last bar may be the in-progress one; live ticks revise it in place
/// while its `time` matches, and start a new bar once `time` moves forward.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series from a raw history response.
    ///
    /// Sorts by time and drops duplicate timestamps, keeping the later record
    /// of each duplicate run.
    pub fn from_history(mut candles: Vec<Candle>) -> Self {
        // Stable sort keeps arrival order among equal timestamps.
        candles.sort_by_key(|c| c.time);

        let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
        for candle in candles {
            match deduped.last_mut() {
                Some(last) if last.time == candle.time => *last = candle,
                _ => deduped.push(candle),
            }
        }

        Self { candles: deduped }
    }

    /// Merge one live tick into the series.
    pub fn apply_tick(&mut self, tick: &LiveTick) -> TickOutcome {
        let Some(last) = self.candles.last_mut() else {
            debug!(time = tick.time, "tick before history load -- dropped");
            return TickOutcome::Dropped;
        };

        if tick.time == last.time {
            last.open = tick.open;
            last.high = tick.high;
            last.low = tick.low;
            last.close = tick.close;
            TickOutcome::Updated
        } else if tick.time > last.time {
            self.candles.push(Candle::new(tick.time, tick.open, tick.high, tick.low, tick.close));
            TickOutcome::Appended
        } else {
            debug!(time = tick.time, last_time = last.time, "stale tick ignored");
            TickOutcome::Stale
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Close of the newest bar (possibly still open).
    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
