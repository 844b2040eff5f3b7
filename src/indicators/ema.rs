// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The first EMA value is seeded with the SMA of the first `period` closes and
// placed at index `period - 1`. Trigger thresholds are tuned against exactly
// this seeding and recurrence, so keep the arithmetic order as written.
//
// NOTE: when there is not enough data this returns an EMPTY Vec, whereas
// `calculate_sma` returns a NaN-padded Vec of the input length. Callers test
// EMA availability with "is there a last value" and SMA availability through
// NaN propagation; do not unify the two without auditing every caller.
// =============================================================================

/// Smoothing factor `2 / (period + 1)`.
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Compute the EMA series for `closes` with look-back `period`.
///
/// The output is aligned index-for-index with `closes`: entries before
/// `period - 1` are NaN.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period` => empty vec
pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = ema_multiplier(period);

    let mut result = vec![f64::NAN; closes.len()];
    let seed: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev_ema = seed;
    for (i, &close) in closes.iter().enumerate().skip(period) {
        let ema = (close - prev_ema) * multiplier + prev_ema;
        result[i] = ema;
        prev_ema = ema;
    }

    result
}

/// Advance an EMA by one observation without recomputing the series.
///
/// Used when a live tick revises or appends a single close. Produces the same
/// bits as the corresponding step inside [`calculate_ema`].
pub fn ema_step(prev_ema: f64, new_close: f64, period: usize) -> f64 {
    (new_close - prev_ema) * ema_multiplier(period) + prev_ema
}
