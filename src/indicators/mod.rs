// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math used by the trigger evaluator.
// Insufficient data is never an error: series functions pad with NaN (or
// return an empty Vec for EMA) and level lookups return `Option<f64>`.
//
// Input series are assumed sorted and de-duplicated by the ingestion layer;
// nothing here re-validates ordering.

pub mod ema;
pub mod sma;
pub mod swing;

pub use ema::{calculate_ema, ema_multiplier, ema_step};
pub use sma::{calculate_donchian_high, calculate_sma};
pub use swing::{find_last_swing_high, find_last_swing_low};

/// Last element of a derived series, if it exists and is a real number.
///
/// Works for both conventions: an empty EMA yields `None`, a NaN-padded SMA
/// tail yields `None`.
pub fn last_defined(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_defined_handles_both_conventions() {
        assert_eq!(last_defined(&[]), None);
        assert_eq!(last_defined(&[f64::NAN, f64::NAN]), None);
        assert_eq!(last_defined(&[f64::NAN, 3.5]), Some(3.5));
    }
}
