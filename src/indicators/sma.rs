// =============================================================================
// Simple Moving Average (SMA) and Donchian High
// =============================================================================
//
// Both produce a series aligned with the input. The first `period - 1`
// entries are NaN; if the input is shorter than `period` every entry is NaN.

/// Compute the SMA series for `data` with look-back `period`.
///
/// Uses a running window sum (plain floating point, no compensation).
pub fn calculate_sma(data: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    let divisor = period as f64;
    let mut window_sum: f64 = data[..period].iter().sum();
    result[period - 1] = window_sum / divisor;

    for i in period..data.len() {
        window_sum += data[i] - data[i - period];
        result[i] = window_sum / divisor;
    }

    result
}

/// Rolling maximum of `highs` over a trailing window of `period` bars.
pub fn calculate_donchian_high(highs: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; highs.len()];
    if period == 0 || highs.len() < period {
        return result;
    }

    for i in (period - 1)..highs.len() {
        result[i] = highs[i + 1 - period..=i]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            if e.is_nan() {
                assert!(a.is_nan(), "expected NaN, got {a}");
            } else {
                assert!((a - e).abs() < 1e-10, "got {a}, expected {e}");
            }
        }
    }

    #[test]
    fn sma_known_values() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_series(&sma, &[f64::NAN, f64::NAN, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_insufficient_data_is_all_nan_same_length() {
        for period in 4..10 {
            let sma = calculate_sma(&[1.0, 2.0, 3.0], period);
            assert_eq!(sma.len(), 3);
            assert!(sma.iter().all(|v| v.is_nan()));
        }
    }

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_period_one_is_identity() {
        let data = [3.0, 1.5, 7.25];
        assert_series(&calculate_sma(&data, 1), &data);
    }

    #[test]
    fn sma_sliding_sum_agrees_with_direct_mean() {
        let data: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64 * 0.3).cos() * 5.0).collect();
        let sma = calculate_sma(&data, 50);
        let direct = data[150..200].iter().sum::<f64>() / 50.0;
        assert!((sma[199] - direct).abs() < 1e-9);
    }

    fn bits(series: &[f64]) -> Vec<u64> {
        series.iter().map(|v| v.to_bits()).collect()
    }

    #[test]
    fn sma_is_repeatable_and_leaves_input_alone() {
        let data: Vec<f64> = (0..80).map(|i| 50.0 + (i as f64 * 0.7).sin() * 3.3).collect();
        let copy = data.clone();
        let a = calculate_sma(&data, 10);
        let b = calculate_sma(&data, 10);
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(bits(&data), bits(&copy));
    }

    #[test]
    fn donchian_high_is_repeatable_and_leaves_input_alone() {
        let highs: Vec<f64> = (0..80).map(|i| 50.0 + (i as f64 * 0.7).cos() * 3.3).collect();
        let copy = highs.clone();
        let a = calculate_donchian_high(&highs, 20);
        let b = calculate_donchian_high(&highs, 20);
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(bits(&highs), bits(&copy));
    }

    #[test]
    fn donchian_high_rolling_max() {
        let highs = [1.0, 3.0, 2.0, 5.0, 4.0, 1.0];
        let dc = calculate_donchian_high(&highs, 3);
        assert_series(&dc, &[f64::NAN, f64::NAN, 3.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn donchian_high_insufficient_data() {
        let dc = calculate_donchian_high(&[1.0, 2.0], 3);
        assert_eq!(dc.len(), 2);
        assert!(dc.iter().all(|v| v.is_nan()));
    }
}
