// =============================================================================
// Swing High / Swing Low detection
// =============================================================================
//
// A pivot at index `i` needs `left` bars before it and `right` bars after it.
// The detector only reports confirmed pivots: the newest index that can be
// classified is `len - 1 - right`, so the last `right` bars are never pivots.
//
// Tie-break (asymmetric, intentional):
//   swing high: a left neighbour STRICTLY above disqualifies,
//               a right neighbour at-or-above disqualifies.
//   swing low:  mirrored.
// Equal highs therefore resolve to the earliest bar of the plateau.

/// Value of the most recent confirmed swing high, or `None`.
pub fn find_last_swing_high(highs: &[f64], left: usize, right: usize) -> Option<f64> {
    find_last_pivot(highs, left, right, |n, c| n > c, |n, c| n >= c)
}

/// Value of the most recent confirmed swing low, or `None`.
pub fn find_last_swing_low(lows: &[f64], left: usize, right: usize) -> Option<f64> {
    find_last_pivot(lows, left, right, |n, c| n < c, |n, c| n <= c)
}

/// Scan backwards from the newest confirmable index. `beats_on_left(n, c)` /
/// `beats_on_right(n, c)` say whether neighbour `n` disqualifies candidate `c`.
fn find_last_pivot(
    series: &[f64],
    left: usize,
    right: usize,
    beats_on_left: impl Fn(f64, f64) -> bool,
    beats_on_right: impl Fn(f64, f64) -> bool,
) -> Option<f64> {
    if series.len() < left + right + 1 {
        return None;
    }

    let newest = series.len() - 1 - right;
    (left..=newest).rev().find_map(|i| {
        let candidate = series[i];
        let left_ok = !series[i - left..i].iter().any(|&n| beats_on_left(n, candidate));
        let right_ok = !series[i + 1..=i + right].iter().any(|&n| beats_on_right(n, candidate));
        (left_ok && right_ok).then_some(candidate)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_high_basic() {
        assert_eq!(find_last_swing_high(&[1.0, 5.0, 9.0, 3.0, 2.0], 1, 1), Some(9.0));
    }

    #[test]
    fn swing_low_basic() {
        assert_eq!(find_last_swing_low(&[9.0, 5.0, 1.0, 3.0, 4.0], 1, 1), Some(1.0));
    }

    #[test]
    fn too_short_returns_none() {
        let series = [1.0, 2.0, 3.0, 2.0];
        assert_eq!(find_last_swing_high(&series, 2, 2), None);
        assert_eq!(find_last_swing_low(&series, 2, 2), None);
        assert_eq!(find_last_swing_high(&[], 0, 0), None);
    }

    #[test]
    fn monotonic_series_has_no_pivot() {
        let rising: Vec<f64> = (0..30).map(|x| x as f64).collect();
        assert_eq!(find_last_swing_high(&rising, 10, 2), None);
        let falling: Vec<f64> = rising.iter().rev().copied().collect();
        assert_eq!(find_last_swing_low(&falling, 10, 2), None);
    }

    #[test]
    fn equal_left_neighbour_passes_for_high() {
        assert_eq!(find_last_swing_high(&[5.0, 5.0, 3.0], 1, 1), Some(5.0));
    }

    #[test]
    fn equal_right_neighbour_disqualifies_high() {
        assert_eq!(find_last_swing_high(&[3.0, 5.0, 5.0], 1, 1), None);
    }

    #[test]
    fn equal_left_neighbour_passes_for_low() {
        assert_eq!(find_last_swing_low(&[2.0, 2.0, 4.0], 1, 1), Some(2.0));
        assert_eq!(find_last_swing_low(&[4.0, 2.0, 2.0], 1, 1), None);
    }

    #[test]
    fn returns_most_recent_pivot() {
        // pivots at index 2 (8.0) and index 6 (7.0)
        let highs = [1.0, 2.0, 8.0, 3.0, 2.0, 4.0, 7.0, 5.0, 4.0];
        assert_eq!(find_last_swing_high(&highs, 2, 2), Some(7.0));
    }

    #[test]
    fn finders_are_repeatable_and_leave_input_alone() {
        let series: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.5).sin() * 7.0).collect();
        let copy = series.clone();

        let high = find_last_swing_high(&series, 10, 2);
        let low = find_last_swing_low(&series, 10, 2);
        assert!(high.is_some() && low.is_some());
        assert_eq!(high.map(f64::to_bits), find_last_swing_high(&series, 10, 2).map(f64::to_bits));
        assert_eq!(low.map(f64::to_bits), find_last_swing_low(&series, 10, 2).map(f64::to_bits));
        assert_eq!(series, copy);
    }

    #[test]
    fn unconfirmed_tail_is_ignored() {
        // 9.0 at the last index has no right-hand bars yet
        let highs = [1.0, 6.0, 2.0, 1.0, 9.0];
        assert_eq!(find_last_swing_high(&highs, 1, 1), Some(6.0));
    }
}
