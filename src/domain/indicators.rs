//! Derived indicator columns over a price series.
//!
//! Every column is causal: the value at row i depends on rows ≤ i only.
//! Moving averages and volume confirmation are restricted to rows at or
//! after the configured analysis start date, and their trailing windows
//! restart there; RSI runs over the full series. `None` marks a row with
//! insufficient history.

use crate::domain::series::TickerSeries;
use crate::domain::settings::StrategyParams;

/// Per-row indicator values, parallel to `TickerSeries::points`.
#[derive(Debug, Clone)]
pub struct IndicatorColumns {
    pub sma_fast: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
    pub vol_sma: Vec<Option<f64>>,
    pub vol_confirm: Vec<Option<bool>>,
    pub ma_diff_pct: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

pub fn compute(series: &TickerSeries, params: &StrategyParams) -> IndicatorColumns {
    let n = series.len();
    let start = series.index_at_or_after(params.analysis_start);

    let closes: Vec<f64> = series.points.iter().map(|p| p.close).collect();
    let volumes: Vec<f64> = series.points.iter().map(|p| p.volume).collect();

    let sma_fast = restarted_mean(&closes, start, params.fast_window);
    let sma_slow = restarted_mean(&closes, start, params.slow_window);
    let vol_sma = restarted_mean(&volumes, start, params.volume_window);

    let vol_confirm: Vec<Option<bool>> = (0..n)
        .map(|i| {
            if i < start {
                return None;
            }
            Some(match vol_sma[i] {
                Some(avg) => volumes[i] > avg * params.volume_multiplier,
                None => false,
            })
        })
        .collect();

    let ma_diff_pct: Vec<Option<f64>> = (0..n)
        .map(|i| match (sma_fast[i], sma_slow[i]) {
            (Some(fast), Some(slow)) => Some((fast - slow).abs() / slow * 100.0),
            _ => None,
        })
        .collect();

    let rsi = compute_rsi(&closes, params.rsi_window);

    IndicatorColumns {
        sma_fast,
        sma_slow,
        vol_sma,
        vol_confirm,
        ma_diff_pct,
        rsi,
    }
}

/// Trailing simple mean over `window` rows; `None` until the window fills.
fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Trailing mean whose window restarts at `start`; rows before it are `None`.
fn restarted_mean(values: &[f64], start: usize, window: usize) -> Vec<Option<f64>> {
    let start = start.min(values.len());
    let mut out = vec![None; start];
    out.extend(trailing_mean(&values[start..], window));
    out
}

/// 14-period-style RSI from trailing simple means of gains and losses.
///
/// The first row has no previous close and contributes zero gain and zero
/// loss. A zero average loss pins RSI at 100; a fully flat window is
/// neutral at 50.
fn compute_rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    if window == 0 {
        return vec![None; n];
    }

    let mut gains = Vec::with_capacity(n);
    let mut losses = Vec::with_capacity(n);
    for i in 0..n {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = trailing_mean(&gains, window);
    let avg_loss = trailing_mean(&losses, window);

    (0..n)
        .map(|i| match (avg_gain[i], avg_loss[i]) {
            (Some(gain), Some(loss)) => {
                if loss == 0.0 && gain == 0.0 {
                    Some(50.0)
                } else if loss == 0.0 {
                    Some(100.0)
                } else {
                    Some(100.0 - 100.0 / (1.0 + gain / loss))
                }
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn params() -> StrategyParams {
        StrategyParams {
            fast_window: 3,
            slow_window: 5,
            volume_window: 3,
            volume_multiplier: 1.25,
            rsi_window: 3,
            ma_diff_threshold: 0.5,
            rsi_buy_max: 80.0,
            rsi_sell_min: 20.0,
            analysis_start: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        }
    }

    fn make_series(closes: &[f64], volumes: &[f64]) -> TickerSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, &volume))| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect();
        TickerSeries::new("TST".into(), points)
    }

    #[test]
    fn sma_warmup_and_values() {
        let series = make_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[100.0; 6]);
        let cols = compute(&series, &params());

        assert_eq!(cols.sma_fast[0], None);
        assert_eq!(cols.sma_fast[1], None);
        assert_eq!(cols.sma_fast[2], Some(2.0));
        assert_eq!(cols.sma_fast[5], Some(5.0));

        assert_eq!(cols.sma_slow[3], None);
        assert_eq!(cols.sma_slow[4], Some(3.0));
        assert_eq!(cols.sma_slow[5], Some(4.0));
    }

    #[test]
    fn moving_averages_undefined_before_analysis_start() {
        let mut p = params();
        // Cutoff lands on the fourth row
        p.analysis_start = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let series = make_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &[100.0; 8]);
        let cols = compute(&series, &p);

        for i in 0..3 {
            assert_eq!(cols.sma_fast[i], None);
            assert_eq!(cols.sma_slow[i], None);
            assert_eq!(cols.vol_sma[i], None);
            assert_eq!(cols.vol_confirm[i], None);
            assert_eq!(cols.ma_diff_pct[i], None);
        }
        // The window restarts at the cutoff: three post-cutoff rows needed
        assert_eq!(cols.sma_fast[3], None);
        assert_eq!(cols.sma_fast[4], None);
        assert_eq!(cols.sma_fast[5], Some(5.0));
        // RSI ignores the cutoff and is live from row 2
        assert!(cols.rsi[2].is_some());
    }

    #[test]
    fn vol_confirm_requires_spike_over_multiplier() {
        let series = make_series(
            &[10.0; 5],
            &[100.0, 100.0, 100.0, 126.0, 110.0],
        );
        let cols = compute(&series, &params());

        // Warm-up rows are a defined false, not undefined
        assert_eq!(cols.vol_confirm[0], Some(false));
        assert_eq!(cols.vol_confirm[1], Some(false));
        // vol_sma[3] = (100+100+126)/3 ≈ 108.67, threshold ≈ 135.83 > 126
        assert_eq!(cols.vol_confirm[2], Some(false));
        assert_eq!(cols.vol_confirm[3], Some(false));
        assert_eq!(cols.vol_confirm[4], Some(false));

        let series = make_series(&[10.0; 4], &[100.0, 100.0, 100.0, 300.0]);
        let cols = compute(&series, &params());
        // vol_sma[3] = (100+100+300)/3 ≈ 166.67, 300 > 208.33
        assert_eq!(cols.vol_confirm[3], Some(true));
    }

    #[test]
    fn ma_diff_pct_needs_both_averages() {
        let series = make_series(&[2.0, 2.0, 2.0, 2.0, 1.0, 1.0], &[100.0; 6]);
        let cols = compute(&series, &params());

        assert_eq!(cols.ma_diff_pct[3], None);
        // sma_fast[5] = (2+1+1)/3 = 4/3, sma_slow[5] = 8/5
        let diff = cols.ma_diff_pct[5].unwrap();
        let expected = ((4.0 / 3.0) - 1.6f64).abs() / 1.6 * 100.0;
        assert!((diff - expected).abs() < 1e-9);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let series = make_series(&[1.0, 2.0, 3.0, 4.0, 5.0], &[100.0; 5]);
        let cols = compute(&series, &params());
        assert_eq!(cols.rsi[4], Some(100.0));
    }

    #[test]
    fn rsi_flat_market_is_neutral_50() {
        let series = make_series(&[5.0; 6], &[100.0; 6]);
        let cols = compute(&series, &params());
        assert_eq!(cols.rsi[5], Some(50.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0];
        let rsi = compute_rsi(&closes, 3);
        assert_eq!(rsi[4], Some(0.0));
    }

    #[test]
    fn rsi_known_mixed_value() {
        // Changes: +2, -1, +1 over a 3-row window at the last row:
        // avg_gain = 1.0, avg_loss = 1/3, rs = 3, rsi = 75
        let closes = [10.0, 12.0, 11.0, 12.0];
        let rsi = compute_rsi(&closes, 3);
        assert!((rsi[3].unwrap() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_first_row_counts_as_no_change() {
        // Window 2 at row 1 covers the synthetic zero change of row 0
        let closes = [10.0, 11.0];
        let rsi = compute_rsi(&closes, 2);
        // avg_gain = 0.5, avg_loss = 0 → pinned at 100
        assert_eq!(rsi[1], Some(100.0));
    }

    #[test]
    fn short_series_yields_no_defined_indicators() {
        let series = make_series(&[1.0, 2.0], &[100.0, 100.0]);
        let cols = compute(&series, &params());
        assert!(cols.sma_fast.iter().all(Option::is_none));
        assert!(cols.sma_slow.iter().all(Option::is_none));
        assert!(cols.ma_diff_pct.iter().all(Option::is_none));
        assert!(cols.rsi.iter().all(Option::is_none));
    }

    proptest! {
        #[test]
        fn rsi_stays_within_bounds(closes in proptest::collection::vec(0.01f64..1000.0, 1..60)) {
            let rsi = compute_rsi(&closes, 14);
            for value in rsi.into_iter().flatten() {
                prop_assert!((0.0..=100.0).contains(&value));
            }
        }

        #[test]
        fn trailing_mean_defined_exactly_after_warmup(
            values in proptest::collection::vec(-100.0f64..100.0, 0..40),
            window in 1usize..10,
        ) {
            let means = trailing_mean(&values, window);
            prop_assert_eq!(means.len(), values.len());
            for (i, m) in means.iter().enumerate() {
                prop_assert_eq!(m.is_some(), i + 1 >= window);
            }
        }
    }
}
