//! Crossover signal detection and event aggregation.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::indicators::IndicatorColumns;
use crate::domain::series::TickerSeries;
use crate::domain::settings::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

/// A dated buy/sell decision for one ticker, priced at that row's close.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub date: NaiveDate,
    pub ticker: String,
    pub kind: SignalKind,
    pub price: f64,
}

/// Crossover test over the adjacent indicator rows i-1 and i.
///
/// Any undefined input makes the whole condition false.
pub fn crossover_at(
    cols: &IndicatorColumns,
    i: usize,
    params: &StrategyParams,
) -> Option<SignalKind> {
    let (prev_fast, prev_slow) = (cols.sma_fast[i - 1]?, cols.sma_slow[i - 1]?);
    let (fast, slow) = (cols.sma_fast[i]?, cols.sma_slow[i]?);

    if cols.vol_confirm[i] != Some(true) {
        return None;
    }
    if !cols.ma_diff_pct[i].is_some_and(|d| d > params.ma_diff_threshold) {
        return None;
    }

    if prev_fast < prev_slow && fast >= slow {
        cols.rsi[i]
            .is_some_and(|r| r < params.rsi_buy_max)
            .then_some(SignalKind::Buy)
    } else if prev_fast > prev_slow && fast <= slow {
        cols.rsi[i]
            .is_some_and(|r| r > params.rsi_sell_min)
            .then_some(SignalKind::Sell)
    } else {
        None
    }
}

/// Forward scan of one series; emits at most one event per row.
pub fn scan_signals(
    series: &TickerSeries,
    cols: &IndicatorColumns,
    params: &StrategyParams,
) -> Vec<SignalEvent> {
    (1..series.len())
        .filter_map(|i| {
            crossover_at(cols, i, params).map(|kind| SignalEvent {
                date: series.points[i].date,
                ticker: series.ticker.clone(),
                kind,
                price: series.points[i].close,
            })
        })
        .collect()
}

/// Merge per-ticker event streams into one globally ordered stream.
///
/// Same-date ties break by ticker so replays are deterministic.
pub fn merge_events(streams: Vec<Vec<SignalEvent>>) -> Vec<SignalEvent> {
    let mut events: Vec<SignalEvent> = streams.into_iter().flatten().collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.ticker.cmp(&b.ticker)));
    events
}
