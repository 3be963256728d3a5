//! Recent-signal window reporting.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::signal::{SignalEvent, SignalKind};

/// Signals observed on one business day, tickers in stream order.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySignals {
    pub date: NaiveDate,
    pub buys: Vec<String>,
    pub sells: Vec<String>,
}

/// The `count` most recent Mon-Fri days ending at `latest`, oldest first.
/// A weekend `latest` rolls back to the preceding Friday. No holiday
/// calendar is applied; a date a market was closed simply reports no
/// signals.
pub fn business_day_window(latest: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut day = latest;
    while is_weekend(day) {
        day = day - Duration::days(1);
    }

    let mut days = Vec::with_capacity(count);
    while days.len() < count {
        days.push(day);
        day = day - Duration::days(1);
        while is_weekend(day) {
            day = day - Duration::days(1);
        }
    }
    days.reverse();
    days
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Bucket the merged event stream onto the window ending at `latest`.
pub fn recent_signals(
    events: &[SignalEvent],
    latest: NaiveDate,
    count: usize,
) -> Vec<DailySignals> {
    business_day_window(latest, count)
        .into_iter()
        .map(|date| {
            let pick = |kind: SignalKind| -> Vec<String> {
                events
                    .iter()
                    .filter(|e| e.date == date && e.kind == kind)
                    .map(|e| e.ticker.clone())
                    .collect()
            };
            DailySignals {
                date,
                buys: pick(SignalKind::Buy),
                sells: pick(SignalKind::Sell),
            }
        })
        .collect()
}
