//! Daily price series representation.

use chrono::NaiveDate;

/// One daily OHLCV observation. Immutable after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Date-ordered price history for a single ticker.
///
/// Dates are strictly increasing; duplicate dates keep the first row seen.
#[derive(Debug, Clone)]
pub struct TickerSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl TickerSeries {
    pub fn new(ticker: String, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { ticker, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Close of the most recent observation dated at or before `date`.
    pub fn close_at_or_before(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.points.partition_point(|p| p.date <= date);
        if idx == 0 {
            None
        } else {
            Some(self.points[idx - 1].close)
        }
    }

    /// Index of the first observation dated at or after `date`.
    pub fn index_at_or_after(&self, date: NaiveDate) -> usize {
        self.points.partition_point(|p| p.date < date)
    }
}
