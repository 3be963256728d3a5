#![allow(dead_code)]

use chrono::NaiveDate;
use crosstrader::domain::error::CrosstraderError;
pub use crosstrader::domain::series::{PricePoint, TickerSeries};
use crosstrader::domain::settings::{DataSettings, Settings, SimulationSettings, StrategyParams};
use crosstrader::ports::data_port::DataPort;
use std::path::PathBuf;

pub struct MockDataPort {
    pub series: Vec<TickerSeries>,
    pub fail: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            fail: None,
        }
    }

    pub fn with_series(mut self, series: TickerSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            series: Vec::new(),
            fail: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn load_all(&self) -> Result<Vec<TickerSeries>, CrosstraderError> {
        if let Some(reason) = &self.fail {
            return Err(CrosstraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.series.clone())
    }

    fn list_tickers(&self) -> Result<Vec<String>, CrosstraderError> {
        let mut tickers: Vec<String> = self.series.iter().map(|s| s.ticker.clone()).collect();
        tickers.sort();
        Ok(tickers)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_series(ticker: &str, start: &str, closes: &[f64], volumes: &[f64]) -> TickerSeries {
    let start = date(start);
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
    TickerSeries::new(ticker.to_string(), points)
}

/// Short windows so signals fire on small fixtures.
pub fn test_settings(activation: &str) -> Settings {
    Settings {
        data: DataSettings {
            dir: PathBuf::from("unused"),
            ledger: PathBuf::from("unused.txt"),
        },
        strategy: StrategyParams {
            fast_window: 2,
            slow_window: 3,
            volume_window: 2,
            volume_multiplier: 1.25,
            rsi_window: 2,
            ma_diff_threshold: 0.5,
            rsi_buy_max: 80.0,
            rsi_sell_min: 20.0,
            analysis_start: date("2000-01-01"),
        },
        simulation: SimulationSettings {
            initial_cash: 10_000.0,
            commission_rate: 0.0002,
            fixed_investment: 2_500.0,
            activation_date: date(activation),
        },
    }
}

/// With `test_settings` windows: a confirmed buy fires on the fifth row and
/// a confirmed sell on the seventh.
pub const ROUND_TRIP_CLOSES: [f64; 7] = [10.0, 9.0, 8.0, 7.0, 9.5, 11.0, 7.6];
pub const ROUND_TRIP_VOLUMES: [f64; 7] = [100.0, 100.0, 100.0, 100.0, 300.0, 100.0, 300.0];
