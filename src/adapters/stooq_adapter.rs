//! Stooq-format price file adapter — the series normalizer.
//!
//! Reads one text export per ticker from a data directory. Two layouts are
//! accepted: a bracketed header line (`<TICKER>,<PER>,<DATE>,...`) resolved
//! by column name, or no header with the columns in the fixed stooq order.
//! Dates are `%Y%m%d`; rows whose date or numeric fields fail to parse are
//! dropped silently.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::CrosstraderError;
use crate::domain::series::{PricePoint, TickerSeries};
use crate::ports::data_port::DataPort;

pub struct StooqAdapter {
    base_path: PathBuf,
}

struct ColumnMap {
    ticker: Option<usize>,
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnMap {
    fn from_names(names: &[String]) -> Option<Self> {
        let find = |name: &str| names.iter().position(|n| n == name);
        Some(ColumnMap {
            ticker: find("TICKER"),
            date: find("DATE")?,
            open: find("OPEN")?,
            high: find("HIGH")?,
            low: find("LOW")?,
            close: find("CLOSE")?,
            volume: find("VOL")?,
        })
    }

    /// Headerless layout: TICKER, PER, DATE, TIME, OPEN, HIGH, LOW, CLOSE,
    /// VOL, OPENINT.
    fn positional() -> Self {
        ColumnMap {
            ticker: Some(0),
            date: 2,
            open: 4,
            high: 5,
            low: 6,
            close: 7,
            volume: 8,
        }
    }
}

impl StooqAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn data_files(&self) -> Result<Vec<PathBuf>, CrosstraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrosstraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CrosstraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            let is_data_file = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("csv")
                });
            if is_data_file {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn load_file(&self, path: &Path) -> Result<TickerSeries, CrosstraderError> {
        let content = fs::read_to_string(path).map_err(|e| CrosstraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let fallback = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        parse_series(&content, &fallback)
    }
}

impl DataPort for StooqAdapter {
    fn load_all(&self) -> Result<Vec<TickerSeries>, CrosstraderError> {
        let mut series_list = Vec::new();
        for path in self.data_files()? {
            match self.load_file(&path) {
                Ok(series) if series.is_empty() => {
                    eprintln!("warning: skipping {} (no parsable rows)", path.display());
                }
                Ok(series) => series_list.push(series),
                Err(e) => eprintln!("warning: skipping {} ({})", path.display(), e),
            }
        }
        Ok(series_list)
    }

    fn list_tickers(&self) -> Result<Vec<String>, CrosstraderError> {
        let mut tickers: Vec<String> =
            self.load_all()?.into_iter().map(|s| s.ticker).collect();
        tickers.sort();
        Ok(tickers)
    }
}

fn parse_series(content: &str, fallback_ticker: &str) -> Result<TickerSeries, CrosstraderError> {
    let first_line = content.lines().next().unwrap_or("");
    let has_header = first_line.contains('<') && first_line.contains('>');

    let columns = if has_header {
        let names: Vec<String> = first_line
            .split(',')
            .map(|field| {
                field
                    .trim()
                    .trim_matches(|c| c == '<' || c == '>')
                    .trim()
                    .to_uppercase()
            })
            .collect();
        ColumnMap::from_names(&names).ok_or_else(|| CrosstraderError::Data {
            reason: "header is missing required columns".into(),
        })?
    } else {
        ColumnMap::positional()
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut points = Vec::new();
    let mut ticker: Option<String> = None;

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => continue,
        };
        let Some(point) = parse_row(&record, &columns) else {
            continue;
        };
        if ticker.is_none() {
            ticker = columns
                .ticker
                .and_then(|idx| record.get(idx))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
        }
        points.push(point);
    }

    let ticker = ticker.unwrap_or_else(|| fallback_ticker.to_string());
    Ok(TickerSeries::new(ticker, points))
}

fn parse_row(record: &csv::StringRecord, cols: &ColumnMap) -> Option<PricePoint> {
    let date = NaiveDate::parse_from_str(record.get(cols.date)?.trim(), "%Y%m%d").ok()?;
    let field = |idx: usize| -> Option<f64> { record.get(idx)?.trim().parse().ok() };

    Some(PricePoint {
        date,
        open: field(cols.open)?,
        high: field(cols.high)?,
        low: field(cols.low)?,
        close: field(cols.close)?,
        volume: field(cols.volume)?,
    })
}
