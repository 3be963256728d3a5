//! Typed runtime settings assembled from the configuration port.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::domain::error::CrosstraderError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LEDGER_FILE: &str = "transactions.txt";

/// Where price files live and where the ledger is written.
#[derive(Debug, Clone)]
pub struct DataSettings {
    pub dir: PathBuf,
    pub ledger: PathBuf,
}

/// Knobs of the crossover rule and its indicator inputs.
///
/// `slow_window` defaults to 90 rows, the reference rule's slow leg as
/// observed in production use.
#[derive(Debug, Clone)]
pub struct StrategyParams {
    pub fast_window: usize,
    pub slow_window: usize,
    pub volume_window: usize,
    pub volume_multiplier: f64,
    pub rsi_window: usize,
    pub ma_diff_threshold: f64,
    pub rsi_buy_max: f64,
    pub rsi_sell_min: f64,
    /// Moving averages and volume confirmation start here; earlier rows
    /// never receive them.
    pub analysis_start: NaiveDate,
}

/// Portfolio simulation parameters.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub initial_cash: f64,
    pub commission_rate: f64,
    pub fixed_investment: f64,
    /// Earliest date on which a signal may execute as a trade.
    pub activation_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data: DataSettings,
    pub strategy: StrategyParams,
    pub simulation: SimulationSettings,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CrosstraderError> {
        let dir = config.get_string("data", "dir").ok_or_else(|| {
            CrosstraderError::ConfigMissing {
                section: "data".into(),
                key: "dir".into(),
            }
        })?;
        let ledger = config
            .get_string("data", "ledger")
            .unwrap_or_else(|| DEFAULT_LEDGER_FILE.to_string());

        let strategy = StrategyParams {
            fast_window: window(config, "strategy", "fast_window", 20)?,
            slow_window: window(config, "strategy", "slow_window", 90)?,
            volume_window: window(config, "strategy", "volume_window", 20)?,
            volume_multiplier: non_negative(config, "strategy", "volume_multiplier", 1.25)?,
            rsi_window: window(config, "strategy", "rsi_window", 14)?,
            ma_diff_threshold: non_negative(config, "strategy", "ma_diff_threshold", 0.5)?,
            rsi_buy_max: config.get_double("strategy", "rsi_buy_max", 80.0),
            rsi_sell_min: config.get_double("strategy", "rsi_sell_min", 20.0),
            analysis_start: date_or_default(config, "strategy", "analysis_start", "2018-01-01")?,
        };
        if strategy.rsi_sell_min >= strategy.rsi_buy_max {
            return Err(CrosstraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "rsi_sell_min".into(),
                reason: "must be below rsi_buy_max".into(),
            });
        }

        let simulation = SimulationSettings {
            initial_cash: non_negative(config, "simulation", "initial_cash", 10_000.0)?,
            commission_rate: non_negative(config, "simulation", "commission_rate", 0.0002)?,
            fixed_investment: non_negative(config, "simulation", "fixed_investment", 2_500.0)?,
            activation_date: required_date(config, "simulation", "activation_date")?,
        };

        Ok(Settings {
            data: DataSettings {
                dir: PathBuf::from(dir),
                ledger: PathBuf::from(ledger),
            },
            strategy,
            simulation,
        })
    }
}

fn window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<usize, CrosstraderError> {
    let value = config.get_int(section, key, default);
    if value < 1 {
        return Err(CrosstraderError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: "window must be at least 1".into(),
        });
    }
    Ok(value as usize)
}

fn non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, CrosstraderError> {
    let value = config.get_double(section, key, default);
    if value < 0.0 {
        return Err(CrosstraderError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: "must not be negative".into(),
        });
    }
    Ok(value)
}

fn required_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<NaiveDate, CrosstraderError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| CrosstraderError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })?;
    parse_config_date(section, key, &raw)
}

fn date_or_default(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: &str,
) -> Result<NaiveDate, CrosstraderError> {
    let raw = config
        .get_string(section, key)
        .unwrap_or_else(|| default.to_string());
    parse_config_date(section, key, &raw)
}

fn parse_config_date(section: &str, key: &str, raw: &str) -> Result<NaiveDate, CrosstraderError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CrosstraderError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })
}
