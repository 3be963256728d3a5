//! Final valuation and annualized return.

use std::collections::HashMap;

use crate::domain::series::TickerSeries;
use crate::domain::settings::SimulationSettings;
use crate::domain::simulator::Portfolio;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub initial_cash: f64,
    pub final_value: f64,
    pub years: f64,
    pub cagr: f64,
}

/// Compound annual growth rate; zero when the horizon is not positive.
pub fn annualized_return(initial: f64, final_value: f64, years: f64) -> f64 {
    if years > 0.0 {
        (final_value / initial).powf(1.0 / years) - 1.0
    } else {
        0.0
    }
}

impl Performance {
    /// Marks open positions at the last close of each ticker's full history.
    /// The horizon runs from the activation date to the latest date in any
    /// loaded series, traded or not.
    pub fn evaluate(
        portfolio: &Portfolio,
        market: &HashMap<String, TickerSeries>,
        settings: &SimulationSettings,
    ) -> Self {
        let held: f64 = portfolio
            .positions
            .values()
            .filter_map(|pos| {
                market
                    .get(&pos.ticker)
                    .and_then(|series| series.last_close())
                    .map(|close| pos.shares * close)
            })
            .sum();
        let final_value = portfolio.cash + held;

        let last_date = market.values().filter_map(|s| s.last_date()).max();
        let years = last_date.map_or(0.0, |d| {
            (d - settings.activation_date).num_days() as f64 / DAYS_PER_YEAR
        });
        let cagr = annualized_return(settings.initial_cash, final_value, years);

        Performance {
            initial_cash: settings.initial_cash,
            final_value,
            years,
            cagr,
        }
    }
}
