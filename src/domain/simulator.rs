//! Portfolio simulation over the ordered signal stream.
//!
//! The simulator is strictly sequential: its outcome is a function of event
//! order, so it must run after the per-ticker streams are merged.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::series::TickerSeries;
use crate::domain::settings::SimulationSettings;
use crate::domain::signal::{SignalEvent, SignalKind};

/// An open long holding. At most one per ticker, never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    pub shares: f64,
}

/// Cash and open positions. Mutated only by the simulation step functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub positions: HashMap<String, Position>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            cash: initial_cash,
            positions: HashMap::new(),
        }
    }

    pub fn has_position(&self, ticker: &str) -> bool {
        self.positions.contains_key(ticker)
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.insert(position.ticker.clone(), position);
    }

    pub fn remove_position(&mut self, ticker: &str) -> Option<Position> {
        self.positions.remove(ticker)
    }
}

/// One executed trade, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub action: SignalKind,
    pub ticker: String,
    pub shares: f64,
    pub price: f64,
    pub cash_after: f64,
}

/// Portfolio value snapshot, one per processed event.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub total_value: f64,
}

#[derive(Debug)]
pub struct SimulationResult {
    pub portfolio: Portfolio,
    pub ledger: Vec<LedgerEntry>,
    pub valuations: Vec<ValuationPoint>,
}

/// Cash plus open positions marked at their last close on or before `date`.
pub fn mark_to_market(
    portfolio: &Portfolio,
    date: NaiveDate,
    market: &HashMap<String, TickerSeries>,
) -> f64 {
    let held: f64 = portfolio
        .positions
        .values()
        .filter_map(|pos| {
            market
                .get(&pos.ticker)
                .and_then(|series| series.close_at_or_before(date))
                .map(|close| pos.shares * close)
        })
        .sum();
    portfolio.cash + held
}

/// Attempt a buy: fixed notional with the commission charged on top.
///
/// No-op (returns `None`) when the ticker is already held or cash cannot
/// cover notional plus commission; the cash check runs before any mutation
/// so cash never goes negative.
pub fn execute_buy(
    portfolio: &mut Portfolio,
    event: &SignalEvent,
    settings: &SimulationSettings,
) -> Option<LedgerEntry> {
    let commission = settings.fixed_investment * settings.commission_rate;
    if portfolio.has_position(&event.ticker)
        || portfolio.cash < settings.fixed_investment + commission
    {
        return None;
    }

    let shares = (settings.fixed_investment - commission) / event.price;
    portfolio.cash -= settings.fixed_investment + commission;
    portfolio.add_position(Position {
        ticker: event.ticker.clone(),
        shares,
    });

    Some(LedgerEntry {
        date: event.date,
        action: SignalKind::Buy,
        ticker: event.ticker.clone(),
        shares,
        price: event.price,
        cash_after: portfolio.cash,
    })
}

/// Attempt a sell: close the whole position, commission off the proceeds.
/// No-op when no position is open for the ticker.
pub fn execute_sell(
    portfolio: &mut Portfolio,
    event: &SignalEvent,
    settings: &SimulationSettings,
) -> Option<LedgerEntry> {
    let position = portfolio.remove_position(&event.ticker)?;

    let proceeds = position.shares * event.price;
    let commission = proceeds * settings.commission_rate;
    portfolio.cash += proceeds - commission;

    Some(LedgerEntry {
        date: event.date,
        action: SignalKind::Sell,
        ticker: event.ticker.clone(),
        shares: position.shares,
        price: event.price,
        cash_after: portfolio.cash,
    })
}

/// Step the portfolio through the merged event stream in order.
///
/// Every event records a valuation; only events on or after the activation
/// date may trade.
pub fn run_simulation(
    events: &[SignalEvent],
    market: &HashMap<String, TickerSeries>,
    settings: &SimulationSettings,
) -> SimulationResult {
    let mut portfolio = Portfolio::new(settings.initial_cash);
    let mut ledger = Vec::new();
    let mut valuations = Vec::with_capacity(events.len());

    for event in events {
        valuations.push(ValuationPoint {
            date: event.date,
            total_value: mark_to_market(&portfolio, event.date, market),
        });

        if event.date < settings.activation_date {
            continue;
        }

        let entry = match event.kind {
            SignalKind::Buy => execute_buy(&mut portfolio, event, settings),
            SignalKind::Sell => execute_sell(&mut portfolio, event, settings),
        };
        ledger.extend(entry);
    }

    SimulationResult {
        portfolio,
        ledger,
        valuations,
    }
}
