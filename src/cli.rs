//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::stooq_adapter::StooqAdapter;
use crate::adapters::text_ledger_adapter::TextLedgerAdapter;
use crate::domain::error::CrosstraderError;
use crate::domain::indicators;
use crate::domain::performance::Performance;
use crate::domain::report::{DailySignals, recent_signals};
use crate::domain::series::TickerSeries;
use crate::domain::settings::Settings;
use crate::domain::signal;
use crate::domain::simulator::{LedgerEntry, run_simulation};
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;

/// Business days covered by the recent-signal breakdown.
pub const RECENT_WINDOW_DAYS: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "crosstrader",
    about = "Moving-average crossover scanner and portfolio simulator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for signals, simulate the portfolio and write the ledger
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured price data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Override the configured ledger file
        #[arg(long)]
        ledger: Option<PathBuf>,
    },
    /// List tickers found in the data directory
    ListTickers {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range held for each ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Parse and validate the configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            data_dir,
            ledger,
        } => run_full(&config, data_dir, ledger),
        Command::ListTickers { config } => run_list_tickers(&config),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_settings(path: &PathBuf) -> Result<Settings, CrosstraderError> {
    let adapter =
        FileConfigAdapter::from_file(path).map_err(|e| CrosstraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Settings::from_config(&adapter)
}

/// Everything one run produces besides the ledger file itself.
#[derive(Debug)]
pub struct PipelineOutput {
    pub ticker_count: usize,
    pub signal_count: usize,
    pub ledger: Vec<LedgerEntry>,
    pub performance: Performance,
    pub recent: Vec<DailySignals>,
}

/// Full pipeline: load series, compute indicators, scan and merge signals,
/// simulate the portfolio, evaluate performance.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    settings: &Settings,
) -> Result<PipelineOutput, CrosstraderError> {
    let series_list = data_port.load_all()?;

    let mut streams = Vec::with_capacity(series_list.len());
    for series in &series_list {
        let cols = indicators::compute(series, &settings.strategy);
        streams.push(signal::scan_signals(series, &cols, &settings.strategy));
    }
    let events = signal::merge_events(streams);

    let market: HashMap<String, TickerSeries> = series_list
        .into_iter()
        .map(|s| (s.ticker.clone(), s))
        .collect();

    let result = run_simulation(&events, &market, &settings.simulation);
    let performance = Performance::evaluate(&result.portfolio, &market, &settings.simulation);

    let latest = market.values().filter_map(|s| s.last_date()).max();
    let recent = latest
        .map(|date| recent_signals(&events, date, RECENT_WINDOW_DAYS))
        .unwrap_or_default();

    Ok(PipelineOutput {
        ticker_count: market.len(),
        signal_count: events.len(),
        ledger: result.ledger,
        performance,
        recent,
    })
}

fn run_full(
    config_path: &PathBuf,
    data_dir: Option<PathBuf>,
    ledger: Option<PathBuf>,
) -> ExitCode {
    let mut settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(dir) = data_dir {
        settings.data.dir = dir;
    }
    if let Some(path) = ledger {
        settings.data.ledger = path;
    }

    eprintln!("Loading price data from {}", settings.data.dir.display());
    let data_port = StooqAdapter::new(settings.data.dir.clone());

    let output = match run_pipeline(&data_port, &settings) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let ledger_port = TextLedgerAdapter::new(settings.data.ledger.clone());
    if let Err(e) = ledger_port.write(&output.ledger, &output.performance) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Ledger written to {}", settings.data.ledger.display());

    print_report(&output, &settings);
    ExitCode::SUCCESS
}

fn print_report(output: &PipelineOutput, settings: &Settings) {
    println!("Detected signals: {}", output.signal_count);
    println!(
        "Initial portfolio value: ${:.2}",
        output.performance.initial_cash
    );
    println!(
        "Final portfolio value: ${:.2}",
        output.performance.final_value
    );
    println!(
        "Investment horizon (from {}): {:.2} years",
        settings.simulation.activation_date, output.performance.years
    );
    println!(
        "Average annual return (CAGR): {:.2}%",
        output.performance.cagr * 100.0
    );

    if output.ticker_count == 0 {
        println!();
        println!("No usable price data available.");
        return;
    }

    for day in &output.recent {
        println!();
        println!("Date: {}", day.date);
        println!("BUY signals: {}", join_or_none(&day.buys));
        println!("SELL signals: {}", join_or_none(&day.sells));
    }
}

fn join_or_none(tickers: &[String]) -> String {
    if tickers.is_empty() {
        "none".to_string()
    } else {
        tickers.join(", ")
    }
}

fn run_list_tickers(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = StooqAdapter::new(settings.data.dir.clone());
    match data_port.list_tickers() {
        Ok(tickers) => {
            for ticker in tickers {
                println!("{ticker}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(config_path: &PathBuf, ticker: Option<&str>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = StooqAdapter::new(settings.data.dir.clone());
    let series_list = match data_port.load_all() {
        Ok(list) => list,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut shown = 0;
    for series in &series_list {
        if ticker.is_some_and(|t| !t.eq_ignore_ascii_case(&series.ticker)) {
            continue;
        }
        match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => {
                println!("{}: {} to {} ({} rows)", series.ticker, first, last, series.len());
            }
            _ => println!("{}: no rows", series.ticker),
        }
        shown += 1;
    }

    if shown == 0 {
        let e = CrosstraderError::NoData;
        eprintln!("error: {e}");
        return (&e).into();
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_settings(config_path) {
        Ok(settings) => {
            println!("configuration OK");
            println!("  data dir:        {}", settings.data.dir.display());
            println!("  ledger:          {}", settings.data.ledger.display());
            println!(
                "  windows:         fast {} / slow {} / volume {} / rsi {}",
                settings.strategy.fast_window,
                settings.strategy.slow_window,
                settings.strategy.volume_window,
                settings.strategy.rsi_window
            );
            println!(
                "  activation date: {}",
                settings.simulation.activation_date
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
