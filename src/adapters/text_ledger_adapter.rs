//! Plain-text transaction ledger adapter.
//!
//! One line per executed trade, then a blank line and the closing summary.
//! Each run replaces the previous ledger file outright.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::domain::error::CrosstraderError;
use crate::domain::performance::Performance;
use crate::domain::simulator::LedgerEntry;
use crate::ports::ledger_port::LedgerPort;

pub struct TextLedgerAdapter {
    path: PathBuf,
}

impl TextLedgerAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl LedgerPort for TextLedgerAdapter {
    fn write(
        &self,
        entries: &[LedgerEntry],
        performance: &Performance,
    ) -> Result<(), CrosstraderError> {
        let mut out = String::new();
        for entry in entries {
            let _ = writeln!(
                out,
                "{}: {} {}, Shares: {:.2}, Price: {:.2}, Cash left: {:.2}",
                entry.date, entry.action, entry.ticker, entry.shares, entry.price, entry.cash_after,
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Final portfolio value: ${:.2}",
            performance.final_value
        );
        let _ = writeln!(
            out,
            "Average annual return (CAGR): {:.2}%",
            performance.cagr * 100.0
        );

        fs::write(&self.path, out)?;
        Ok(())
    }
}
