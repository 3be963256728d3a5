//! Transaction ledger persistence port trait.

use crate::domain::error::CrosstraderError;
use crate::domain::performance::Performance;
use crate::domain::simulator::LedgerEntry;

/// Port for persisting one run's transaction ledger.
pub trait LedgerPort {
    /// Write the run's trades and closing summary, replacing any ledger
    /// left by a previous run.
    fn write(
        &self,
        entries: &[LedgerEntry],
        performance: &Performance,
    ) -> Result<(), CrosstraderError>;
}
