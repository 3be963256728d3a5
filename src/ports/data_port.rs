//! Price data access port trait.

use crate::domain::error::CrosstraderError;
use crate::domain::series::TickerSeries;

pub trait DataPort {
    /// Load every ticker series the source can provide. Individual broken
    /// sources are skipped with a warning rather than failing the load.
    fn load_all(&self) -> Result<Vec<TickerSeries>, CrosstraderError>;

    /// Tickers the source can provide, sorted.
    fn list_tickers(&self) -> Result<Vec<String>, CrosstraderError>;
}
