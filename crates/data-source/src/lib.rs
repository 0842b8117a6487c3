//! # Price Data Sources
//!
//! The seam between the backtest and wherever historical prices come from. The core
//! pipeline only ever sees the `PriceTable` a `PriceSource` returns.

use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PriceTable;

pub mod csv_source;
pub mod error;

// --- Public API ---
pub use csv_source::CsvPriceSource;
pub use error::DataSourceError;

/// The generic, abstract interface for a historical price provider.
///
/// Implementations return adjusted close prices for the requested symbols between
/// `start` and `end` inclusive, one column per symbol in request order. Non-trading
/// days are simply absent; individual missing prices are `None`.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataSourceError>;
}
