//! # Core Types
//!
//! Layer 0 of the workspace: the plain data structures every other crate speaks.
//! Nothing in here performs I/O.
//!
//! - `Instrument` / `InstrumentSet`: the three symbols of a run and their roles.
//! - `PriceTable` / `PriceSeries`: raw collaborator output and the validated panel.
//! - `TimeSeries<T>`: strictly date-ordered observations, the currency between stages.
//! - `Signal`: the discrete -1/0/+1 position.
//! - `Stat`: a statistic that is either defined or undefined for a stated reason.
//! - `window`: mean and sample standard deviation helpers shared by the z-score and
//!   rolling Sharpe computations.

pub mod error;
pub mod instrument;
pub mod prices;
pub mod series;
pub mod signal;
pub mod stat;
pub mod window;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use instrument::{Instrument, InstrumentRole, InstrumentSet};
pub use prices::{PriceBar, PriceSeries, PriceTable, PriceTableRow};
pub use series::{Observation, TimeSeries};
pub use signal::Signal;
pub use stat::{Stat, UndefinedReason};
