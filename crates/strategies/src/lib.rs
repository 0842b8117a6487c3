//! # Strategy Library
//!
//! The signal side of the backtest: turning a price panel into return spreads and
//! a spread into a discrete position signal.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   configuration loading, or reporting. It depends only on `core-types`.
//! - **Pure Stages:** every operation takes its input by reference and returns a new
//!   series; nothing is cached on the calculator or model between calls.
//!
//! ## Public API
//!
//! - `SpreadCalculator`, `InstrumentReturns`, `Spreads`: the return/spread stage.
//! - `SignalModel`: the trait the backtester drives.
//! - `ZScoreReversion`, `ZScoreParams`, `SignalFrame`: the rolling z-score rule.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod spread;
pub mod zscore_reversion;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use spread::{InstrumentReturns, SpreadCalculator, Spreads};
pub use zscore_reversion::{SignalFrame, ZScoreParams, ZScoreReversion};

use core_types::TimeSeries;

/// The core trait for models that map a spread series to position signals.
///
/// Implementations must only use observations dated at or before `t` when producing
/// the signal for `t`; the backtester relies on that to keep its one-period lag honest.
pub trait SignalModel: Send + Sync {
    /// A short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Evaluates the whole spread series in one pass.
    ///
    /// # Returns
    ///
    /// * `Ok(SignalFrame)` - z-scores and signals for every date with a full window.
    /// * `Err(StrategyError)` - if the spread is too short or malformed.
    fn generate(&self, spread: &TimeSeries<f64>) -> Result<SignalFrame, StrategyError>;
}
