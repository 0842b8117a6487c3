//! # Performance Analytics
//!
//! Reduces a strategy return series to risk-adjusted statistics. It acts as the
//! "unbiased judge" of the backtest.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds only its parameters. It
//!   takes a return series and produces a `PerformanceReport`.
//! - **No Silent NaN:** every ratio whose denominator can vanish is a `Stat`, so an
//!   undefined Sharpe is reported as such instead of flowing on as NaN or infinity.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `AnalyticsParams`: the calculator and its inputs.
//! - `PerformanceReport`: the scalar metrics plus the rolling Sharpe series.
//! - `cumulative_returns`, `drawdown_curve`: per-date curves for charting.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalyticsEngine, AnalyticsParams, cumulative_returns, drawdown_curve};
pub use error::AnalyticsError;
pub use report::PerformanceReport;
