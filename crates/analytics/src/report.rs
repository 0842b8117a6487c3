use core_types::{Stat, TimeSeries};
use serde::Serialize;

/// A standardized summary of a strategy return series.
///
/// This struct is the final output of the `AnalyticsEngine` and is what the
/// reporting layer renders. Ratios are `Stat`s because their denominators can be zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    // I. Returns
    pub observations: usize,
    /// Compounded return over the whole series.
    pub total_return: f64,
    /// Mean daily return times the annualization factor.
    pub annualized_return: f64,

    // II. Risk and Drawdown
    /// Sample standard deviation times sqrt(factor); undefined below two observations.
    pub annualized_volatility: Stat,
    /// Deepest peak-to-trough decline of the wealth curve, as a non-positive fraction.
    /// The first peak is the wealth after the first period, not the initial capital.
    pub max_drawdown: f64,

    // III. Risk-Adjusted Ratios
    pub sharpe_ratio: Stat,
    pub sortino_ratio: Stat,

    // IV. Rolling Metrics
    pub rolling_sharpe: TimeSeries<Stat>,

    // V. Inputs the figures were computed with
    pub annualization_factor: usize,
    pub risk_free_rate: f64,
}
