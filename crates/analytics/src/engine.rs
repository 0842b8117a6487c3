use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use core_types::window;
use core_types::{Stat, TimeSeries, UndefinedReason};
use serde::{Deserialize, Serialize};

/// Annualization and hurdle-rate inputs for the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsParams {
    /// Periods per year; also the length of the rolling Sharpe window.
    pub annualization_factor: usize,
    pub risk_free_rate: f64,
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            annualization_factor: 252,
            risk_free_rate: 0.02,
        }
    }
}

/// A stateless calculator for deriving performance metrics from strategy returns.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalyticsParams) -> Result<Self, AnalyticsError> {
        if params.annualization_factor == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "annualization_factor must be at least 1".to_string(),
            ));
        }
        if !params.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameters(
                "risk_free_rate must be finite".to_string(),
            ));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalyticsParams {
        &self.params
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `returns` - Daily strategy returns, one per date.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport`, or `NotEnoughData` for an empty series.
    /// Zero denominators never fail; they surface as undefined `Stat`s.
    pub fn calculate(&self, returns: &TimeSeries<f64>) -> Result<PerformanceReport, AnalyticsError> {
        if returns.is_empty() {
            return Err(AnalyticsError::NotEnoughData {
                required: 1,
                available: 0,
            });
        }

        let factor = self.params.annualization_factor;
        let rf = self.params.risk_free_rate;
        let values = returns.values();

        let report = PerformanceReport {
            observations: values.len(),
            total_return: total_return(&values),
            annualized_return: annualized_return(&values, factor),
            annualized_volatility: annualized_volatility(&values, factor),
            max_drawdown: max_drawdown(&values),
            sharpe_ratio: sharpe_ratio(&values, factor, rf),
            sortino_ratio: sortino_ratio(&values, factor, rf),
            rolling_sharpe: rolling_sharpe(returns, factor),
            annualization_factor: factor,
            risk_free_rate: rf,
        };

        tracing::info!(
            observations = report.observations,
            annualized_return = report.annualized_return,
            sharpe = %report.sharpe_ratio,
            max_drawdown = report.max_drawdown,
            "Performance metrics calculated."
        );

        Ok(report)
    }
}

fn factor_f64(factor: usize) -> f64 {
    factor as f64
}

/// Compounded return: `prod(1 + r) - 1`.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |wealth, r| wealth * (1.0 + r)) - 1.0
}

/// `mean(returns) * factor`; zero for an empty slice.
pub fn annualized_return(returns: &[f64], factor: usize) -> f64 {
    window::mean(returns).map_or(0.0, |m| m * factor_f64(factor))
}

/// `sample_std(returns) * sqrt(factor)`.
pub fn annualized_volatility(returns: &[f64], factor: usize) -> Stat {
    match window::sample_std_dev(returns) {
        Some(std_dev) => Stat::Defined(std_dev * factor_f64(factor).sqrt()),
        None => Stat::Undefined(UndefinedReason::InsufficientHistory),
    }
}

/// `(annualized return - rf) / annualized volatility`.
pub fn sharpe_ratio(returns: &[f64], factor: usize, risk_free_rate: f64) -> Stat {
    let excess = annualized_return(returns, factor) - risk_free_rate;
    match annualized_volatility(returns, factor) {
        Stat::Defined(vol) => Stat::ratio(excess, vol),
        undefined => undefined,
    }
}

/// Downside deviation over the strictly negative returns only:
/// `sqrt(mean(r^2 for r < 0)) * sqrt(factor)`.
pub fn downside_deviation(returns: &[f64], factor: usize) -> Stat {
    let squares: Vec<f64> = returns.iter().filter(|r| **r < 0.0).map(|r| r * r).collect();
    match window::mean(&squares) {
        Some(mean_sq) => Stat::Defined(mean_sq.sqrt() * factor_f64(factor).sqrt()),
        None => Stat::Undefined(UndefinedReason::EmptyInput),
    }
}

/// `(annualized return - rf) / downside deviation`.
pub fn sortino_ratio(returns: &[f64], factor: usize, risk_free_rate: f64) -> Stat {
    let excess = annualized_return(returns, factor) - risk_free_rate;
    match downside_deviation(returns, factor) {
        Stat::Defined(dd) => Stat::ratio(excess, dd),
        undefined => undefined,
    }
}

/// Minimum of `W[t] / max(W[..=t]) - 1` over the wealth curve `W[t] = prod(1 + r)`.
///
/// The running peak starts at the first wealth point `W[0] = 1 + r[0]`, not at the
/// initial capital of 1, so the result is 0 exactly when the curve never falls after
/// its first point. A loss in the first period alone is not a drawdown: `[-0.5]` gives 0.
/// Backtested series always open with a flat position, so their first return is 0.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_values(returns).into_iter().fold(0.0, f64::min)
}

fn wealth_values(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

fn drawdown_values(returns: &[f64]) -> Vec<f64> {
    let wealth = wealth_values(returns);
    let mut peak = f64::NEG_INFINITY;
    wealth
        .into_iter()
        .map(|w| {
            peak = peak.max(w);
            w / peak - 1.0
        })
        .collect()
}

/// Annualized Sharpe over each trailing window of `factor` returns: `mean / std * sqrt(factor)`.
///
/// One entry per input date; undefined until the window fills or when its std is zero.
pub fn rolling_sharpe(returns: &TimeSeries<f64>, factor: usize) -> TimeSeries<Stat> {
    let values = returns.values();
    let stats = window::rolling(&values, factor);
    let scale = factor_f64(factor).sqrt();

    let mut stats = stats.into_iter();
    returns.map(|_| match stats.next().flatten() {
        Some(w) => match w.std_dev {
            Some(std_dev) => Stat::ratio(w.mean, std_dev).map(|s| s * scale),
            None => Stat::Undefined(UndefinedReason::InsufficientHistory),
        },
        None => Stat::Undefined(UndefinedReason::InsufficientHistory),
    })
}

/// Cumulative strategy return per date: `W[t] - 1`.
pub fn cumulative_returns(returns: &TimeSeries<f64>) -> TimeSeries<f64> {
    let mut wealth = wealth_values(&returns.values()).into_iter();
    returns.map(|_| wealth.next().map_or(0.0, |w| w - 1.0))
}

/// Drawdown from the running peak per date: `W[t] / M[t] - 1`.
pub fn drawdown_curve(returns: &TimeSeries<f64>) -> TimeSeries<f64> {
    let mut drawdowns = drawdown_values(&returns.values()).into_iter();
    returns.map(|_| drawdowns.next().unwrap_or(0.0))
}
