use crate::error::BacktestError;
use analytics::{AnalyticsEngine, AnalyticsParams, PerformanceReport};
use configuration::Config;
use core_types::{InstrumentSet, PriceSeries, TimeSeries};
use serde::Serialize;
use strategies::{
    InstrumentReturns, SignalFrame, SignalModel, SpreadCalculator, Spreads, ZScoreParams,
    ZScoreReversion,
};

pub mod engine;
pub mod error;

pub use engine::{BacktestEngine, StrategyReturns};

/// Everything a run needs besides the prices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BacktestParams {
    pub zscore: ZScoreParams,
    pub analytics: AnalyticsParams,
}

impl BacktestParams {
    pub fn from_config(config: &Config) -> Self {
        let bt = &config.backtest;
        Self {
            zscore: ZScoreParams {
                lookback_period: bt.lookback_period,
                entry_threshold: bt.entry_threshold,
            },
            analytics: AnalyticsParams {
                annualization_factor: bt.annualization_factor,
                risk_free_rate: bt.risk_free_rate,
            },
        }
    }
}

/// Every intermediate series of a run plus the final report.
///
/// This is what the reporting and charting layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestOutcome {
    pub model: String,
    pub instruments: InstrumentSet,
    pub returns: InstrumentReturns,
    pub spreads: Spreads,
    pub signal_frame: SignalFrame,
    pub strategy: StrategyReturns,
    pub cumulative_returns: TimeSeries<f64>,
    pub drawdowns: TimeSeries<f64>,
    pub report: PerformanceReport,
}

/// The main backtesting pipeline.
///
/// Stages are chained as plain function calls; the backtester keeps no per-run state,
/// so running it twice on the same panel yields the same outcome.
pub struct Backtester {
    spread_calculator: SpreadCalculator,
    model: Box<dyn SignalModel>,
    engine: BacktestEngine,
    analytics_engine: AnalyticsEngine,
}

impl Backtester {
    /// Constructs a backtester driven by the rolling z-score rule.
    pub fn new(params: BacktestParams) -> Result<Self, BacktestError> {
        let model = ZScoreReversion::new(params.zscore)?;
        Self::with_model(Box::new(model), params.analytics)
    }

    /// Constructs a backtester around any signal model.
    pub fn with_model(
        model: Box<dyn SignalModel>,
        analytics: AnalyticsParams,
    ) -> Result<Self, BacktestError> {
        Ok(Self {
            spread_calculator: SpreadCalculator::new(),
            model,
            engine: BacktestEngine::new(),
            analytics_engine: AnalyticsEngine::new(analytics)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BacktestError> {
        Self::new(BacktestParams::from_config(config))
    }

    /// Runs the full pipeline over a price panel.
    pub fn run(&self, prices: &PriceSeries) -> Result<BacktestOutcome, BacktestError> {
        tracing::info!(
            model = self.model.name(),
            rows = prices.len(),
            first = ?prices.first_date(),
            last = ?prices.last_date(),
            "Starting backtest."
        );

        // 1. Returns and spreads
        let (returns, spreads) = self.spread_calculator.calculate(prices)?;

        // 2. Signals from the high-yield spread
        let signal_frame = self.model.generate(&spreads.high_yield)?;

        // 3. Lagged application
        let strategy = self.engine.run(&signal_frame.signals, &spreads.high_yield)?;

        // 4. Metrics and curves
        let report = self.analytics_engine.calculate(&strategy.returns)?;
        let cumulative_returns = analytics::cumulative_returns(&strategy.returns);
        let drawdowns = analytics::drawdown_curve(&strategy.returns);

        tracing::info!(
            periods = strategy.returns.len(),
            total_return = report.total_return,
            "Backtest complete."
        );

        Ok(BacktestOutcome {
            model: self.model.name().to_string(),
            instruments: prices.instruments().clone(),
            returns,
            spreads,
            signal_frame,
            strategy,
            cumulative_returns,
            drawdowns,
            report,
        })
    }
}
