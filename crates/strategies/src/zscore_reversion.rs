use crate::error::StrategyError;
use crate::SignalModel;
use core_types::window;
use core_types::{Signal, Stat, TimeSeries, UndefinedReason};
use serde::{Deserialize, Serialize};

/// Parameters for the rolling z-score rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreParams {
    pub lookback_period: usize,
    pub entry_threshold: f64,
}

impl Default for ZScoreParams {
    fn default() -> Self {
        Self {
            lookback_period: 252,
            entry_threshold: 1.0,
        }
    }
}

/// Z-scores and the signals derived from them.
///
/// Both series start at the first date whose trailing window is full; warm-up dates
/// are absent rather than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalFrame {
    pub zscores: TimeSeries<Stat>,
    pub signals: TimeSeries<Signal>,
}

/// Rolling z-score mean reversion on a spread.
///
/// At each date the spread is standardised against the mean and sample standard
/// deviation of the trailing `lookback_period` observations ending at that date.
/// A z-score strictly above the threshold goes long, strictly below its negation
/// goes short, anything else (including an undefined z-score) is flat.
#[derive(Debug, Clone)]
pub struct ZScoreReversion {
    params: ZScoreParams,
}

impl ZScoreReversion {
    pub fn new(params: ZScoreParams) -> Result<Self, StrategyError> {
        if params.lookback_period == 0 {
            return Err(StrategyError::InvalidParameters(
                "lookback_period cannot be zero".to_string(),
            ));
        }
        if !params.entry_threshold.is_finite() || params.entry_threshold <= 0.0 {
            return Err(StrategyError::InvalidParameters(format!(
                "entry_threshold must be a positive number, got {}",
                params.entry_threshold
            )));
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &ZScoreParams {
        &self.params
    }

    pub fn classify(&self, zscore: Stat) -> Signal {
        match zscore {
            Stat::Defined(z) if z > self.params.entry_threshold => Signal::Long,
            Stat::Defined(z) if z < -self.params.entry_threshold => Signal::Short,
            _ => Signal::Flat,
        }
    }
}

impl SignalModel for ZScoreReversion {
    fn name(&self) -> &str {
        "zscore_reversion"
    }

    fn generate(&self, spread: &TimeSeries<f64>) -> Result<SignalFrame, StrategyError> {
        let lookback = self.params.lookback_period;
        if spread.len() < lookback {
            return Err(StrategyError::InsufficientData {
                required: lookback,
                available: spread.len(),
            });
        }

        let values = spread.values();
        let rolling = window::rolling(&values, lookback);

        let mut zscores = Vec::with_capacity(spread.len() + 1 - lookback);
        let mut signals = Vec::with_capacity(spread.len() + 1 - lookback);
        for (obs, stats) in spread.iter().zip(rolling) {
            let Some(stats) = stats else { continue };

            let zscore = match stats.std_dev {
                Some(std_dev) => Stat::ratio(obs.value - stats.mean, std_dev),
                None => Stat::Undefined(UndefinedReason::InsufficientHistory),
            };
            zscores.push((obs.date, zscore));
            signals.push((obs.date, self.classify(zscore)));
        }

        let frame = SignalFrame {
            zscores: TimeSeries::new(zscores)?,
            signals: TimeSeries::new(signals)?,
        };

        let count = |s: Signal| frame.signals.iter().filter(|p| p.value == s).count();
        tracing::debug!(
            model = self.name(),
            lookback,
            long = count(Signal::Long),
            short = count(Signal::Short),
            flat = count(Signal::Flat),
            undefined = frame.zscores.iter().filter(|p| !p.value.is_defined()).count(),
            "Generated signals."
        );

        Ok(frame)
    }
}
