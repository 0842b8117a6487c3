use crate::error::BacktestError;
use core_types::{Signal, TimeSeries};
use serde::Serialize;

/// Positions held and returns realised by the strategy, one entry per spread date
/// after the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReturns {
    /// The position held over each date: the signal stamped on the previous date.
    pub positions: TimeSeries<Signal>,
    pub returns: TimeSeries<f64>,
}

/// Applies signals to spread returns with a one-period lag.
///
/// The position earning the spread return on date `t` is the signal dated at the
/// spread date immediately before `t`. A signal is never applied to the return of
/// its own date. Previous dates without a signal (the z-score warm-up) hold a flat
/// position, so the output keeps every date of the spread axis except the first.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktestEngine;

impl BacktestEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn run(
        &self,
        signals: &TimeSeries<Signal>,
        spread: &TimeSeries<f64>,
    ) -> Result<StrategyReturns, BacktestError> {
        if spread.len() < 2 {
            return Err(BacktestError::InsufficientData {
                required: 2,
                available: spread.len(),
            });
        }

        if let Some(stray) = signals.dates().find(|d| !spread.contains_date(*d)) {
            return Err(BacktestError::InvalidInput(format!(
                "signal dated {stray} has no matching spread observation"
            )));
        }

        let mut positions = Vec::with_capacity(spread.len() - 1);
        let mut returns = Vec::with_capacity(spread.len() - 1);
        for (previous, current) in spread.iter().zip(spread.iter().skip(1)) {
            let position = signals.get(previous.date).copied().unwrap_or(Signal::Flat);
            positions.push((current.date, position));
            returns.push((current.date, position.exposure() * current.value));
        }

        let result = StrategyReturns {
            positions: TimeSeries::new(positions)?,
            returns: TimeSeries::new(returns)?,
        };

        tracing::debug!(
            periods = result.returns.len(),
            invested = result.positions.iter().filter(|p| p.value != Signal::Flat).count(),
            "Applied lagged signals to spread returns."
        );

        Ok(result)
    }
}
