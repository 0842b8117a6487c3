use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Invalid backtest input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data for backtest: {required} observations required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}

impl From<CoreError> for BacktestError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidInput(msg) => BacktestError::InvalidInput(msg),
            CoreError::InsufficientData {
                required,
                available,
            } => BacktestError::InsufficientData {
                required,
                available,
            },
        }
    }
}
