use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Insufficient data: {required} observations required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for StrategyError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidInput(msg) => StrategyError::InvalidInput(msg),
            CoreError::InsufficientData {
                required,
                available,
            } => StrategyError::InsufficientData {
                required,
                available,
            },
        }
    }
}
