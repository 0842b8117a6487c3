use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {required} observations required, {available} available")]
    NotEnoughData { required: usize, available: usize },

    #[error("Analytics received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Error in calculation: {0}")]
    Calculation(#[from] CoreError),
}
