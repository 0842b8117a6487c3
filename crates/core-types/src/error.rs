use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {required} observations required, {available} available")]
    InsufficientData { required: usize, available: usize },
}
