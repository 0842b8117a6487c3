use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to read price data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid price data on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Price data has no column for symbol '{0}'")]
    MissingSymbol(String),

    #[error("Invalid price request: {0}")]
    InvalidRequest(String),
}
