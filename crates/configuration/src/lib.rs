use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{BacktestSettings, Config, ConfigOverrides, InstrumentSymbols};

/// Prefix for environment overrides, e.g. `CREDIT_REVERSION__BACKTEST__LOOKBACK_PERIOD=126`.
pub const ENV_PREFIX: &str = "CREDIT_REVERSION";

/// The file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Sources are layered in order: built-in defaults, the TOML file, then environment
/// variables. An explicitly given file must exist; the default `config.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    tracing::debug!(?config, "Configuration loaded.");

    Ok(config)
}
