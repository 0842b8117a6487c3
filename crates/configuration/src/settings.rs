use chrono::{Local, NaiveDate};
use core_types::InstrumentSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backtest: BacktestSettings,
    pub instruments: InstrumentSymbols,
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// First date of the price panel requested from the data source.
    pub start_date: NaiveDate,
    /// Last date of the price panel. Defaults to today when omitted.
    pub end_date: Option<NaiveDate>,
    /// Number of trailing spread observations in the z-score window.
    pub lookback_period: usize,
    /// Absolute z-score that must be strictly exceeded to take a position.
    pub entry_threshold: f64,
    /// Annual risk-free rate subtracted in the Sharpe and Sortino ratios.
    pub risk_free_rate: f64,
    /// Trading periods per year; also the rolling Sharpe window.
    pub annualization_factor: usize,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            end_date: None,
            lookback_period: 252,
            entry_threshold: 1.0,
            risk_free_rate: 0.02,
            annualization_factor: 252,
        }
    }
}

/// Symbols for the three instrument roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentSymbols {
    pub primary: String,
    pub high_yield: String,
    pub investment_grade: String,
}

impl Default for InstrumentSymbols {
    fn default() -> Self {
        Self {
            primary: "TLT".to_string(),
            high_yield: "HYG".to_string(),
            investment_grade: "LQD".to_string(),
        }
    }
}

/// Command-line overrides layered on top of the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Override the backtest start date (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    pub start_date: Option<NaiveDate>,

    /// Override the backtest end date (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    pub end_date: Option<NaiveDate>,

    /// Override the z-score lookback window.
    #[cfg_attr(feature = "clap", arg(long))]
    pub lookback_period: Option<usize>,

    /// Override the z-score entry threshold.
    #[cfg_attr(feature = "clap", arg(long))]
    pub entry_threshold: Option<f64>,

    /// Override the annual risk-free rate (e.g. 0.02 for 2%).
    #[cfg_attr(feature = "clap", arg(long))]
    pub risk_free_rate: Option<f64>,
}

impl Config {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let bt = &mut self.backtest;
        if let Some(start) = overrides.start_date {
            bt.start_date = start;
        }
        if let Some(end) = overrides.end_date {
            bt.end_date = Some(end);
        }
        if let Some(lookback) = overrides.lookback_period {
            bt.lookback_period = lookback;
        }
        if let Some(threshold) = overrides.entry_threshold {
            bt.entry_threshold = threshold;
        }
        if let Some(rate) = overrides.risk_free_rate {
            bt.risk_free_rate = rate;
        }
    }

    pub fn instrument_set(&self) -> InstrumentSet {
        InstrumentSet::new(
            self.instruments.primary.clone(),
            self.instruments.high_yield.clone(),
            self.instruments.investment_grade.clone(),
        )
    }

    /// The configured end date, or today's local date when none was given.
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.backtest
            .end_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bt = &self.backtest;

        if bt.lookback_period == 0 {
            return Err(ConfigError::ValidationError(
                "lookback_period must be at least 1".to_string(),
            ));
        }
        if bt.annualization_factor == 0 {
            return Err(ConfigError::ValidationError(
                "annualization_factor must be at least 1".to_string(),
            ));
        }
        if !bt.entry_threshold.is_finite() || bt.entry_threshold <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "entry_threshold must be a positive number, got {}",
                bt.entry_threshold
            )));
        }
        if !bt.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "risk_free_rate must be finite".to_string(),
            ));
        }

        let end = self.resolved_end_date();
        if bt.start_date > end {
            return Err(ConfigError::ValidationError(format!(
                "start_date {} is after end_date {}",
                bt.start_date, end
            )));
        }

        let symbols = [
            &self.instruments.primary,
            &self.instruments.high_yield,
            &self.instruments.investment_grade,
        ];
        if symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "instrument symbols cannot be empty".to_string(),
            ));
        }
        if symbols[0] == symbols[1] || symbols[0] == symbols[2] || symbols[1] == symbols[2] {
            return Err(ConfigError::ValidationError(
                "instrument symbols must be distinct".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.backtest.lookback_period, 252);
        assert_eq!(config.backtest.annualization_factor, 252);
        assert_eq!(config.backtest.risk_free_rate, 0.02);
        assert_eq!(
            config.backtest.start_date,
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides {
            lookback_period: Some(60),
            risk_free_rate: Some(0.0),
            ..Default::default()
        });

        assert_eq!(config.backtest.lookback_period, 60);
        assert_eq!(config.backtest.risk_free_rate, 0.0);
        assert_eq!(config.backtest.entry_threshold, 1.0);
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut config = Config::default();
        config.backtest.lookback_period = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.backtest.start_date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        config.backtest.end_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.instruments.high_yield = config.instruments.primary.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.backtest.entry_threshold = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
