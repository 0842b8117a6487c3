use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitudes at or below this are treated as zero when used as a denominator.
///
/// The tolerance is absolute, not relative to the inputs. It assumes return-scale
/// values (daily returns and spreads around 1e-4 to 1e-1): a series that really varies
/// at the 1e-13 scale will also read as zero dispersion. Simple returns derived from
/// decimal prices carry representation noise around 1e-17, so an exact `== 0.0` test
/// would let a constant series divide by noise.
pub const ZERO_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// The trailing window has not filled yet.
    InsufficientHistory,
    /// The denominator (a standard deviation) is zero.
    ZeroDenominator,
    /// The input set the statistic is computed over is empty.
    EmptyInput,
}

impl fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UndefinedReason::InsufficientHistory => "insufficient history",
            UndefinedReason::ZeroDenominator => "zero denominator",
            UndefinedReason::EmptyInput => "empty input",
        };
        f.write_str(label)
    }
}

/// A statistic that is either a finite number or explicitly undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Stat {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl Stat {
    /// `numerator / denominator`, undefined when the denominator is effectively zero.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator.abs() <= ZERO_TOLERANCE || !denominator.is_finite() {
            Stat::Undefined(UndefinedReason::ZeroDenominator)
        } else {
            Stat::Defined(numerator / denominator)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Stat::Defined(v) => Some(*v),
            Stat::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Stat::Defined(_))
    }

    /// Applies `f` to a defined value; undefined values pass through unchanged.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Stat::Defined(v) => Stat::Defined(f(v)),
            undefined => undefined,
        }
    }
}

impl From<Option<f64>> for Stat {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Stat::Undefined(UndefinedReason::EmptyInput), Stat::Defined)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Stat::Undefined(_) => f.write_str("undefined"),
        }
    }
}
