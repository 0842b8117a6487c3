use serde::{Deserialize, Serialize};
use std::fmt;

/// The part an instrument plays in the spread construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentRole {
    Primary,
    PeerHighYield,
    PeerInvestmentGrade,
}

impl fmt::Display for InstrumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstrumentRole::Primary => "primary",
            InstrumentRole::PeerHighYield => "high-yield peer",
            InstrumentRole::PeerInvestmentGrade => "investment-grade peer",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub role: InstrumentRole,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, role: InstrumentRole) -> Self {
        Self {
            symbol: symbol.into(),
            role,
        }
    }
}

/// The fixed trio of instruments for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSet {
    pub primary: Instrument,
    pub high_yield: Instrument,
    pub investment_grade: Instrument,
}

impl InstrumentSet {
    pub fn new(
        primary: impl Into<String>,
        high_yield: impl Into<String>,
        investment_grade: impl Into<String>,
    ) -> Self {
        Self {
            primary: Instrument::new(primary, InstrumentRole::Primary),
            high_yield: Instrument::new(high_yield, InstrumentRole::PeerHighYield),
            investment_grade: Instrument::new(investment_grade, InstrumentRole::PeerInvestmentGrade),
        }
    }

    /// Instruments in primary, high-yield, investment-grade order.
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        [&self.primary, &self.high_yield, &self.investment_grade].into_iter()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.iter().map(|i| i.symbol.clone()).collect()
    }
}
