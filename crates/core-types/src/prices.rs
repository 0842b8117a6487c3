use crate::error::CoreError;
use crate::instrument::{InstrumentRole, InstrumentSet};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One date of the raw price table; `prices` follows the table's symbol order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTableRow {
    pub date: NaiveDate,
    pub prices: Vec<Option<Decimal>>,
}

/// Adjusted close prices exactly as the data collaborator hands them over:
/// one column per symbol, possibly with holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub symbols: Vec<String>,
    pub rows: Vec<PriceTableRow>,
}

impl PriceTable {
    pub fn new(symbols: Vec<String>, rows: Vec<PriceTableRow>) -> Self {
        Self { symbols, rows }
    }

    pub fn column_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

/// Prices of the three instruments on one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub primary: Decimal,
    pub high_yield: Decimal,
    pub investment_grade: Decimal,
}

impl PriceBar {
    pub fn price(&self, role: InstrumentRole) -> Decimal {
        match role {
            InstrumentRole::Primary => self.primary,
            InstrumentRole::PeerHighYield => self.high_yield,
            InstrumentRole::PeerInvestmentGrade => self.investment_grade,
        }
    }
}

/// The validated, aligned daily price panel.
///
/// Every bar has a strictly positive price for all three instruments and dates are
/// strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    instruments: InstrumentSet,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(instruments: InstrumentSet, bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        for pair in bars.windows(2) {
            check_order(pair[0].date, pair[1].date)?;
        }

        for bar in &bars {
            for instrument in instruments.iter() {
                let price = bar.price(instrument.role);
                if price <= Decimal::ZERO {
                    return Err(CoreError::InvalidInput(format!(
                        "price of {} on {} must be positive, got {}",
                        instrument.symbol, bar.date, price
                    )));
                }
            }
        }

        Ok(Self { instruments, bars })
    }

    /// Aligns a raw table to the configured instruments.
    ///
    /// Dates must already be strictly increasing across the whole table. Rows where
    /// any of the three instruments is missing are dropped.
    pub fn from_table(instruments: InstrumentSet, table: &PriceTable) -> Result<Self, CoreError> {
        let mut columns = [0usize; 3];
        for (slot, instrument) in columns.iter_mut().zip(instruments.iter()) {
            *slot = table.column_index(&instrument.symbol).ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "price table has no column for {} '{}'",
                    instrument.role, instrument.symbol
                ))
            })?;
        }

        for pair in table.rows.windows(2) {
            check_order(pair[0].date, pair[1].date)?;
        }

        let mut bars = Vec::with_capacity(table.rows.len());
        let mut dropped = 0usize;
        for row in &table.rows {
            if row.prices.len() != table.symbols.len() {
                return Err(CoreError::InvalidInput(format!(
                    "row {} has {} prices for {} symbols",
                    row.date,
                    row.prices.len(),
                    table.symbols.len()
                )));
            }

            match (row.prices[columns[0]], row.prices[columns[1]], row.prices[columns[2]]) {
                (Some(primary), Some(high_yield), Some(investment_grade)) => bars.push(PriceBar {
                    date: row.date,
                    primary,
                    high_yield,
                    investment_grade,
                }),
                _ => {
                    tracing::debug!(date = %row.date, "Dropping row with a missing price.");
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, kept = bars.len(), "Dropped price rows with missing values.");
        }

        Self::new(instruments, bars)
    }

    pub fn instruments(&self) -> &InstrumentSet {
        &self.instruments
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

fn check_order(previous: NaiveDate, next: NaiveDate) -> Result<(), CoreError> {
    if next == previous {
        Err(CoreError::InvalidInput(format!("duplicate price date {next}")))
    } else if next < previous {
        Err(CoreError::InvalidInput(format!(
            "price dates are not increasing: {previous} is followed by {next}"
        )))
    } else {
        Ok(())
    }
}
