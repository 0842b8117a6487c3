use crate::error::StrategyError;
use core_types::{InstrumentRole, PriceSeries, TimeSeries};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Simple one-period returns for each instrument, aligned on the same dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentReturns {
    pub primary: TimeSeries<f64>,
    pub high_yield: TimeSeries<f64>,
    pub investment_grade: TimeSeries<f64>,
}

impl InstrumentReturns {
    pub fn for_role(&self, role: InstrumentRole) -> &TimeSeries<f64> {
        match role {
            InstrumentRole::Primary => &self.primary,
            InstrumentRole::PeerHighYield => &self.high_yield,
            InstrumentRole::PeerInvestmentGrade => &self.investment_grade,
        }
    }
}

/// Return spreads of the primary instrument over each peer.
///
/// Only the high-yield spread drives signals; the investment-grade spread is carried
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spreads {
    pub high_yield: TimeSeries<f64>,
    pub investment_grade: TimeSeries<f64>,
}

/// Derives instrument returns and spreads from a price panel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadCalculator;

impl SpreadCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(
        &self,
        prices: &PriceSeries,
    ) -> Result<(InstrumentReturns, Spreads), StrategyError> {
        let returns = compute_returns(prices)?;
        let spreads = compute_spreads(&returns)?;
        tracing::debug!(
            observations = spreads.high_yield.len(),
            "Computed return spreads."
        );
        Ok((returns, spreads))
    }
}

/// `price[t] / price[t-1] - 1` per instrument; the first date has no return.
pub fn compute_returns(prices: &PriceSeries) -> Result<InstrumentReturns, StrategyError> {
    if prices.len() < 2 {
        return Err(StrategyError::InsufficientData {
            required: 2,
            available: prices.len(),
        });
    }

    let returns_for = |role: InstrumentRole| -> Result<TimeSeries<f64>, StrategyError> {
        let points = prices
            .bars()
            .windows(2)
            .map(|w| {
                let previous = to_f64(w[0].price(role))?;
                let current = to_f64(w[1].price(role))?;
                Ok((w[1].date, current / previous - 1.0))
            })
            .collect::<Result<Vec<_>, StrategyError>>()?;
        Ok(TimeSeries::new(points)?)
    };

    Ok(InstrumentReturns {
        primary: returns_for(InstrumentRole::Primary)?,
        high_yield: returns_for(InstrumentRole::PeerHighYield)?,
        investment_grade: returns_for(InstrumentRole::PeerInvestmentGrade)?,
    })
}

/// `return_primary[t] - return_peer[t]` for both peers.
pub fn compute_spreads(returns: &InstrumentReturns) -> Result<Spreads, StrategyError> {
    Ok(Spreads {
        high_yield: difference(&returns.primary, &returns.high_yield)?,
        investment_grade: difference(&returns.primary, &returns.investment_grade)?,
    })
}

fn difference(
    left: &TimeSeries<f64>,
    right: &TimeSeries<f64>,
) -> Result<TimeSeries<f64>, StrategyError> {
    if left.len() != right.len() {
        return Err(StrategyError::InvalidInput(format!(
            "cannot difference series of lengths {} and {}",
            left.len(),
            right.len()
        )));
    }

    let points = left
        .iter()
        .zip(right.iter())
        .map(|(l, r)| {
            if l.date != r.date {
                return Err(StrategyError::InvalidInput(format!(
                    "return dates are misaligned: {} vs {}",
                    l.date, r.date
                )));
            }
            Ok((l.date, l.value - r.value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimeSeries::new(points)?)
}

fn to_f64(price: rust_decimal::Decimal) -> Result<f64, StrategyError> {
    price
        .to_f64()
        .ok_or_else(|| StrategyError::InvalidInput(format!("price {price} is not representable")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use core_types::{InstrumentSet, PriceBar};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn panel(rows: &[(Decimal, Decimal, Decimal)]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(primary, high_yield, investment_grade))| PriceBar {
                date: start + chrono::Days::new(i as u64),
                primary,
                high_yield,
                investment_grade,
            })
            .collect();
        PriceSeries::new(InstrumentSet::new("TLT", "HYG", "LQD"), bars).unwrap()
    }

    #[test]
    fn returns_have_one_fewer_point_and_exact_values() {
        let prices = panel(&[
            (dec!(100), dec!(50), dec!(200)),
            (dec!(101), dec!(49.5), dec!(202)),
            (dec!(99.99), dec!(50.49), dec!(201)),
        ]);

        let returns = compute_returns(&prices).unwrap();

        assert_eq!(returns.primary.len(), prices.len() - 1);
        assert_eq!(returns.primary.first().unwrap().date, prices.bars()[1].date);
        let primary = returns.primary.values();
        assert_abs_diff_eq!(primary[0], 101.0 / 100.0 - 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(primary[1], 99.99 / 101.0 - 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(returns.high_yield.values()[0], -0.01, epsilon = 1e-9);
    }

    #[test]
    fn spreads_subtract_peer_from_primary() {
        let prices = panel(&[
            (dec!(100), dec!(50), dec!(200)),
            (dec!(102), dec!(50.5), dec!(200)),
        ]);

        let (_, spreads) = SpreadCalculator::new().calculate(&prices).unwrap();

        assert_abs_diff_eq!(spreads.high_yield.values()[0], 0.02 - 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(spreads.investment_grade.values()[0], 0.02, epsilon = 1e-12);
    }

    #[test]
    fn single_row_panel_is_insufficient() {
        let prices = panel(&[(dec!(100), dec!(50), dec!(200))]);
        assert!(matches!(
            compute_returns(&prices),
            Err(StrategyError::InsufficientData {
                required: 2,
                available: 1
            })
        ));
    }
}
