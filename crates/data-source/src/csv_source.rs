use crate::error::DataSourceError;
use crate::PriceSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{PriceTable, PriceTableRow};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const MISSING_MARKERS: [&str; 4] = ["nan", "null", "na", "n/a"];

/// Reads a wide price file: a `date` column followed by one column per symbol.
///
/// ```text
/// date,TLT,HYG,LQD
/// 2015-01-02,129.95,90.02,122.23
/// 2015-01-05,131.50,,122.70
/// ```
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_prices(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataSourceError> {
        if start > end {
            return Err(DataSourceError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }

        let bytes = tokio::fs::read(&self.path).await?;
        let table = parse_price_csv(&bytes, symbols, start, end)?;

        tracing::info!(
            path = %self.path.display(),
            rows = table.rows.len(),
            "Loaded price table."
        );
        Ok(table)
    }
}

/// Parses CSV bytes into a table restricted to `symbols` and `[start, end]`.
pub fn parse_price_csv(
    bytes: &[u8],
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, DataSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    match headers.get(0) {
        Some(h) if h.eq_ignore_ascii_case("date") => {}
        _ => {
            return Err(DataSourceError::Parse {
                line: 1,
                message: "first column must be 'date'".to_string(),
            });
        }
    }

    let columns = symbols
        .iter()
        .map(|symbol| {
            headers
                .iter()
                .skip(1)
                .position(|h| h == symbol)
                .map(|idx| idx + 1)
                .ok_or_else(|| DataSourceError::MissingSymbol(symbol.clone()))
        })
        .collect::<Result<Vec<usize>, DataSourceError>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
            DataSourceError::Parse {
                line,
                message: format!("invalid date '{raw_date}': {e}"),
            }
        })?;
        if date < start || date > end {
            continue;
        }

        let prices = columns
            .iter()
            .map(|&col| parse_price(record.get(col).unwrap_or_default(), line))
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(PriceTableRow { date, prices });
    }

    Ok(PriceTable::new(symbols.to_vec(), rows))
}

fn parse_price(raw: &str, line: u64) -> Result<Option<Decimal>, DataSourceError> {
    if raw.is_empty() || MISSING_MARKERS.iter().any(|m| raw.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(Some)
        .map_err(|e| DataSourceError::Parse {
            line,
            message: format!("invalid price '{raw}': {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = "\
date,HYG,TLT,LQD,SPY
2015-01-02,90.02,129.95,122.23,205.43
2015-01-05,89.80,NaN,122.70,201.72
2015-01-06,89.61,133.22,,199.82
2015-01-07,89.90,132.86,123.30,202.31
";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 1, d).unwrap()
    }

    fn symbols() -> Vec<String> {
        vec!["TLT".into(), "HYG".into(), "LQD".into()]
    }

    #[test]
    fn selects_requested_columns_in_request_order() {
        let table = parse_price_csv(SAMPLE.as_bytes(), &symbols(), day(1), day(31)).unwrap();

        assert_eq!(table.symbols, symbols());
        assert_eq!(table.rows.len(), 4);
        assert_eq!(
            table.rows[0].prices,
            vec![Some(dec!(129.95)), Some(dec!(90.02)), Some(dec!(122.23))]
        );
        assert_eq!(table.rows[1].prices[0], None);
        assert_eq!(table.rows[2].prices[2], None);
    }

    #[test]
    fn filters_to_the_requested_range() {
        let table = parse_price_csv(SAMPLE.as_bytes(), &symbols(), day(5), day(6)).unwrap();
        let dates: Vec<_> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(5), day(6)]);
    }

    #[test]
    fn missing_symbol_and_bad_values_are_reported() {
        let missing = parse_price_csv(SAMPLE.as_bytes(), &["IEF".to_string()], day(1), day(31));
        assert!(matches!(missing, Err(DataSourceError::MissingSymbol(s)) if s == "IEF"));

        let garbage = "date,TLT\n2015-01-02,abc\n";
        let bad_price = parse_price_csv(garbage.as_bytes(), &["TLT".to_string()], day(1), day(31));
        assert!(matches!(bad_price, Err(DataSourceError::Parse { line: 2, .. })));

        let bad_date = "date,TLT\n02/01/2015,1.0\n";
        let bad_date = parse_price_csv(bad_date.as_bytes(), &["TLT".to_string()], day(1), day(31));
        assert!(matches!(bad_date, Err(DataSourceError::Parse { .. })));
    }

    #[tokio::test]
    async fn reads_prices_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvPriceSource::new(file.path());
        let table = source.fetch_prices(&symbols(), day(1), day(31)).await.unwrap();
        assert_eq!(table.rows.len(), 4);

        let reversed = source.fetch_prices(&symbols(), day(31), day(1)).await;
        assert!(matches!(reversed, Err(DataSourceError::InvalidRequest(_))));
    }
}
