use anyhow::{Context, Result};
use backtester::BacktestOutcome;
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use core_types::Stat;
use serde::Serialize;
use std::fs;
use std::path::Path;

// ==============================================================================
// Terminal Report
// ==============================================================================

/// Builds the summary table printed after a run.
pub fn summary_table(outcome: &BacktestOutcome) -> Table {
    let report = &outcome.report;
    let instruments = &outcome.instruments;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    let first = outcome.strategy.returns.first().map(|o| o.date);
    let last = outcome.strategy.returns.last().map(|o| o.date);

    let rows: Vec<(&str, String)> = vec![
        ("Model", outcome.model.clone()),
        (
            "Instruments",
            format!(
                "{} vs {} / {}",
                instruments.primary.symbol,
                instruments.high_yield.symbol,
                instruments.investment_grade.symbol
            ),
        ),
        ("Period", format_period(first, last)),
        ("Observations", report.observations.to_string()),
        ("Total Return", percent(report.total_return)),
        ("Annualized Return", percent(report.annualized_return)),
        ("Annualized Volatility", percent_stat(&report.annualized_volatility)),
        ("Max Drawdown", percent(report.max_drawdown)),
        ("Sharpe Ratio", format!("{:.2}", report.sharpe_ratio)),
        ("Sortino Ratio", format!("{:.2}", report.sortino_ratio)),
        ("Risk-Free Rate", percent(report.risk_free_rate)),
    ];

    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    table
}

fn format_period(first: Option<NaiveDate>, last: Option<NaiveDate>) -> String {
    match (first, last) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "-".to_string(),
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn percent_stat(stat: &Stat) -> String {
    match stat.value() {
        Some(value) => percent(value),
        None => stat.to_string(),
    }
}

// ==============================================================================
// File Export
// ==============================================================================

#[derive(Serialize)]
struct CumulativeRow {
    date: NaiveDate,
    strategy_return: f64,
    cumulative_return: f64,
    drawdown: f64,
}

#[derive(Serialize)]
struct SpreadSignalRow {
    date: NaiveDate,
    spread: f64,
    zscore: Option<f64>,
    signal: Option<i8>,
}

#[derive(Serialize)]
struct RollingSharpeRow {
    date: NaiveDate,
    rolling_sharpe: Option<f64>,
}

/// Writes the report and the plotted series into `dir`, creating it if needed.
pub fn export(outcome: &BacktestOutcome, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let json = serde_json::to_string_pretty(&outcome.report)?;
    fs::write(dir.join("report.json"), json).context("failed to write report.json")?;

    let mut writer = csv::Writer::from_path(dir.join("cumulative_returns.csv"))?;
    let curves = outcome
        .strategy
        .returns
        .iter()
        .zip(outcome.cumulative_returns.iter())
        .zip(outcome.drawdowns.iter());
    for ((r, cumulative), drawdown) in curves {
        writer.serialize(CumulativeRow {
            date: r.date,
            strategy_return: r.value,
            cumulative_return: cumulative.value,
            drawdown: drawdown.value,
        })?;
    }
    writer.flush()?;

    let frame = &outcome.signal_frame;
    let mut writer = csv::Writer::from_path(dir.join("spread_signals.csv"))?;
    for obs in &outcome.spreads.high_yield {
        writer.serialize(SpreadSignalRow {
            date: obs.date,
            spread: obs.value,
            zscore: frame.zscores.get(obs.date).and_then(Stat::value),
            signal: frame.signals.get(obs.date).map(|s| s.value()),
        })?;
    }
    writer.flush()?;

    let mut writer = csv::Writer::from_path(dir.join("rolling_sharpe.csv"))?;
    for obs in &outcome.report.rolling_sharpe {
        writer.serialize(RollingSharpeRow {
            date: obs.date,
            rolling_sharpe: obs.value.value(),
        })?;
    }
    writer.flush()?;

    tracing::info!(dir = %dir.display(), "Exported report and series.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsParams;
    use backtester::{BacktestParams, Backtester};
    use chrono::Days;
    use core_types::{InstrumentSet, PriceBar, PriceSeries, UndefinedReason};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use strategies::ZScoreParams;

    fn outcome() -> BacktestOutcome {
        let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let wiggle = [dec!(0), dec!(0.8), dec!(-0.5), dec!(1.2), dec!(-1.1), dec!(0.3)];
        let bars = (0..40)
            .map(|i| PriceBar {
                date: start + Days::new(i as u64),
                primary: dec!(100) + Decimal::from(i) * dec!(0.1) + wiggle[i % 6],
                high_yield: dec!(80) + wiggle[(i + 2) % 6],
                investment_grade: dec!(110),
            })
            .collect();
        let prices = PriceSeries::new(InstrumentSet::new("TLT", "HYG", "LQD"), bars).unwrap();

        let params = BacktestParams {
            zscore: ZScoreParams {
                lookback_period: 10,
                entry_threshold: 1.0,
            },
            analytics: AnalyticsParams {
                annualization_factor: 12,
                risk_free_rate: 0.0,
            },
        };
        Backtester::new(params).unwrap().run(&prices).unwrap()
    }

    #[test]
    fn formats_percentages_and_undefined_stats() {
        assert_eq!(percent(0.12345), "12.35%");
        assert_eq!(percent(-0.5), "-50.00%");
        assert_eq!(percent_stat(&Stat::Defined(0.1)), "10.00%");
        assert_eq!(
            percent_stat(&Stat::Undefined(UndefinedReason::InsufficientHistory)),
            "undefined"
        );
    }

    #[test]
    fn summary_lists_every_metric() {
        let rendered = summary_table(&outcome()).to_string();
        for metric in ["Total Return", "Annualized Volatility", "Max Drawdown", "Sharpe Ratio", "Sortino Ratio"] {
            assert!(rendered.contains(metric), "missing {metric}");
        }
        assert!(rendered.contains("TLT vs HYG / LQD"));
    }

    #[test]
    fn export_writes_report_and_series() {
        let outcome = outcome();
        let dir = tempfile::tempdir().unwrap();
        export(&outcome, dir.path()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(json["observations"], outcome.report.observations);

        let spreads = fs::read_to_string(dir.path().join("spread_signals.csv")).unwrap();
        let mut lines = spreads.lines();
        assert_eq!(lines.next(), Some("date,spread,zscore,signal"));
        // One row per spread date; warm-up rows leave z-score and signal blank.
        assert_eq!(lines.clone().count(), outcome.spreads.high_yield.len());
        assert!(lines.next().unwrap().ends_with(",,"));

        let cumulative = fs::read_to_string(dir.path().join("cumulative_returns.csv")).unwrap();
        assert_eq!(cumulative.lines().count(), outcome.strategy.returns.len() + 1);

        let rolling = fs::read_to_string(dir.path().join("rolling_sharpe.csv")).unwrap();
        assert!(rolling.starts_with("date,rolling_sharpe"));
    }
}
