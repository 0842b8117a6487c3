use analytics::AnalyticsParams;
use approx::assert_abs_diff_eq;
use backtester::{BacktestEngine, BacktestParams, Backtester};
use chrono::{Days, NaiveDate};
use core_types::{InstrumentSet, PriceBar, PriceSeries, Signal, Stat, TimeSeries, UndefinedReason};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use strategies::{SignalModel, ZScoreParams, ZScoreReversion};

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 2).unwrap() + Days::new(i as u64)
}

fn params(lookback_period: usize) -> BacktestParams {
    BacktestParams {
        zscore: ZScoreParams {
            lookback_period,
            entry_threshold: 1.0,
        },
        analytics: AnalyticsParams::default(),
    }
}

fn panel_from(bars: Vec<PriceBar>) -> PriceSeries {
    PriceSeries::new(InstrumentSet::new("TLT", "HYG", "LQD"), bars).unwrap()
}

/// A deterministic panel whose spread wanders enough to trigger both signals.
fn wandering_panel(days: usize) -> PriceSeries {
    let mut primary = 100.0_f64;
    let mut high_yield = 80.0_f64;
    let mut investment_grade = 110.0_f64;
    let mut bars = Vec::with_capacity(days);
    for i in 0..days {
        if i > 0 {
            let t = i as f64;
            primary *= 1.0 + 0.004 * (t * 0.37).sin() + 0.001 * (t * 1.91).cos();
            high_yield *= 1.0 + 0.003 * (t * 0.11).sin() - 0.002 * (t * 2.3).sin();
            investment_grade *= 1.0 + 0.002 * (t * 0.53).cos();
        }
        bars.push(PriceBar {
            date: date(i),
            primary: Decimal::from_f64(primary).unwrap().round_dp(6),
            high_yield: Decimal::from_f64(high_yield).unwrap().round_dp(6),
            investment_grade: Decimal::from_f64(investment_grade).unwrap().round_dp(6),
        });
    }
    panel_from(bars)
}

#[test]
fn constant_spread_produces_a_flat_strategy() {
    // 300 days: primary compounds at +0.1%/day, both peers are flat.
    let mut price = dec!(100);
    let mut bars = Vec::with_capacity(300);
    for i in 0..300 {
        if i > 0 {
            price *= dec!(1.001);
        }
        bars.push(PriceBar {
            date: date(i),
            primary: price,
            high_yield: dec!(50),
            investment_grade: dec!(75),
        });
    }

    let outcome = Backtester::new(params(252)).unwrap().run(&panel_from(bars)).unwrap();

    for obs in &outcome.spreads.high_yield {
        assert_abs_diff_eq!(obs.value, 0.001, epsilon = 1e-9);
    }
    assert!(outcome
        .signal_frame
        .zscores
        .iter()
        .all(|p| p.value == Stat::Undefined(UndefinedReason::ZeroDenominator)));
    assert!(outcome.signal_frame.signals.iter().all(|p| p.value == Signal::Flat));
    assert!(outcome.strategy.returns.iter().all(|p| p.value == 0.0));

    let report = &outcome.report;
    assert_eq!(report.annualized_return, 0.0);
    assert_eq!(report.annualized_volatility, Stat::Defined(0.0));
    assert!(!report.sharpe_ratio.is_defined());
    assert!(!report.sortino_ratio.is_defined());
    assert_eq!(report.max_drawdown, 0.0);
}

#[test]
fn ramp_triggers_long_and_is_applied_the_next_day() {
    // Days 1..=252 have a zero spread; from day 253 the spread ramps up strictly.
    let values: Vec<f64> = (1..=300)
        .map(|day| if day <= 252 { 0.0 } else { 0.01 * (day - 252) as f64 })
        .collect();
    let spread = TimeSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (date(i), *v))
            .collect(),
    )
    .unwrap();
    let day = |n: usize| date(n - 1);

    let model = ZScoreReversion::new(ZScoreParams::default()).unwrap();
    let frame = model.generate(&spread).unwrap();

    assert_eq!(frame.signals.get(day(252)), Some(&Signal::Flat));
    assert!(frame.zscores.get(day(253)).unwrap().value().unwrap() > 1.0);
    assert_eq!(frame.signals.get(day(253)), Some(&Signal::Long));

    let strategy = BacktestEngine::new().run(&frame.signals, &spread).unwrap();
    assert_eq!(strategy.returns.get(day(253)), Some(&0.0));
    assert_eq!(strategy.returns.get(day(254)), spread.get(day(254)));
    assert_eq!(strategy.returns.get(day(254)), Some(&0.02));
}

#[test]
fn strategy_returns_follow_the_previous_signal() {
    let outcome = Backtester::new(params(60)).unwrap().run(&wandering_panel(400)).unwrap();
    let spread = &outcome.spreads.high_yield;
    let signals = &outcome.signal_frame.signals;

    assert_eq!(outcome.returns.primary.len(), 399);
    assert_eq!(outcome.strategy.returns.len(), spread.len() - 1);
    assert!(signals.iter().any(|p| p.value == Signal::Long));
    assert!(signals.iter().any(|p| p.value == Signal::Short));

    let dates: Vec<_> = spread.dates().collect();
    for pair in dates.windows(2) {
        let position = signals.get(pair[0]).copied().unwrap_or(Signal::Flat);
        let expected = position.exposure() * spread.get(pair[1]).unwrap();
        assert_eq!(outcome.strategy.returns.get(pair[1]), Some(&expected));
    }
}

#[test]
fn report_invariants_hold_on_a_realistic_panel() {
    let outcome = Backtester::new(params(60)).unwrap().run(&wandering_panel(400)).unwrap();
    let report = &outcome.report;

    assert!(report.max_drawdown <= 0.0);
    assert_eq!(report.observations, outcome.strategy.returns.len());
    assert_eq!(report.rolling_sharpe.len(), report.observations);
    assert!(report.sharpe_ratio.is_defined());

    let min_curve = outcome.drawdowns.iter().map(|p| p.value).fold(0.0, f64::min);
    assert_eq!(min_curve, report.max_drawdown);
    let last = outcome.cumulative_returns.last().unwrap().value;
    assert_abs_diff_eq!(last, report.total_return, epsilon = 1e-12);

    // The first defined rolling Sharpe sits at the 252nd strategy return.
    let first_defined = report
        .rolling_sharpe
        .iter()
        .position(|p| p.value.is_defined())
        .unwrap();
    assert_eq!(first_defined, 251);
}

#[test]
fn running_twice_is_identical() {
    let panel = wandering_panel(320);
    let backtester = Backtester::new(params(40)).unwrap();

    let first = backtester.run(&panel).unwrap();
    let second = backtester.run(&panel).unwrap();

    assert_eq!(first, second);
}

#[test]
fn short_panels_fail_with_insufficient_data() {
    let panel = wandering_panel(30);
    let err = Backtester::new(params(60)).unwrap().run(&panel).err().unwrap();
    assert!(err.to_string().contains("60 observations required"));

    let one_row = wandering_panel(1);
    assert!(Backtester::new(params(5)).unwrap().run(&one_row).is_err());
}
