use anyhow::{Context, Result};
use backtester::Backtester;
use clap::{Parser, Subcommand};
use configuration::{Config, ConfigOverrides, load_config};
use core_types::PriceSeries;
use data_source::{CsvPriceSource, PriceSource};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod report;

/// The main entry point for the credit spread reversion backtester.
#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Run(args) => handle_run(args).await,
        Commands::ShowConfig(args) => handle_show_config(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests a mean-reversion strategy on the return spread between a Treasury
/// instrument and its credit peers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest over a CSV file of daily closing prices.
    Run(RunArgs),
    /// Print the fully resolved configuration.
    ShowConfig(ShowConfigArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// CSV file with a `date` column and one close-price column per symbol.
    #[arg(long)]
    prices: PathBuf,

    /// Path to a TOML configuration file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write report.json and the plotted series into.
    #[arg(long)]
    export: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(Parser)]
struct ShowConfigArgs {
    /// Path to a TOML configuration file (defaults to ./config.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn resolve_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = load_config(path).context("failed to load configuration")?;
    config.apply_overrides(overrides);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Handles the orchestration of a single backtest run.
async fn handle_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let instruments = config.instrument_set();
    let start = config.backtest.start_date;
    let end = config.resolved_end_date();

    tracing::info!(
        prices = %args.prices.display(),
        symbols = ?instruments.symbols(),
        %start,
        %end,
        "Loading price data."
    );

    let source = CsvPriceSource::new(&args.prices);
    let table = source
        .fetch_prices(&instruments.symbols(), start, end)
        .await
        .with_context(|| format!("failed to load prices from {}", args.prices.display()))?;
    let prices = PriceSeries::from_table(instruments, &table)?;

    let backtester = Backtester::from_config(&config)?;
    let outcome = backtester.run(&prices)?;

    println!("{}", report::summary_table(&outcome));

    if let Some(dir) = args.export.as_deref() {
        report::export(&outcome, dir)?;
        println!("Series exported to {}", dir.display());
    }

    Ok(())
}

fn handle_show_config(args: ShowConfigArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
