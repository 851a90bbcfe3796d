use analytics::{AnalysisReport, AnalyticsEngine};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use core_types::{LookbackPeriod, Portfolio, PricePoint, PriceSeries, WeightVector};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Vantage analysis application.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = handle_analyze(args) {
                eprintln!("Error during analysis: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Portfolio performance and risk analytics against a benchmark index.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a portfolio against a benchmark from local price history files.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Directory containing one `<SYMBOL>.csv` price file per symbol
    /// (columns: date, close).
    #[arg(long)]
    data_dir: PathBuf,

    /// A portfolio asset symbol. Repeat for each asset.
    #[arg(long = "asset", required = true)]
    assets: Vec<String>,

    /// An asset weight as `SYMBOL=FRACTION` (e.g. "AAPL=0.6"). Repeat for
    /// each asset, or omit entirely for an equal-weighted portfolio.
    #[arg(long = "weight")]
    weights: Vec<String>,

    /// The benchmark symbol to compare against (e.g. "SPY").
    #[arg(long)]
    benchmark: String,

    /// The lookback period the data covers (1mo, 3mo, 6mo, 1y, 2y, 5y).
    #[arg(long, default_value = "1y")]
    period: LookbackPeriod,

    /// A display name for the portfolio.
    #[arg(long, default_value = "Portfolio")]
    name: String,

    /// Overrides the configured annualized risk-free rate.
    #[arg(long)]
    risk_free_rate: Option<f64>,

    /// Overrides the configured rolling window length.
    #[arg(long)]
    rolling_window: Option<usize>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one analysis run: load settings and prices,
/// run the engine, render the report.
fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut settings = configuration::load_config()
        .context("failed to load config.toml")?
        .analysis;
    if let Some(rate) = args.risk_free_rate {
        settings.risk_free_rate = rate;
    }
    if let Some(window) = args.rolling_window {
        settings.rolling_window = window;
    }

    let portfolio = Portfolio::new(
        &args.name,
        args.assets.clone(),
        parse_weights(&args.weights)?,
    );

    let mut asset_prices = BTreeMap::new();
    for symbol in &args.assets {
        let series = load_price_series(&args.data_dir, symbol)
            .with_context(|| format!("failed to load prices for '{symbol}'"))?;
        tracing::debug!(symbol = %symbol, points = series.len(), "loaded price series");
        asset_prices.insert(symbol.clone(), series);
    }
    let benchmark_prices = load_price_series(&args.data_dir, &args.benchmark)
        .with_context(|| format!("failed to load prices for '{}'", args.benchmark))?;

    let report = AnalyticsEngine::new().analyze(
        &portfolio,
        &asset_prices,
        &benchmark_prices,
        args.period,
        &settings,
    )?;

    print_report(&report);
    Ok(())
}

/// Parses `SYMBOL=FRACTION` pairs into a weight vector. No pairs at all
/// means equal-weight.
fn parse_weights(pairs: &[String]) -> anyhow::Result<WeightVector> {
    if pairs.is_empty() {
        return Ok(WeightVector::equal_weight());
    }
    let mut weights = BTreeMap::new();
    for pair in pairs {
        let Some((symbol, fraction)) = pair.split_once('=') else {
            bail!("weight '{pair}' is not in SYMBOL=FRACTION form");
        };
        let fraction: f64 = fraction
            .parse()
            .with_context(|| format!("weight fraction in '{pair}' is not a number"))?;
        weights.insert(symbol.trim().to_string(), fraction);
    }
    Ok(WeightVector::from_weights(weights))
}

/// One row of a price history file.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    date: NaiveDate,
    close: Decimal,
}

/// Loads `<data_dir>/<symbol>.csv` into a price series. Rows must be in
/// ascending date order with positive closes; this loader plays the role of
/// the validated external data feed.
fn load_price_series(data_dir: &Path, symbol: &str) -> anyhow::Result<PriceSeries> {
    let path = data_dir.join(format!("{symbol}.csv"));
    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let mut points = Vec::new();
    let mut previous: Option<NaiveDate> = None;
    for record in reader.deserialize() {
        let record: PriceRecord = record.context("malformed price row")?;
        if record.close <= Decimal::ZERO {
            bail!("non-positive close {} on {}", record.close, record.date);
        }
        if previous.is_some_and(|p| p >= record.date) {
            bail!("dates must be strictly ascending, violated at {}", record.date);
        }
        previous = Some(record.date);
        points.push(PricePoint {
            timestamp: record
                .date
                .and_hms_opt(0, 0, 0)
                .context("invalid date")?
                .and_utc(),
            price: record.close,
        });
    }

    if points.is_empty() {
        bail!("{} contains no price rows", path.display());
    }
    Ok(PriceSeries::new(symbol, points))
}

// ==============================================================================
// Report Rendering
// ==============================================================================

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn num(value: f64) -> String {
    format!("{value:.4}")
}

fn print_report(report: &AnalysisReport) {
    println!(
        "\n{} vs {} | {} | {} to {} | {} observations",
        report.portfolio_name,
        report.benchmark_name,
        report.parameters.period,
        report.start_date.format("%Y-%m-%d"),
        report.end_date.format("%Y-%m-%d"),
        report.data_points,
    );

    let mut comparison = Table::new();
    comparison.load_preset(UTF8_FULL).set_header(vec![
        "Metric",
        &report.portfolio_name,
        &report.benchmark_name,
    ]);
    comparison
        .add_row(vec![
            "Total Return".to_string(),
            pct(report.portfolio_total_return),
            pct(report.benchmark_total_return),
        ])
        .add_row(vec![
            "Annualized Return".to_string(),
            pct(report.portfolio_annualized_return),
            pct(report.benchmark_annualized_return),
        ])
        .add_row(vec![
            "Volatility".to_string(),
            pct(report.portfolio_volatility),
            pct(report.benchmark_volatility),
        ])
        .add_row(vec![
            "Sharpe Ratio".to_string(),
            num(report.portfolio_sharpe_ratio),
            num(report.benchmark_sharpe_ratio),
        ]);
    println!("{comparison}");

    let mut relative = Table::new();
    relative
        .load_preset(UTF8_FULL)
        .set_header(vec!["Benchmark-Relative Metric", "Value"]);
    relative
        .add_row(vec!["Excess Return".to_string(), pct(report.excess_return)])
        .add_row(vec!["Alpha".to_string(), pct(report.alpha)])
        .add_row(vec!["Beta".to_string(), num(report.beta)])
        .add_row(vec!["Correlation".to_string(), num(report.correlation)])
        .add_row(vec!["R-Squared".to_string(), num(report.r_squared)])
        .add_row(vec![
            "Tracking Error".to_string(),
            pct(report.tracking_error),
        ])
        .add_row(vec![
            "Information Ratio".to_string(),
            num(report.information_ratio),
        ])
        .add_row(vec![
            "Max Drawdown".to_string(),
            pct(report.max_drawdown),
        ])
        .add_row(vec!["Calmar Ratio".to_string(), num(report.calmar_ratio)])
        .add_row(vec!["Up Capture".to_string(), num(report.up_capture)])
        .add_row(vec!["Down Capture".to_string(), num(report.down_capture)]);
    for var in &report.value_at_risk {
        relative.add_row(vec![
            format!("VaR ({:.0}%)", var.confidence * 100.0),
            pct(var.value),
        ]);
    }
    println!("{relative}");

    println!(
        "Parameters: risk-free rate {}, {} periods/year, rolling window {}",
        pct(report.parameters.risk_free_rate),
        report.parameters.periods_per_year,
        report.parameters.rolling_window,
    );
}
