use crate::error::AnalyticsError;
use crate::report::{AnalysisParameters, AnalysisReport, RollingMetrics, VarEstimate};
use crate::{performance, returns, risk, rolling};
use chrono::Utc;
use configuration::AnalysisSettings;
use core_types::{LookbackPeriod, Portfolio, PriceSeries, ReturnSeries};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A stateless orchestrator for the analytics pipeline.
///
/// The pipeline order is fixed because later metrics depend on earlier ones
/// (alpha needs beta, Sharpe needs volatility, Calmar needs the drawdown).
/// Each stage consumes the previous stage's immutable output; the first
/// failure aborts the run and surfaces the originating error unchanged — the
/// engine never retries and never substitutes defaults.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full analysis for one (portfolio, benchmark, period) triple.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - the asset set and weighting scheme to analyze.
    /// * `asset_prices` - one validated price series per portfolio asset.
    /// * `benchmark_prices` - the validated benchmark price series.
    /// * `period` - the lookback window the supplied data covers.
    /// * `settings` - risk-free rate, annualization factor, VaR confidence
    ///   levels and rolling window length.
    pub fn analyze(
        &self,
        portfolio: &Portfolio,
        asset_prices: &BTreeMap<String, PriceSeries>,
        benchmark_prices: &PriceSeries,
        period: LookbackPeriod,
        settings: &AnalysisSettings,
    ) -> Result<AnalysisReport, AnalyticsError> {
        // --- 1. Per-asset returns ---
        let returns_by_asset = self.asset_returns(portfolio, asset_prices)?;
        debug!(
            assets = returns_by_asset.len(),
            "computed per-asset return series"
        );

        // --- 2. Combine into the portfolio return series ---
        let portfolio_returns = returns::combine(&returns_by_asset, &portfolio.weights)?;

        // --- 3. Benchmark returns, aligned to the portfolio calendar ---
        let benchmark_returns = returns::simple_returns(benchmark_prices)?;
        let (portfolio_returns, benchmark_returns) =
            returns::align(&portfolio_returns, &benchmark_returns)?;
        let n = portfolio_returns.len();
        debug!(observations = n, "aligned portfolio and benchmark series");

        let (Some(start_date), Some(end_date)) = (
            portfolio_returns.first_timestamp(),
            portfolio_returns.last_timestamp(),
        ) else {
            return Err(AnalyticsError::Alignment(
                "aligned series is empty".to_string(),
            ));
        };

        let p = portfolio_returns.values();
        let b = benchmark_returns.values();
        let ppy = settings.periods_per_year;

        // --- 4. Return and risk metrics ---
        let portfolio_cumulative = returns::cumulative_returns(&portfolio_returns);
        let benchmark_cumulative = returns::cumulative_returns(&benchmark_returns);
        let portfolio_total_return = returns::total_return(&portfolio_returns);
        let benchmark_total_return = returns::total_return(&benchmark_returns);
        let portfolio_annualized =
            performance::annualized_return(portfolio_total_return, ppy, n)?;
        let benchmark_annualized =
            performance::annualized_return(benchmark_total_return, ppy, n)?;

        let portfolio_volatility = risk::volatility(&p, ppy)?;
        let benchmark_volatility = risk::volatility(&b, ppy)?;
        let max_drawdown = risk::max_drawdown(&portfolio_cumulative.values());
        let value_at_risk = settings
            .confidence_levels
            .iter()
            .map(|&confidence| {
                risk::value_at_risk(&p, confidence).map(|value| VarEstimate { confidence, value })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tracking_error = risk::tracking_error(&p, &b, ppy)?;

        // --- 5. Benchmark-relative performance metrics ---
        let beta = performance::beta(&p, &b)?;
        let alpha = performance::alpha(
            portfolio_total_return,
            benchmark_total_return,
            beta,
            settings.risk_free_rate,
            ppy,
            n,
        )?;
        let portfolio_sharpe = performance::sharpe_ratio(
            portfolio_annualized,
            portfolio_volatility,
            settings.risk_free_rate,
        )?;
        let benchmark_sharpe = performance::sharpe_ratio(
            benchmark_annualized,
            benchmark_volatility,
            settings.risk_free_rate,
        )?;
        let information_ratio = performance::information_ratio(&p, &b, ppy)?;
        let correlation = performance::correlation(&p, &b)?;
        let r_squared = performance::r_squared(&p, &b)?;
        let calmar_ratio = performance::calmar_ratio(portfolio_annualized, max_drawdown)?;
        let (up_capture, down_capture) = performance::up_down_capture(&p, &b)?;

        // --- 6. Rolling metric series ---
        let window = settings.rolling_window;
        let rolling = RollingMetrics {
            beta: rolling::rolling_beta(&portfolio_returns, &benchmark_returns, window)?,
            volatility: rolling::rolling_volatility(&portfolio_returns, window, ppy)?,
            correlation: rolling::rolling_correlation(
                &portfolio_returns,
                &benchmark_returns,
                window,
            )?,
        };

        info!(
            portfolio = %portfolio.name,
            benchmark = %benchmark_prices.symbol,
            observations = n,
            beta,
            alpha,
            "analysis complete"
        );

        // --- 7. Assemble the report ---
        Ok(AnalysisReport {
            portfolio_name: portfolio.name.clone(),
            benchmark_name: benchmark_prices.symbol.clone(),
            analysis_date: Utc::now(),
            start_date,
            end_date,
            data_points: n,
            parameters: AnalysisParameters {
                period,
                risk_free_rate: settings.risk_free_rate,
                periods_per_year: ppy,
                confidence_levels: settings.confidence_levels.clone(),
                rolling_window: window,
            },
            portfolio_total_return,
            benchmark_total_return,
            excess_return: performance::excess_return(
                portfolio_total_return,
                benchmark_total_return,
            ),
            portfolio_annualized_return: portfolio_annualized,
            benchmark_annualized_return: benchmark_annualized,
            portfolio_volatility,
            benchmark_volatility,
            max_drawdown,
            value_at_risk,
            tracking_error,
            beta,
            alpha,
            portfolio_sharpe_ratio: portfolio_sharpe,
            benchmark_sharpe_ratio: benchmark_sharpe,
            information_ratio,
            correlation,
            r_squared,
            calmar_ratio,
            up_capture,
            down_capture,
            portfolio_returns,
            benchmark_returns,
            portfolio_cumulative,
            benchmark_cumulative,
            rolling,
        })
    }

    /// Derives the simple return series for every asset in the portfolio.
    ///
    /// Every portfolio asset must come with a price series; an asset without
    /// one is an error, never silently dropped.
    fn asset_returns(
        &self,
        portfolio: &Portfolio,
        asset_prices: &BTreeMap<String, PriceSeries>,
    ) -> Result<BTreeMap<String, ReturnSeries>, AnalyticsError> {
        if portfolio.assets.is_empty() {
            return Err(AnalyticsError::InsufficientData(
                "portfolio has no assets".to_string(),
            ));
        }

        let mut returns_by_asset = BTreeMap::new();
        for symbol in &portfolio.assets {
            let prices = asset_prices.get(symbol).ok_or_else(|| {
                AnalyticsError::InsufficientData(format!(
                    "no price series supplied for asset '{symbol}'"
                ))
            })?;
            returns_by_asset.insert(symbol.clone(), returns::simple_returns(prices)?);
        }
        Ok(returns_by_asset)
    }
}
