use chrono::{DateTime, Utc};
use core_types::{LookbackPeriod, ReturnSeries};
use serde::{Deserialize, Serialize};

/// A Value-at-Risk estimate together with the confidence level that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarEstimate {
    pub confidence: f64,
    pub value: f64,
}

/// The parameters a report was computed under.
///
/// Every scalar in the report is only meaningful relative to these; they are
/// recorded once per run so a consumer can always tell which annualization
/// factor, risk-free rate and window produced the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    pub period: LookbackPeriod,
    pub risk_free_rate: f64,
    pub periods_per_year: u32,
    pub confidence_levels: Vec<f64>,
    pub rolling_window: usize,
}

/// The time-varying metric series computed over sliding windows, for
/// plotting by chart collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingMetrics {
    pub beta: ReturnSeries,
    pub volatility: ReturnSeries,
    pub correlation: ReturnSeries,
}

/// A comprehensive, standardized report of one portfolio-vs-benchmark
/// analysis run.
///
/// This struct is the final output of the `AnalyticsEngine` and the data
/// transfer object handed to UI and chart collaborators. It is created once
/// per run, never mutated afterwards, and replaced wholesale when a new
/// analysis runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    // I. Run identification
    pub portfolio_name: String,
    pub benchmark_name: String,
    pub analysis_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Number of aligned return observations the metrics were computed over.
    pub data_points: usize,
    pub parameters: AnalysisParameters,

    // II. Returns
    pub portfolio_total_return: f64,
    pub benchmark_total_return: f64,
    pub excess_return: f64,
    pub portfolio_annualized_return: f64,
    pub benchmark_annualized_return: f64,

    // III. Risk
    pub portfolio_volatility: f64,
    pub benchmark_volatility: f64,
    pub max_drawdown: f64,
    pub value_at_risk: Vec<VarEstimate>,
    pub tracking_error: f64,

    // IV. Benchmark-relative performance
    pub beta: f64,
    pub alpha: f64,
    pub portfolio_sharpe_ratio: f64,
    pub benchmark_sharpe_ratio: f64,
    pub information_ratio: f64,
    pub correlation: f64,
    pub r_squared: f64,
    pub calmar_ratio: f64,
    pub up_capture: f64,
    pub down_capture: f64,

    // V. Supporting series for chart collaborators
    pub portfolio_returns: ReturnSeries,
    pub benchmark_returns: ReturnSeries,
    pub portfolio_cumulative: ReturnSeries,
    pub benchmark_cumulative: ReturnSeries,
    pub rolling: RollingMetrics,
}
