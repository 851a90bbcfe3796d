//! Performance metrics comparing a portfolio return series against a
//! benchmark: beta, alpha, Sharpe, information ratio, correlation,
//! R-squared, Calmar and capture ratios.

use crate::error::AnalyticsError;
use crate::returns::compound;
use crate::risk::{mean, sample_std_dev};

/// Variance threshold below which a denominator is treated as degenerate.
const VARIANCE_EPSILON: f64 = 1e-12;

fn check_aligned(portfolio: &[f64], benchmark: &[f64]) -> Result<(), AnalyticsError> {
    if portfolio.len() != benchmark.len() {
        return Err(AnalyticsError::Alignment(format!(
            "pairwise metric requires aligned series of equal length, got {} and {}",
            portfolio.len(),
            benchmark.len()
        )));
    }
    Ok(())
}

/// Sample (n-1) covariance between two aligned series.
fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (x.len() - 1) as f64
}

/// Beta: the sensitivity of portfolio returns to benchmark returns,
/// `cov(p, b) / var(b)` (sample statistics on both sides).
///
/// A flat benchmark has no variance to regress against, so the division is
/// refused rather than performed.
pub fn beta(portfolio: &[f64], benchmark: &[f64]) -> Result<f64, AnalyticsError> {
    check_aligned(portfolio, benchmark)?;
    if portfolio.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "beta needs at least 2 observations, got {}",
            portfolio.len()
        )));
    }

    let benchmark_mean = mean(benchmark);
    let benchmark_variance = benchmark
        .iter()
        .map(|b| (b - benchmark_mean).powi(2))
        .sum::<f64>()
        / (benchmark.len() - 1) as f64;

    if benchmark_variance < VARIANCE_EPSILON {
        return Err(AnalyticsError::DegenerateInput(
            "beta".to_string(),
            "benchmark variance is zero (flat benchmark)".to_string(),
        ));
    }

    Ok(sample_covariance(portfolio, benchmark) / benchmark_variance)
}

/// Annualizes a total-period return observed over `n_periods` observations:
/// `(1 + total)^(periods_per_year / n) - 1`.
pub fn annualized_return(
    total_return: f64,
    periods_per_year: u32,
    n_periods: usize,
) -> Result<f64, AnalyticsError> {
    if n_periods == 0 {
        return Err(AnalyticsError::InsufficientData(
            "cannot annualize a return over 0 periods".to_string(),
        ));
    }
    let exponent = periods_per_year as f64 / n_periods as f64;
    Ok((1.0 + total_return).powf(exponent) - 1.0)
}

/// Jensen's alpha under CAPM, on annualized total returns:
/// `alpha = R_p - (rf + beta * (R_b - rf))`.
///
/// `portfolio_total_return` and `benchmark_total_return` are total-period
/// compounded returns over the same `n_periods` observations; both are
/// annualized internally with [`annualized_return`].
pub fn alpha(
    portfolio_total_return: f64,
    benchmark_total_return: f64,
    beta: f64,
    risk_free_rate: f64,
    periods_per_year: u32,
    n_periods: usize,
) -> Result<f64, AnalyticsError> {
    let rp = annualized_return(portfolio_total_return, periods_per_year, n_periods)?;
    let rb = annualized_return(benchmark_total_return, periods_per_year, n_periods)?;
    Ok(rp - (risk_free_rate + beta * (rb - risk_free_rate)))
}

/// Sharpe ratio: annualized excess return per unit of annualized volatility.
///
/// Zero volatility makes the ratio undefined; that degenerate case is
/// surfaced as an error instead of silently reporting 0 (a riskless series
/// with positive excess return is not "zero risk-adjusted performance").
pub fn sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> Result<f64, AnalyticsError> {
    if annualized_volatility.abs() < VARIANCE_EPSILON {
        return Err(AnalyticsError::DegenerateInput(
            "sharpe_ratio".to_string(),
            "volatility is zero".to_string(),
        ));
    }
    Ok((annualized_return - risk_free_rate) / annualized_volatility)
}

/// Information ratio: annualized mean active return divided by tracking
/// error.
pub fn information_ratio(
    portfolio: &[f64],
    benchmark: &[f64],
    periods_per_year: u32,
) -> Result<f64, AnalyticsError> {
    check_aligned(portfolio, benchmark)?;
    let active: Vec<f64> = portfolio
        .iter()
        .zip(benchmark.iter())
        .map(|(p, b)| p - b)
        .collect();
    let te = crate::risk::volatility(&active, periods_per_year)?;
    if te < VARIANCE_EPSILON {
        return Err(AnalyticsError::DegenerateInput(
            "information_ratio".to_string(),
            "tracking error is zero".to_string(),
        ));
    }
    Ok(mean(&active) * periods_per_year as f64 / te)
}

/// Pearson correlation coefficient between two aligned return series.
pub fn correlation(portfolio: &[f64], benchmark: &[f64]) -> Result<f64, AnalyticsError> {
    check_aligned(portfolio, benchmark)?;
    let sp = sample_std_dev(portfolio)?;
    let sb = sample_std_dev(benchmark)?;
    if sp < VARIANCE_EPSILON || sb < VARIANCE_EPSILON {
        return Err(AnalyticsError::DegenerateInput(
            "correlation".to_string(),
            "at least one series has zero variance".to_string(),
        ));
    }
    Ok(sample_covariance(portfolio, benchmark) / (sp * sb))
}

/// R-squared: the share of portfolio return variance explained by the
/// benchmark, i.e. the squared Pearson correlation. Identical series score
/// exactly 1.0; uncorrelated series score 0.0.
pub fn r_squared(portfolio: &[f64], benchmark: &[f64]) -> Result<f64, AnalyticsError> {
    if portfolio == benchmark {
        // Self-comparison is exact by definition; don't let floating-point
        // round-off report 0.9999... for it.
        check_aligned(portfolio, benchmark)?;
        sample_std_dev(portfolio)?;
        return Ok(1.0);
    }
    Ok(correlation(portfolio, benchmark)?.powi(2))
}

/// Calmar ratio: annualized return divided by the magnitude of the maximum
/// drawdown. Undefined (and rejected) when the drawdown is exactly zero.
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> Result<f64, AnalyticsError> {
    if max_drawdown == 0.0 {
        return Err(AnalyticsError::DegenerateInput(
            "calmar_ratio".to_string(),
            "maximum drawdown is zero".to_string(),
        ));
    }
    Ok(annualized_return / max_drawdown.abs())
}

/// Excess return: portfolio total return minus benchmark total return over
/// the same window.
pub fn excess_return(portfolio_total_return: f64, benchmark_total_return: f64) -> f64 {
    portfolio_total_return - benchmark_total_return
}

/// Up- and down-capture ratios.
///
/// Periods are partitioned by the sign of the benchmark return; periods
/// where the benchmark is exactly zero belong to neither side. Each capture
/// is the compounded portfolio return over the partition divided by the
/// compounded benchmark return over it. An empty partition leaves the ratio
/// undefined, as does a partition whose compounded benchmark return is zero.
pub fn up_down_capture(portfolio: &[f64], benchmark: &[f64]) -> Result<(f64, f64), AnalyticsError> {
    check_aligned(portfolio, benchmark)?;

    let mut up_p = Vec::new();
    let mut up_b = Vec::new();
    let mut down_p = Vec::new();
    let mut down_b = Vec::new();
    for (&p, &b) in portfolio.iter().zip(benchmark.iter()) {
        if b > 0.0 {
            up_p.push(p);
            up_b.push(b);
        } else if b < 0.0 {
            down_p.push(p);
            down_b.push(b);
        }
    }

    let up = capture_over("up_capture", &up_p, &up_b)?;
    let down = capture_over("down_capture", &down_p, &down_b)?;
    Ok((up, down))
}

fn capture_over(metric: &str, portfolio: &[f64], benchmark: &[f64]) -> Result<f64, AnalyticsError> {
    if benchmark.is_empty() {
        return Err(AnalyticsError::InsufficientData(format!(
            "{metric} has no qualifying periods"
        )));
    }
    let benchmark_compounded = compound(benchmark.iter().copied());
    if benchmark_compounded == 0.0 {
        return Err(AnalyticsError::DegenerateInput(
            metric.to_string(),
            "compounded benchmark return over the partition is zero".to_string(),
        ));
    }
    Ok(compound(portfolio.iter().copied()) / benchmark_compounded)
}
