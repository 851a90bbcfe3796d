//! Risk metrics over return series: volatility, maximum drawdown,
//! Value-at-Risk and tracking error.

use crate::error::AnalyticsError;

/// Sample mean of a slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample (n-1) standard deviation. Requires at least 2 observations.
pub(crate) fn sample_std_dev(values: &[f64]) -> Result<f64, AnalyticsError> {
    if values.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "standard deviation needs at least 2 observations, got {}",
            values.len()
        )));
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Ok(variance.sqrt())
}

/// Annualized volatility: sample standard deviation of the period returns
/// scaled by the square root of the number of periods in a year.
pub fn volatility(returns: &[f64], periods_per_year: u32) -> Result<f64, AnalyticsError> {
    Ok(sample_std_dev(returns)? * (periods_per_year as f64).sqrt())
}

/// Maximum drawdown over a cumulative return series.
///
/// Tracks the running peak of the growth factor `1 + c_t`; the drawdown at
/// `t` is `(1 + c_t) / peak - 1`, and the result is the most negative
/// drawdown observed. A monotonically non-decreasing series yields 0. The
/// peak starts at the first observation, so a series that only falls from
/// its very first value still reports the full decline.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst: f64 = 0.0;
    for &c in cumulative {
        let growth = 1.0 + c;
        if growth > peak {
            peak = growth;
        }
        worst = worst.min(growth / peak - 1.0);
    }
    worst
}

/// Empirical Value-at-Risk at the given confidence level.
///
/// Returns the quantile of the return distribution at `1 - confidence`
/// (confidence 0.95 reads off the 5th percentile). The quantile uses linear
/// interpolation between order statistics, with the rank position
/// `q * (n - 1)` — the same convention as NumPy's default percentile method,
/// so results are bit-comparable across implementations.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Result<f64, AnalyticsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(AnalyticsError::InvalidParameter(format!(
            "VaR confidence must be strictly between 0 and 1, got {confidence}"
        )));
    }
    if returns.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "VaR needs at least 1 observation, got 0".to_string(),
        ));
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (1.0 - confidence) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Ok(sorted[lower]);
    }
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Annualized tracking error: the volatility of the per-period difference
/// between portfolio and benchmark returns.
///
/// The two series must already be aligned by timestamp; a length mismatch is
/// rejected rather than truncated.
pub fn tracking_error(
    portfolio: &[f64],
    benchmark: &[f64],
    periods_per_year: u32,
) -> Result<f64, AnalyticsError> {
    if portfolio.len() != benchmark.len() {
        return Err(AnalyticsError::Alignment(format!(
            "tracking error requires aligned series of equal length, got {} and {}",
            portfolio.len(),
            benchmark.len()
        )));
    }
    let active: Vec<f64> = portfolio
        .iter()
        .zip(benchmark.iter())
        .map(|(p, b)| p - b)
        .collect();
    volatility(&active, periods_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volatility_of_constant_returns_is_zero() {
        let vol = volatility(&[0.10, 0.10], 252).unwrap();
        assert_eq!(vol, 0.0);
    }

    #[test]
    fn volatility_matches_hand_computation() {
        // std of [0.01, -0.02, 0.03] with n-1: mean = 0.006666...
        let returns = [0.01, -0.02, 0.03];
        let m = returns.iter().sum::<f64>() / 3.0;
        let expected_std =
            (returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / 2.0).sqrt();
        let vol = volatility(&returns, 252).unwrap();
        assert_relative_eq!(vol, expected_std * 252f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn volatility_needs_two_observations() {
        assert!(matches!(
            volatility(&[0.01], 252),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn drawdown_of_rising_series_is_zero() {
        assert_eq!(max_drawdown(&[0.01, 0.02, 0.05, 0.05, 0.08]), 0.0);
    }

    #[test]
    fn drawdown_tracks_peak_to_trough() {
        // Growth factors: 1.10, 1.21, 0.968, 1.089.
        // Peak 1.21, trough 0.968 -> 0.968/1.21 - 1 = -0.2.
        let dd = max_drawdown(&[0.10, 0.21, -0.032, 0.089]);
        assert_relative_eq!(dd, -0.2, max_relative = 1e-10);
    }

    #[test]
    fn drawdown_counts_fall_from_first_value() {
        let dd = max_drawdown(&[-0.10, -0.20]);
        // Peak is the first growth factor 0.9; trough 0.8.
        assert_relative_eq!(dd, 0.8 / 0.9 - 1.0, max_relative = 1e-12);
    }

    #[test]
    fn var_interpolates_like_numpy() {
        // np.percentile([-0.03, -0.01, 0.00, 0.02, 0.04], 5) == -0.026
        let returns = [0.02, -0.03, 0.04, -0.01, 0.00];
        let var = value_at_risk(&returns, 0.95).unwrap();
        assert_relative_eq!(var, -0.026, max_relative = 1e-12);
        // np.percentile(..., 1) == -0.0292
        let var99 = value_at_risk(&returns, 0.99).unwrap();
        assert_relative_eq!(var99, -0.0292, max_relative = 1e-12);
    }

    #[test]
    fn var_is_monotone_in_confidence() {
        let returns = [0.015, -0.022, 0.004, -0.011, 0.03, -0.007, 0.019, -0.028];
        let var95 = value_at_risk(&returns, 0.95).unwrap();
        let var99 = value_at_risk(&returns, 0.99).unwrap();
        assert!(var95 >= var99);
    }

    #[test]
    fn var_rejects_out_of_range_confidence() {
        for confidence in [0.0, 1.0, -0.5, 1.5] {
            assert!(matches!(
                value_at_risk(&[0.01, 0.02], confidence),
                Err(AnalyticsError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn tracking_error_of_identical_series_is_zero() {
        let r = [0.01, -0.02, 0.03];
        assert_eq!(tracking_error(&r, &r, 252).unwrap(), 0.0);
    }

    #[test]
    fn tracking_error_rejects_length_mismatch() {
        assert!(matches!(
            tracking_error(&[0.01, 0.02], &[0.01], 252),
            Err(AnalyticsError::Alignment(_))
        ));
    }

    #[test]
    fn tracking_error_matches_volatility_of_difference() {
        let p = [0.01, -0.02, 0.03, 0.00];
        let b = [0.015, -0.01, 0.02, 0.005];
        let diff: Vec<f64> = p.iter().zip(b.iter()).map(|(x, y)| x - y).collect();
        assert_relative_eq!(
            tracking_error(&p, &b, 252).unwrap(),
            volatility(&diff, 252).unwrap(),
            max_relative = 1e-12
        );
    }
}
