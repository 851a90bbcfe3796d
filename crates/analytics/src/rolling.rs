//! Rolling metrics: re-applies scalar metrics over sliding windows to
//! produce time-varying series for visualization.
//!
//! Windows are lazy: each one is evaluated as the iterator is advanced, so a
//! long history never materializes every intermediate window at once. Only
//! full windows are produced — there is no forward- or back-filling at the
//! series boundary.

use crate::error::AnalyticsError;
use crate::{performance, risk};
use chrono::{DateTime, Utc};
use core_types::ReturnSeries;

fn check_window(window: usize, len: usize) -> Result<(), AnalyticsError> {
    if window < 2 {
        return Err(AnalyticsError::InvalidParameter(format!(
            "rolling window must be at least 2, got {window}"
        )));
    }
    if window > len {
        return Err(AnalyticsError::InvalidParameter(format!(
            "rolling window of {window} exceeds series length {len}"
        )));
    }
    Ok(())
}

/// A lazy, finite, non-restartable sequence of dated metric values over
/// every contiguous window of one return series.
///
/// Yields one `(window_end_timestamp, value)` per full window; the sequence
/// is `len - window + 1` items long.
pub struct Rolling<F> {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    window: usize,
    position: usize,
    metric: F,
}

impl<F> Iterator for Rolling<F>
where
    F: FnMut(&[f64]) -> Result<f64, AnalyticsError>,
{
    type Item = Result<(DateTime<Utc>, f64), AnalyticsError>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.position + self.window;
        if end > self.values.len() {
            return None;
        }
        let slice = &self.values[self.position..end];
        let timestamp = self.timestamps[end - 1];
        self.position += 1;
        Some((self.metric)(slice).map(|value| (timestamp, value)))
    }
}

/// Applies `metric` over every contiguous `window`-length slice of `series`.
pub fn rolling<F>(
    series: &ReturnSeries,
    window: usize,
    metric: F,
) -> Result<Rolling<F>, AnalyticsError>
where
    F: FnMut(&[f64]) -> Result<f64, AnalyticsError>,
{
    check_window(window, series.len())?;
    Ok(Rolling {
        timestamps: series.timestamps(),
        values: series.values(),
        window,
        position: 0,
        metric,
    })
}

/// The pairwise counterpart of [`Rolling`], for metrics that consume an
/// aligned (portfolio, benchmark) window pair such as beta or correlation.
pub struct RollingPair<F> {
    timestamps: Vec<DateTime<Utc>>,
    left: Vec<f64>,
    right: Vec<f64>,
    window: usize,
    position: usize,
    metric: F,
}

impl<F> Iterator for RollingPair<F>
where
    F: FnMut(&[f64], &[f64]) -> Result<f64, AnalyticsError>,
{
    type Item = Result<(DateTime<Utc>, f64), AnalyticsError>;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.position + self.window;
        if end > self.left.len() {
            return None;
        }
        let left = &self.left[self.position..end];
        let right = &self.right[self.position..end];
        let timestamp = self.timestamps[end - 1];
        self.position += 1;
        Some((self.metric)(left, right).map(|value| (timestamp, value)))
    }
}

/// Applies `metric` over every aligned contiguous window pair of the two
/// series. The series must already share a calendar.
pub fn rolling_pair<F>(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    window: usize,
    metric: F,
) -> Result<RollingPair<F>, AnalyticsError>
where
    F: FnMut(&[f64], &[f64]) -> Result<f64, AnalyticsError>,
{
    if portfolio.len() != benchmark.len() {
        return Err(AnalyticsError::Alignment(format!(
            "rolling pair requires aligned series of equal length, got {} and {}",
            portfolio.len(),
            benchmark.len()
        )));
    }
    check_window(window, portfolio.len())?;
    Ok(RollingPair {
        timestamps: portfolio.timestamps(),
        left: portfolio.values(),
        right: benchmark.values(),
        window,
        position: 0,
        metric,
    })
}

/// Rolling annualized volatility of a single series, materialized for the
/// report.
pub fn rolling_volatility(
    series: &ReturnSeries,
    window: usize,
    periods_per_year: u32,
) -> Result<ReturnSeries, AnalyticsError> {
    let points = rolling(series, window, move |w| risk::volatility(w, periods_per_year))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReturnSeries::new(points))
}

/// Rolling beta of the portfolio against the benchmark.
pub fn rolling_beta(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    window: usize,
) -> Result<ReturnSeries, AnalyticsError> {
    let points = rolling_pair(portfolio, benchmark, window, performance::beta)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReturnSeries::new(points))
}

/// Rolling Pearson correlation of the portfolio against the benchmark.
pub fn rolling_correlation(
    portfolio: &ReturnSeries,
    benchmark: &ReturnSeries,
    window: usize,
) -> Result<ReturnSeries, AnalyticsError> {
    let points = rolling_pair(portfolio, benchmark, window, performance::correlation)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ReturnSeries::new(points))
}
