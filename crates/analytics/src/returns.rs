//! The return calculator: converts price histories into return series and
//! combines per-asset returns into a single portfolio series.

use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use core_types::{PricePoint, PriceSeries, ReturnSeries, WeightVector};
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, BTreeSet};

/// Derives simple (arithmetic) returns from a price history:
/// `r_t = p_t / p_{t-1} - 1`.
///
/// The result is one element shorter than the input and dated at the later
/// observation of each pair.
pub fn simple_returns(prices: &PriceSeries) -> Result<ReturnSeries, AnalyticsError> {
    if prices.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "simple returns for '{}' need at least 2 price points, got {}",
            prices.symbol,
            prices.len()
        )));
    }

    // Decimal prices cross into f64 here, and only here; everything
    // downstream is floating-point statistics.
    let mut points = Vec::with_capacity(prices.len() - 1);
    for pair in prices.points.windows(2) {
        let prev = price_to_f64(&pair[0], &prices.symbol)?;
        let curr = price_to_f64(&pair[1], &prices.symbol)?;
        points.push((pair[1].timestamp, curr / prev - 1.0));
    }

    Ok(ReturnSeries::new(points))
}

fn price_to_f64(point: &PricePoint, symbol: &str) -> Result<f64, AnalyticsError> {
    point.price.to_f64().ok_or_else(|| {
        AnalyticsError::DegenerateInput(
            "simple_returns".to_string(),
            format!(
                "price for '{symbol}' at {} is not representable as f64",
                point.timestamp
            ),
        )
    })
}

/// Compounds a return series into cumulative returns:
/// `c_t = Π(1 + r_i) - 1` over `i = 1..t`.
///
/// The first cumulative value equals the first period return.
pub fn cumulative_returns(returns: &ReturnSeries) -> ReturnSeries {
    let mut growth = 1.0;
    let points = returns
        .points
        .iter()
        .map(|&(timestamp, r)| {
            growth *= 1.0 + r;
            (timestamp, growth - 1.0)
        })
        .collect();
    ReturnSeries::new(points)
}

/// The total compounded return over a whole series: `Π(1 + r) - 1`.
pub fn total_return(returns: &ReturnSeries) -> f64 {
    compound(returns.points.iter().map(|&(_, r)| r))
}

/// Compounds a bare sequence of period returns.
pub(crate) fn compound(returns: impl Iterator<Item = f64>) -> f64 {
    returns.fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Combines per-asset return series into one portfolio return series.
///
/// The series are inner-joined on the intersection of their timestamps: a
/// timestamp missing from any asset's series is dropped from the result
/// rather than imputed. At each common timestamp the portfolio return is the
/// weighted sum of the per-asset returns, or their arithmetic mean when the
/// weight vector is empty (equal-weight).
///
/// A non-empty weight vector must cover every supplied asset and only
/// supplied assets; silently dropping an asset is not permitted.
pub fn combine(
    returns_by_asset: &BTreeMap<String, ReturnSeries>,
    weights: &WeightVector,
) -> Result<ReturnSeries, AnalyticsError> {
    if returns_by_asset.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "cannot combine an empty set of asset return series".to_string(),
        ));
    }

    weights
        .validate()
        .map_err(|e| AnalyticsError::InvalidParameter(e.to_string()))?;

    if !weights.is_empty() {
        for symbol in returns_by_asset.keys() {
            if weights.get(symbol).is_none() {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "no weight supplied for asset '{symbol}'"
                )));
            }
        }
        for (symbol, _) in weights.iter() {
            if !returns_by_asset.contains_key(symbol) {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "weight supplied for '{symbol}', which has no return series"
                )));
            }
        }
    }

    // Intersect the timestamp sets across all assets.
    let mut common: BTreeSet<DateTime<Utc>> = returns_by_asset
        .values()
        .next()
        .map(|series| series.timestamps().into_iter().collect())
        .unwrap_or_default();
    for series in returns_by_asset.values().skip(1) {
        let timestamps: BTreeSet<DateTime<Utc>> = series.timestamps().into_iter().collect();
        common = common.intersection(&timestamps).copied().collect();
    }

    if common.is_empty() {
        return Err(AnalyticsError::Alignment(
            "no common timestamps across the asset return series".to_string(),
        ));
    }

    let lookups: BTreeMap<&String, BTreeMap<DateTime<Utc>, f64>> = returns_by_asset
        .iter()
        .map(|(symbol, series)| (symbol, series.points.iter().copied().collect()))
        .collect();

    let asset_count = returns_by_asset.len() as f64;
    let mut points = Vec::with_capacity(common.len());
    for timestamp in common {
        let mut combined = 0.0;
        for (symbol, lookup) in &lookups {
            // Membership in `common` guarantees the lookup succeeds.
            let r = lookup[&timestamp];
            match weights.get(symbol.as_str()) {
                Some(weight) => combined += weight * r,
                None => combined += r / asset_count,
            }
        }
        points.push((timestamp, combined));
    }

    Ok(ReturnSeries::new(points))
}

/// Inner-joins two return series on their common timestamps, returning the
/// aligned pair. Used to put the portfolio and benchmark series on the same
/// calendar before any pairwise metric is computed.
pub fn align(
    left: &ReturnSeries,
    right: &ReturnSeries,
) -> Result<(ReturnSeries, ReturnSeries), AnalyticsError> {
    let right_lookup: BTreeMap<DateTime<Utc>, f64> = right.points.iter().copied().collect();

    let mut left_aligned = Vec::new();
    let mut right_aligned = Vec::new();
    for &(timestamp, value) in &left.points {
        if let Some(&other) = right_lookup.get(&timestamp) {
            left_aligned.push((timestamp, value));
            right_aligned.push((timestamp, other));
        }
    }

    if left_aligned.is_empty() {
        return Err(AnalyticsError::Alignment(
            "no common timestamps between the two series".to_string(),
        ));
    }

    Ok((
        ReturnSeries::new(left_aligned),
        ReturnSeries::new(right_aligned),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};
    use core_types::PricePoint;
    use rust_decimal_macros::dec;
    use rust_decimal::Decimal;

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset)
    }

    fn series(symbol: &str, prices: &[Decimal]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: day(i as i64),
                price,
            })
            .collect();
        PriceSeries::new(symbol, points)
    }

    fn returns(values: &[f64]) -> ReturnSeries {
        ReturnSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| (day(i as i64), v))
                .collect(),
        )
    }

    #[test]
    fn simple_returns_match_hand_computation() {
        let prices = series("TEST", &[dec!(100), dec!(110), dec!(121)]);
        let r = simple_returns(&prices).unwrap();
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r.values()[0], 0.10, max_relative = 1e-12);
        assert_relative_eq!(r.values()[1], 0.10, max_relative = 1e-12);
        // Dated at the later observation of each pair.
        assert_eq!(r.points[0].0, day(1));
        assert_eq!(r.points[1].0, day(2));
    }

    #[test]
    fn simple_returns_of_constant_prices_are_zero() {
        let prices = series("FLAT", &[dec!(50), dec!(50), dec!(50), dec!(50)]);
        let r = simple_returns(&prices).unwrap();
        assert!(r.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn simple_returns_need_two_points() {
        let prices = series("ONE", &[dec!(100)]);
        assert!(matches!(
            simple_returns(&prices),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn cumulative_returns_compound() {
        let r = returns(&[0.10, 0.10]);
        let c = cumulative_returns(&r);
        assert_relative_eq!(c.values()[0], 0.10, max_relative = 1e-12);
        assert_relative_eq!(c.values()[1], 0.21, max_relative = 1e-12);
    }

    #[test]
    fn cumulative_round_trip_reconstructs_prices() {
        let prices = series("RT", &[dec!(100), dec!(104), dec!(99), dec!(103), dec!(97)]);
        let r = simple_returns(&prices).unwrap();
        let c = cumulative_returns(&r);
        for (i, &(_, cum)) in c.points.iter().enumerate() {
            let reconstructed = 100.0 * (1.0 + cum);
            let original = prices.points[i + 1].price.to_f64().unwrap();
            assert_relative_eq!(reconstructed, original, max_relative = 1e-10);
        }
    }

    #[test]
    fn total_return_is_last_cumulative_value() {
        let r = returns(&[0.01, -0.02, 0.03]);
        let c = cumulative_returns(&r);
        assert_relative_eq!(
            total_return(&r),
            c.values().last().copied().unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn equal_split_of_identical_series_is_identity() {
        let a = returns(&[0.01, -0.02, 0.03]);
        let map = BTreeMap::from([("A".to_string(), a.clone()), ("B".to_string(), a.clone())]);
        let weights = WeightVector::from_weights(
            [("A".to_string(), 0.5), ("B".to_string(), 0.5)].into(),
        );
        let combined = combine(&map, &weights).unwrap();
        for (&(_, got), &(_, want)) in combined.points.iter().zip(a.points.iter()) {
            assert_relative_eq!(got, want, max_relative = 1e-12);
        }
    }

    #[test]
    fn equal_weight_default_averages() {
        let a = returns(&[0.02, 0.04]);
        let b = returns(&[0.00, -0.02]);
        let map = BTreeMap::from([("A".to_string(), a), ("B".to_string(), b)]);
        let combined = combine(&map, &WeightVector::equal_weight()).unwrap();
        assert_relative_eq!(combined.values()[0], 0.01, max_relative = 1e-12);
        assert_relative_eq!(combined.values()[1], 0.01, max_relative = 1e-12);
    }

    #[test]
    fn combine_inner_joins_on_common_timestamps() {
        let a = returns(&[0.01, 0.02, 0.03]); // days 0..2
        let b = ReturnSeries::new(vec![(day(1), 0.05), (day(2), 0.07), (day(3), 0.09)]);
        let map = BTreeMap::from([("A".to_string(), a), ("B".to_string(), b)]);
        let combined = combine(&map, &WeightVector::equal_weight()).unwrap();
        // Only days 1 and 2 are shared.
        assert_eq!(combined.timestamps(), vec![day(1), day(2)]);
        assert_relative_eq!(combined.values()[0], (0.02 + 0.05) / 2.0, max_relative = 1e-12);
    }

    #[test]
    fn combine_with_disjoint_calendars_fails() {
        let a = returns(&[0.01, 0.02]);
        let b = ReturnSeries::new(vec![(day(10), 0.05), (day(11), 0.07)]);
        let map = BTreeMap::from([("A".to_string(), a), ("B".to_string(), b)]);
        assert!(matches!(
            combine(&map, &WeightVector::equal_weight()),
            Err(AnalyticsError::Alignment(_))
        ));
    }

    #[test]
    fn combine_rejects_missing_weight() {
        let a = returns(&[0.01]);
        let b = returns(&[0.02]);
        let map = BTreeMap::from([("A".to_string(), a), ("B".to_string(), b)]);
        let weights = WeightVector::from_weights([("A".to_string(), 1.0)].into());
        assert!(matches!(
            combine(&map, &weights),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn combine_rejects_weight_for_unknown_asset() {
        let a = returns(&[0.01]);
        let map = BTreeMap::from([("A".to_string(), a)]);
        let weights = WeightVector::from_weights(
            [("A".to_string(), 0.5), ("GHOST".to_string(), 0.5)].into(),
        );
        assert!(matches!(
            combine(&map, &weights),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn align_keeps_only_shared_timestamps() {
        let left = returns(&[0.01, 0.02, 0.03]);
        let right = ReturnSeries::new(vec![(day(1), 0.10), (day(2), 0.20)]);
        let (l, r) = align(&left, &right).unwrap();
        assert_eq!(l.timestamps(), vec![day(1), day(2)]);
        assert_eq!(r.values(), vec![0.10, 0.20]);
    }

    #[test]
    fn align_with_no_overlap_fails() {
        let left = returns(&[0.01]);
        let right = ReturnSeries::new(vec![(day(5), 0.10)]);
        assert!(matches!(
            align(&left, &right),
            Err(AnalyticsError::Alignment(_))
        ));
    }
}
