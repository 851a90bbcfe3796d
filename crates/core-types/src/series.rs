use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observation in a price history.
///
/// Prices stay `Decimal` at the data boundary; the analytics layer converts
/// them to floating point exactly once, when returns are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// The full price history of one asset over the analysis window.
///
/// Invariants (enforced by the data collaborator that builds the series, not
/// re-checked downstream): timestamps strictly ascending, no duplicates, all
/// prices positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An ordered sequence of dated floating-point values.
///
/// This is the workhorse type of the engine: simple returns, cumulative
/// returns and rolling metric series are all carried in this shape. A series
/// derived from a `PriceSeries` is one element shorter than its source (the
/// first observation has no prior period) and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReturnSeries {
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ReturnSeries {
    pub fn new(points: Vec<(DateTime<Utc>, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The values without their timestamps, in series order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, v)| v).collect()
    }

    /// The timestamps without their values, in series order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|&(t, _)| t).collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|&(t, _)| t)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|&(t, _)| t)
    }
}
