use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far the weights of a non-empty `WeightVector` may drift from summing
/// to exactly 1.0 before the vector is rejected.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A mapping from asset symbol to portfolio weight.
///
/// An empty vector means "equal-weight": the combination step averages the
/// per-asset returns instead of taking a weighted sum. A non-empty vector
/// must carry non-negative weights that sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightVector(BTreeMap<String, f64>);

impl WeightVector {
    /// An empty vector, meaning equal-weight combination.
    pub fn equal_weight() -> Self {
        Self::default()
    }

    pub fn from_weights(weights: BTreeMap<String, f64>) -> Self {
        Self(weights)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.0.get(symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, f64)> {
        self.0.iter().map(|(s, &w)| (s, w))
    }

    /// Checks the weight invariants: every weight non-negative and finite,
    /// and the total within [`WEIGHT_SUM_TOLERANCE`] of 1.0.
    ///
    /// An empty vector is always valid (it means equal-weight).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.0.is_empty() {
            return Ok(());
        }
        for (symbol, &weight) in &self.0 {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CoreError::InvalidInput(
                    "weights".to_string(),
                    format!("weight for '{symbol}' must be a non-negative number, got {weight}"),
                ));
            }
        }
        let total: f64 = self.0.values().sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidInput(
                "weights".to_string(),
                format!("weights must sum to 1.0, got {total}"),
            ));
        }
        Ok(())
    }
}

/// A named collection of assets with an associated weighting scheme.
///
/// The asset symbols name which price series the engine should combine; the
/// price data itself is supplied separately at analysis time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub name: String,
    pub assets: Vec<String>,
    pub weights: WeightVector,
}

impl Portfolio {
    pub fn new(name: impl Into<String>, assets: Vec<String>, weights: WeightVector) -> Self {
        Self {
            name: name.into(),
            assets,
            weights,
        }
    }

    /// A portfolio where every asset contributes equally.
    pub fn equal_weighted(name: impl Into<String>, assets: Vec<String>) -> Self {
        Self::new(name, assets, WeightVector::equal_weight())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vector_is_valid_and_means_equal_weight() {
        let weights = WeightVector::equal_weight();
        assert!(weights.is_empty());
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn weights_summing_to_one_pass() {
        let weights = WeightVector::from_weights(BTreeMap::from([
            ("AAPL".to_string(), 0.6),
            ("MSFT".to_string(), 0.4),
        ]));
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn weights_not_summing_to_one_fail() {
        let weights = WeightVector::from_weights(BTreeMap::from([
            ("AAPL".to_string(), 0.6),
            ("MSFT".to_string(), 0.6),
        ]));
        assert!(weights.validate().is_err());
    }

    #[test]
    fn negative_weight_fails() {
        let weights = WeightVector::from_weights(BTreeMap::from([
            ("AAPL".to_string(), 1.5),
            ("MSFT".to_string(), -0.5),
        ]));
        assert!(weights.validate().is_err());
    }

    #[test]
    fn sum_within_tolerance_passes() {
        let weights = WeightVector::from_weights(BTreeMap::from([
            ("AAPL".to_string(), 0.5),
            ("MSFT".to_string(), 0.5 + 1e-9),
        ]));
        assert!(weights.validate().is_ok());
    }
}
