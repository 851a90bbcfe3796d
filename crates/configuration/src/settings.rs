use serde::Deserialize;

/// The root configuration structure for the application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Missing section means "all defaults".
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// Parameters that shape a single analysis run.
///
/// These are the knobs the engine accepts; everything else (which assets,
/// which benchmark, which period) arrives per-run from the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisSettings {
    /// The annualized risk-free rate used by Sharpe and alpha
    /// (e.g. 0.02 for 2%).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// The number of return observations in a year, used for annualization.
    /// 252 for daily equity data.
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,

    /// The confidence levels at which Value-at-Risk is reported,
    /// each strictly between 0 and 1.
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,

    /// The window length, in observations, for the rolling metric series.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
}

fn default_risk_free_rate() -> f64 {
    0.02
}

fn default_periods_per_year() -> u32 {
    252
}

fn default_confidence_levels() -> Vec<f64> {
    vec![0.95, 0.99]
}

fn default_rolling_window() -> usize {
    60
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            periods_per_year: default_periods_per_year(),
            confidence_levels: default_confidence_levels(),
            rolling_window: default_rolling_window(),
        }
    }
}

impl AnalysisSettings {
    /// Validates that the settings are internally coherent before they reach
    /// the engine.
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        if !self.risk_free_rate.is_finite() || self.risk_free_rate < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "risk_free_rate must be a non-negative number, got {}",
                self.risk_free_rate
            )));
        }
        if self.periods_per_year == 0 {
            return Err(ConfigError::ValidationError(
                "periods_per_year must be at least 1".to_string(),
            ));
        }
        for &confidence in &self.confidence_levels {
            if !(confidence > 0.0 && confidence < 1.0) {
                return Err(ConfigError::ValidationError(format!(
                    "confidence levels must be strictly between 0 and 1, got {confidence}"
                )));
            }
        }
        if self.rolling_window < 2 {
            return Err(ConfigError::ValidationError(format!(
                "rolling_window must be at least 2, got {}",
                self.rolling_window
            )));
        }
        Ok(())
    }
}
