use thiserror::Error;

/// The failure modes of the analytics engine.
///
/// Every metric fails fast: a mathematically undefined result is surfaced as
/// an error, never substituted with 0 or NaN, because a silently defaulted
/// value would corrupt any composite metric computed from it downstream.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("Series alignment failed: {0}")]
    Alignment(String),

    #[error("Degenerate input for metric '{0}': {1}")]
    DegenerateInput(String, String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
