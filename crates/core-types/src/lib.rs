//! # Vantage Core Types
//!
//! The foundational data types shared by every crate in the workspace. This
//! is a pure "Layer 0" crate: it defines the vocabulary of the system (price
//! series, return series, portfolios, lookback periods) and nothing else. It
//! has no knowledge of where data comes from or of what gets computed from it.

pub mod enums;
pub mod error;
pub mod portfolio;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::LookbackPeriod;
pub use error::CoreError;
pub use portfolio::{Portfolio, WeightVector, WEIGHT_SUM_TOLERANCE};
pub use series::{PricePoint, PriceSeries, ReturnSeries};
