//! # Vantage Analytics Engine
//!
//! Deterministic portfolio-vs-benchmark analytics: turns aligned historical
//! price series into returns, risk metrics, performance metrics and rolling
//! metric series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic crate.** No network, no disk, no clocks beyond stamping the
//!   report; inputs are read immutably and every transformation returns a new
//!   value. Data fetching, validation and presentation live with external
//!   collaborators.
//! - **Small pure functions, thin orchestrator.** Each metric in `returns`,
//!   `risk`, `performance` and `rolling` is an independently callable,
//!   stateless function, so every number can be validated in isolation. The
//!   `AnalyticsEngine` merely composes them in dependency order.
//! - **Fail fast, never mask.** A mathematically undefined result (zero
//!   variance, zero drawdown, empty partition) is an error, not a 0 or NaN.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the facade composing the fixed pipeline.
//! - `AnalysisReport`: the immutable result object for one run.
//! - `AnalyticsError`: the four failure kinds of the engine.
//! - The metric modules themselves, for callers that want single metrics.

pub mod engine;
pub mod error;
pub mod performance;
pub mod report;
pub mod returns;
pub mod risk;
pub mod rolling;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{AnalysisParameters, AnalysisReport, RollingMetrics, VarEstimate};
