//! # Vantage Configuration
//!
//! Loads and validates the application's configuration file. The analytics
//! engine itself takes an [`AnalysisSettings`] value per run; this crate is
//! where that value comes from when the application starts.

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{AnalysisSettings, Config};

/// Loads the application configuration from the `config.toml` file.
///
/// Settings missing from the file fall back to their defaults (2% risk-free
/// rate, 252 periods per year, 95%/99% VaR, 60-observation rolling window).
/// The loaded settings are validated before being returned.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.analysis.validate()?;

    Ok(config)
}
