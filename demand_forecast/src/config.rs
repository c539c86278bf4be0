//! Application settings for the forecasting launcher
//!
//! Sources, later ones overriding earlier ones: built-in defaults, an
//! optional `demand_owl` config file, then `DEMAND_OWL__*` environment
//! variables (e.g. `DEMAND_OWL__FORECAST__HORIZON=12`).

use crate::data::ProductFilter;
use crate::engine::ForecastParameters;
use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub forecast: ForecastDefaults,
    #[serde(default)]
    pub filter: ProductFilter,
    #[serde(default)]
    pub product_index: usize,
}

/// Initial values of the forecast controls
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ForecastDefaults {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_smoothing_level")]
    pub smoothing_level: f64,
    #[serde(default = "default_seasonal_periods")]
    pub seasonal_periods: usize,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/sample_data.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_horizon() -> usize {
    6
}

fn default_smoothing_level() -> f64 {
    0.3
}

fn default_seasonal_periods() -> usize {
    12
}

impl Default for ForecastDefaults {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            smoothing_level: default_smoothing_level(),
            seasonal_periods: default_seasonal_periods(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_dir: default_output_dir(),
            forecast: ForecastDefaults::default(),
            filter: ProductFilter::default(),
            product_index: 0,
        }
    }
}

impl AppConfig {
    /// Load from the `demand_owl` file (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("demand_owl")
    }

    /// Load from a named config file (extension optional) and the environment
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(file_stem).required(false))
            .add_source(::config::Environment::with_prefix("DEMAND_OWL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The configured defaults as validated request parameters
    pub fn forecast_parameters(&self) -> Result<ForecastParameters> {
        ForecastParameters::new(
            self.forecast.horizon,
            self.forecast.smoothing_level,
            self.forecast.seasonal_periods,
        )
    }
}
