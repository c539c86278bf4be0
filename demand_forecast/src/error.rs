//! Error types for the demand_forecast crate

use demand_math::MathError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the demand_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No historical records for the selected product
    #[error("No historical records available for the selected product")]
    EmptyInput,

    /// Fewer than two full seasonal cycles of history
    #[error(
        "Insufficient data: {n} observations available for seasonal period {m}, two full cycles are required"
    )]
    InsufficientData { n: usize, m: usize },

    /// Numerical failure while fitting the model
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV serialization
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from loading configuration
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
}

impl ForecastError {
    /// Whether the user can recover by changing the selection or parameters
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyInput
                | ForecastError::InsufficientData { .. }
                | ForecastError::ModelFit(_)
        )
    }

    /// A hint to show next to the error message
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ForecastError::EmptyInput => {
                Some("Adjust the filters to select a product with demand history.".to_string())
            }
            ForecastError::InsufficientData { n, m } if *n < 2 => Some(format!(
                "Pick a product with at least {} months of history.",
                2 * m
            )),
            ForecastError::InsufficientData { n, m } => Some(format!(
                "Reduce the seasonal period length to at most {} or pick a product with at least {} months of history.",
                n / 2,
                2 * m
            )),
            ForecastError::ModelFit(_) => Some(
                "Please check your data and parameters. Constant or incomplete demand histories cannot be modeled."
                    .to_string(),
            ),
            ForecastError::InvalidParameter(_) => {
                Some("Horizon must be 1-24, smoothing level 0.01-1.0 and seasonal period 1-12.".to_string())
            }
            _ => None,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ModelFit(err.to_string())
    }
}
