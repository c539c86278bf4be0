//! # Demand Math
//!
//! Numeric kernels behind demand forecasting.
//! This crate provides the additive triple exponential smoothing recursion
//! (Holt-Winters) and a bounded Nelder-Mead minimizer used to estimate the
//! smoothing coefficients that the caller does not pin.

use thiserror::Error;

pub mod optimization;
pub mod smoothing;

pub use crate::optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use crate::smoothing::{sum_squared_errors, TripleExponentialSmoothing};

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
