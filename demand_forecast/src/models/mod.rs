//! Forecasting models for demand series

use crate::error::Result;
use crate::series::TimeSeries;
use serde::Serialize;
use std::fmt::Debug;

/// In-sample error of a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "In-sample Accuracy:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        Ok(())
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// One-step-ahead fitted values, aligned with the training series
    fn fitted_values(&self) -> &[f64];

    /// Residuals over the part of the series the model actually predicted
    fn residuals(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;

    /// MAE and RMSE of the residuals, if there are any
    fn in_sample_accuracy(&self) -> Option<AccuracyMetrics> {
        let residuals = self.residuals();
        if residuals.is_empty() {
            return None;
        }

        let n = residuals.len() as f64;
        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let mse = residuals.iter().map(|r| r.powi(2)).sum::<f64>() / n;

        Some(AccuracyMetrics {
            mae,
            rmse: mse.sqrt(),
        })
    }
}

/// Forecast model that can be trained on a demand series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a time series
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod holt_winters;

pub use holt_winters::{HoltWinters, TrainedHoltWinters};
