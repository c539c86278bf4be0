//! Forecast summaries, export tables and model information

use crate::engine::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::models::{AccuracyMetrics, TrainedForecastModel};
use crate::utils::{round_to_tenth, sanitize_file_component};
use chrono::NaiveDate;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One exported forecast row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Forecast")]
    pub forecast: f64,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Product Description")]
    pub product_description: String,
}

/// Descriptive statistics of the forecast values, rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ForecastStatistics {
    /// Mean, minimum and maximum of `values`, each rounded to one decimal
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Cannot summarize an empty forecast".to_string(),
            ));
        }

        Ok(Self {
            mean: round_to_tenth(Statistics::mean(values)),
            min: round_to_tenth(Statistics::min(values)),
            max: round_to_tenth(Statistics::max(values)),
        })
    }
}

/// The user-facing forecast package
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub product_id: String,
    pub product_description: String,
    pub periods: usize,
    pub statistics: ForecastStatistics,
    pub rows: Vec<ForecastRow>,
}

impl ForecastSummary {
    /// Export file name, e.g. `forecast_P001_Blue_Widget.csv`
    pub fn file_name(&self) -> String {
        format!(
            "forecast_{}_{}.csv",
            sanitize_file_component(&self.product_id),
            sanitize_file_component(&self.product_description)
        )
    }

    /// Write the rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// The CSV export as a string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ForecastError::DataError(format!("Export is not valid UTF-8: {}", e)))
    }

    /// Write the CSV export into `dir` under [`ForecastSummary::file_name`]
    pub fn save_csv<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        let file = File::create(&path)?;
        self.write_csv(file)?;
        info!(path = %path.display(), rows = self.rows.len(), "saved forecast export");
        Ok(path)
    }

    /// Serialize the summary as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Results: {} | {}", self.product_id, self.product_description)?;
        writeln!(f, "  Forecast Periods:  {}", self.periods)?;
        writeln!(f, "  Average Forecast:  {:.1}", self.statistics.mean)?;
        writeln!(f, "  Min Forecast:      {:.1}", self.statistics.min)?;
        writeln!(f, "  Max Forecast:      {:.1}", self.statistics.max)?;
        for row in &self.rows {
            writeln!(f, "  {}  {:>10.2}", row.date, row.forecast)?;
        }
        Ok(())
    }
}

/// Packages a [`ForecastResult`] for display and export
#[derive(Debug, Default, Clone, Copy)]
pub struct ForecastSummarizer;

impl ForecastSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        result: &ForecastResult,
        product_id: &str,
        product_description: &str,
    ) -> Result<ForecastSummary> {
        let statistics = ForecastStatistics::from_values(result.forecast_values())?;

        let rows = result
            .iter()
            .map(|(date, forecast)| ForecastRow {
                date,
                forecast,
                product_id: product_id.to_string(),
                product_description: product_description.to_string(),
            })
            .collect();

        Ok(ForecastSummary {
            product_id: product_id.to_string(),
            product_description: product_description.to_string(),
            periods: result.horizon(),
            statistics,
            rows,
        })
    }
}

/// Description of the fitted model for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub smoothing_level: f64,
    pub trend_smoothing: f64,
    pub seasonal_smoothing: f64,
    pub seasonal_periods: usize,
    pub data_points: usize,
    pub horizon: usize,
    pub accuracy: Option<AccuracyMetrics>,
}

impl ModelInfo {
    pub fn from_result(result: &ForecastResult) -> Self {
        let model = result.model();
        Self {
            model_type: "Exponential Smoothing (Holt-Winters)".to_string(),
            smoothing_level: result.parameters().smoothing_level(),
            trend_smoothing: model.beta(),
            seasonal_smoothing: model.gamma(),
            seasonal_periods: model.seasonal_period(),
            data_points: result.source_series().len(),
            horizon: result.horizon(),
            accuracy: model.in_sample_accuracy(),
        }
    }
}

impl std::fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model Information:")?;
        writeln!(f, "  Model Type:            {}", self.model_type)?;
        writeln!(f, "  Smoothing Level (α):   {}", self.smoothing_level)?;
        writeln!(f, "  Trend Smoothing (β):   {:.4}", self.trend_smoothing)?;
        writeln!(f, "  Seasonal Smoothing (γ): {:.4}", self.seasonal_smoothing)?;
        writeln!(f, "  Seasonal Periods:      {}", self.seasonal_periods)?;
        writeln!(f, "  Trend Component:       Additive")?;
        writeln!(f, "  Seasonal Component:    Additive")?;
        writeln!(f, "  Data Points Used:      {}", self.data_points)?;
        writeln!(f, "  Forecast Horizon:      {} months", self.horizon)?;
        if let Some(accuracy) = &self.accuracy {
            write!(f, "{}", accuracy)?;
        }
        Ok(())
    }
}
