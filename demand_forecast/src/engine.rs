//! Forecast requests: build the series, fit, forecast and date the output
//!
//! Every request recomputes from scratch; nothing is cached between calls and
//! no fitted state is shared between requests.

use crate::data::HistoricalRecord;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, HoltWinters, TrainedForecastModel, TrainedHoltWinters};
use crate::series::{TimeSeries, TimeSeriesBuilder};
use crate::utils::forecast_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

/// Per-request forecast settings
///
/// Deserialization goes through [`ForecastParameters::new`], so every
/// instance satisfies the range checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastParameters {
    horizon: usize,
    smoothing_level: f64,
    seasonal_period_length: usize,
}

impl<'de> Deserialize<'de> for ForecastParameters {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            horizon: usize,
            smoothing_level: f64,
            seasonal_period_length: usize,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.horizon, raw.smoothing_level, raw.seasonal_period_length)
            .map_err(serde::de::Error::custom)
    }
}

impl ForecastParameters {
    pub const MAX_HORIZON: usize = 24;
    pub const MIN_SMOOTHING_LEVEL: f64 = 0.01;
    pub const MAX_SMOOTHING_LEVEL: f64 = 1.0;
    pub const MAX_SEASONAL_PERIOD: usize = 12;

    /// Validate and bundle the three request parameters
    pub fn new(horizon: usize, smoothing_level: f64, seasonal_period_length: usize) -> Result<Self> {
        if horizon == 0 || horizon > Self::MAX_HORIZON {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon must be between 1 and {}, got {}",
                Self::MAX_HORIZON,
                horizon
            )));
        }
        if !(Self::MIN_SMOOTHING_LEVEL..=Self::MAX_SMOOTHING_LEVEL).contains(&smoothing_level) {
            return Err(ForecastError::InvalidParameter(format!(
                "Smoothing level must be between {} and {}, got {}",
                Self::MIN_SMOOTHING_LEVEL,
                Self::MAX_SMOOTHING_LEVEL,
                smoothing_level
            )));
        }
        if seasonal_period_length == 0 || seasonal_period_length > Self::MAX_SEASONAL_PERIOD {
            return Err(ForecastError::InvalidParameter(format!(
                "Seasonal period length must be between 1 and {}, got {}",
                Self::MAX_SEASONAL_PERIOD,
                seasonal_period_length
            )));
        }

        Ok(Self {
            horizon,
            smoothing_level,
            seasonal_period_length,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn smoothing_level(&self) -> f64 {
        self.smoothing_level
    }

    pub fn seasonal_period_length(&self) -> usize {
        self.seasonal_period_length
    }
}

/// Outcome of one successful forecast request
#[derive(Debug, Clone)]
pub struct ForecastResult {
    forecast_dates: Vec<NaiveDate>,
    forecast_values: Vec<f64>,
    model: TrainedHoltWinters,
    source_series: TimeSeries,
    parameters: ForecastParameters,
}

impl ForecastResult {
    /// Month-end dates of the forecast periods
    pub fn forecast_dates(&self) -> &[NaiveDate] {
        &self.forecast_dates
    }

    /// Point forecasts, index-aligned with [`ForecastResult::forecast_dates`]
    pub fn forecast_values(&self) -> &[f64] {
        &self.forecast_values
    }

    /// The fitted model, with in-sample fitted values and coefficients
    pub fn model(&self) -> &TrainedHoltWinters {
        &self.model
    }

    pub fn source_series(&self) -> &TimeSeries {
        &self.source_series
    }

    pub fn parameters(&self) -> &ForecastParameters {
        &self.parameters
    }

    pub fn horizon(&self) -> usize {
        self.forecast_values.len()
    }

    /// Iterate over `(date, forecast)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.forecast_dates
            .iter()
            .copied()
            .zip(self.forecast_values.iter().copied())
    }
}

/// Runs forecast requests
#[derive(Debug, Default, Clone, Copy)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fit the model to `series` and forecast `horizon` periods
    ///
    /// A single attempt; on failure no values are produced.
    pub fn fit_and_forecast(
        &self,
        series: &TimeSeries,
        parameters: &ForecastParameters,
    ) -> Result<(Vec<f64>, TrainedHoltWinters)> {
        let model = HoltWinters::new(
            parameters.smoothing_level(),
            parameters.seasonal_period_length(),
        )?;
        debug!(
            product_id = series.product_id(),
            observations = series.len(),
            model = model.name(),
            "fitting model"
        );

        let trained = model.train(series)?;
        let values = trained.forecast(parameters.horizon())?;
        Ok((values, trained))
    }

    /// Fit, forecast and date a forecast for an already built series
    pub fn forecast_series(
        &self,
        series: TimeSeries,
        parameters: ForecastParameters,
    ) -> Result<ForecastResult> {
        let outcome = self
            .fit_and_forecast(&series, &parameters)
            .and_then(|(values, model)| {
                let dates = forecast_dates(series.last_date(), values.len())?;
                Ok((dates, values, model))
            });

        match outcome {
            Ok((forecast_dates, forecast_values, model)) => {
                info!(
                    product_id = series.product_id(),
                    horizon = forecast_values.len(),
                    beta = model.beta(),
                    gamma = model.gamma(),
                    "forecast generated"
                );
                Ok(ForecastResult {
                    forecast_dates,
                    forecast_values,
                    model,
                    source_series: series,
                    parameters,
                })
            }
            Err(err) => {
                warn!(product_id = series.product_id(), error = %err, "forecast failed");
                Err(err)
            }
        }
    }

    /// Build the series from one product's records and forecast it
    pub fn forecast_records(
        &self,
        records: &[HistoricalRecord],
        parameters: ForecastParameters,
    ) -> Result<ForecastResult> {
        let series = TimeSeriesBuilder::new().build(records)?;
        self.forecast_series(series, parameters)
    }
}
