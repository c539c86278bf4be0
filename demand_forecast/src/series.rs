//! Date-indexed demand series for a single product

use crate::data::HistoricalRecord;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Demand observations for one product, strictly ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    product_id: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from parallel date and value vectors
    ///
    /// Dates must be strictly increasing.
    pub fn new(product_id: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }
        if dates.is_empty() {
            return Err(ForecastError::EmptyInput);
        }
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ForecastError::DataError(format!(
                "Dates must be strictly increasing: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            product_id: product_id.into(),
            dates,
            values,
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last observed date; a built series is never empty
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Iterate over `(date, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Turns one product's records into a [`TimeSeries`]
///
/// Records sharing a date are merged by summing their demand, so a product
/// bought by several customers in the same month yields its total demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeSeriesBuilder;

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Sort, merge and index the records of a single product
    pub fn build(&self, records: &[HistoricalRecord]) -> Result<TimeSeries> {
        let first = records.first().ok_or(ForecastError::EmptyInput)?;
        let product_id = first.product_id.as_str();

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            if record.product_id != product_id {
                return Err(ForecastError::DataError(format!(
                    "Records for product '{}' mixed with product '{}'",
                    product_id, record.product_id
                )));
            }
            *by_date.entry(record.date).or_insert(0.0) += record.demand;
        }

        let merged = records.len() - by_date.len();
        if merged > 0 {
            debug!(product_id, merged, "summed demand for duplicate dates");
        }

        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = by_date.into_iter().unzip();
        debug!(product_id, observations = values.len(), "built time series");

        TimeSeries::new(product_id, dates, values)
    }
}
