//! Sales dataset handling: loading, filtering and per-product lookup
//!
//! The loader expects one observation per month per product and customer;
//! nothing here resamples or fills gaps.

use crate::error::{ForecastError, Result};
use crate::utils::date_parser;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DATE_COLUMN: &str = "Date";
pub const DEMAND_COLUMN: &str = "Demand";
pub const PRODUCT_ID_COLUMN: &str = "Product ID";
pub const DESCRIPTION_COLUMN: &str = "Product Description";
pub const CATEGORY_COLUMN: &str = "Product Category";
pub const CUSTOMER_COLUMN: &str = "Customer Name";
pub const CUSTOMER_CLASS_COLUMN: &str = "Customer Class";

/// One row of observed demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Demand")]
    pub demand: f64,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Product Description")]
    pub product_description: String,
    #[serde(rename = "Product Category")]
    pub category: String,
    #[serde(rename = "Customer Name")]
    pub customer: String,
    #[serde(rename = "Customer Class")]
    pub customer_class: String,
}

/// Loaded sales records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<HistoricalRecord>,
}

/// Data loader for sales extracts
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            products = dataset.product_ids().len(),
            "loaded sales dataset"
        );
        Ok(dataset)
    }

    /// Build a dataset from an existing DataFrame with the standard columns
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
        let dates = Self::text_column(df, DATE_COLUMN)?;
        let demand = Self::numeric_column(df, DEMAND_COLUMN)?;
        let product_ids = Self::text_column(df, PRODUCT_ID_COLUMN)?;
        let descriptions = Self::text_column(df, DESCRIPTION_COLUMN)?;
        let categories = Self::text_column(df, CATEGORY_COLUMN)?;
        let customers = Self::text_column(df, CUSTOMER_COLUMN)?;
        let classes = Self::text_column(df, CUSTOMER_CLASS_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let date = date_parser::parse_date(&dates[row]).map_err(|e| {
                ForecastError::DataError(format!("Row {}: {}", row + 1, e))
            })?;

            if !demand[row].is_finite() {
                warn!(row = row + 1, product_id = %product_ids[row], "non-numeric demand value");
            }

            records.push(HistoricalRecord {
                date,
                demand: demand[row],
                product_id: product_ids[row].clone(),
                product_description: descriptions[row].clone(),
                category: categories[row].clone(),
                customer: customers[row].clone(),
                customer_class: classes[row].clone(),
            });
        }

        Ok(Dataset::new(records))
    }

    /// Build a dataset from records already in memory
    pub fn from_records(records: Vec<HistoricalRecord>) -> Dataset {
        Dataset::new(records)
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name).map_err(|e| {
            ForecastError::DataError(format!("Column '{}' not found: {}", name, e))
        })
    }

    /// Read a column as trimmed text; nulls become empty strings
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
        let text = Self::column(df, name)?.cast(&DataType::Utf8)?;
        Ok(text
            .utf8()?
            .into_iter()
            .map(|v| v.unwrap_or_default().trim().to_string())
            .collect())
    }

    /// Read a column as `f64`; nulls and unparseable cells become NaN
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let numbers = Self::column(df, name)?.cast(&DataType::Float64)?;
        Ok(numbers
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }
}

/// Narrowing criteria; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub customer_class: Option<String>,
}

impl ProductFilter {
    /// A filter that keeps every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn with_customer_class(mut self, customer_class: impl Into<String>) -> Self {
        self.customer_class = Some(customer_class.into());
        self
    }

    /// Whether `record` satisfies every criterion that is set
    pub fn matches(&self, record: &HistoricalRecord) -> bool {
        fn accepts(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().map_or(true, |w| w == actual)
        }

        accepts(&self.category, &record.category)
            && accepts(&self.customer, &record.customer)
            && accepts(&self.customer_class, &record.customer_class)
    }
}

impl Dataset {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `filter`, in their original order
    pub fn filter(&self, filter: &ProductFilter) -> Dataset {
        let records: Vec<HistoricalRecord> = self
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        debug!(?filter, kept = records.len(), total = self.len(), "filtered dataset");
        Dataset::new(records)
    }

    /// Distinct product ids in first-seen order
    pub fn product_ids(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.product_id.as_str()))
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.category.as_str()))
    }

    /// Distinct customer names in first-seen order
    pub fn customers(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.customer.as_str()))
    }

    /// Distinct customer classes in first-seen order
    pub fn customer_classes(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.customer_class.as_str()))
    }

    /// All records of one product
    pub fn product_records(&self, product_id: &str) -> Vec<HistoricalRecord> {
        self.records
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut seen = HashSet::new();
        values
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

/// Memoizes filtered views of one dataset, keyed by filter equality
///
/// Entries are tied to the dataset they were computed from; call
/// [`FilterCache::clear`] when switching datasets.
#[derive(Debug, Default)]
pub struct FilterCache {
    entries: HashMap<ProductFilter, Dataset>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached view for `filter`, computing it on first use
    pub fn get_or_filter(&mut self, dataset: &Dataset, filter: &ProductFilter) -> &Dataset {
        self.entries
            .entry(filter.clone())
            .or_insert_with(|| dataset.filter(filter))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
