//! # Demand Forecast
//!
//! Monthly demand forecasting for product sales histories.
//!
//! ## Features
//!
//! - Sales extract loading from CSV (Polars) with category, customer and class filters
//! - Additive Holt-Winters model with automatic trend and seasonal smoothing
//! - Month-end forecast dating, summary statistics and CSV/JSON export
//! - Product paging over a filtered dataset
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::{DataLoader, ForecastEngine, ForecastParameters, ForecastSummarizer};
//! use demand_forecast::ProductFilter;
//!
//! # fn main() -> demand_forecast::error::Result<()> {
//! let dataset = DataLoader::from_csv("data/sample_data.csv")?;
//! let tools = dataset.filter(&ProductFilter::all().with_category("Tools"));
//!
//! let product_id = &tools.product_ids()[0];
//! let records = tools.product_records(product_id);
//!
//! let params = ForecastParameters::new(6, 0.3, 12)?;
//! let result = ForecastEngine::new().forecast_records(&records, params)?;
//!
//! let summary = ForecastSummarizer::new().summarize(
//!     &result,
//!     product_id,
//!     &records[0].product_description,
//! )?;
//! println!("{}", summary);
//! summary.save_csv(".")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod models;
pub mod navigation;
pub mod series;
pub mod summary;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::data::{DataLoader, Dataset, FilterCache, HistoricalRecord, ProductFilter};
pub use crate::engine::{ForecastEngine, ForecastParameters, ForecastResult};
pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, HoltWinters, TrainedForecastModel, TrainedHoltWinters};
pub use crate::navigation::{ProductOverview, ProductSelection};
pub use crate::series::{TimeSeries, TimeSeriesBuilder};
pub use crate::summary::{ForecastSummarizer, ForecastSummary, ModelInfo};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
