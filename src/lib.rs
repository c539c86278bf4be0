//! # Demand Owl
//!
//! Umbrella crate for the demand forecasting workspace.
//!
//! - [`forecast`]: dataset loading, the forecast engine, summaries and export
//! - [`math`]: the smoothing recursion and coefficient search underneath
//!
//! ## Example
//!
//! ```
//! use demand_owl_workspace::forecast::{ForecastEngine, ForecastParameters, TimeSeries};
//! use chrono::NaiveDate;
//!
//! let dates: Vec<NaiveDate> = (1..=12)
//!     .map(|m| NaiveDate::from_ymd_opt(2023, m, 1).unwrap())
//!     .chain((1..=12).map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap()))
//!     .collect();
//! let values = (0..24).map(|i| 80.0 + (i % 4) as f64 * 5.0 + i as f64).collect();
//! let series = TimeSeries::new("P001", dates, values).unwrap();
//!
//! let params = ForecastParameters::new(3, 0.3, 4).unwrap();
//! let result = ForecastEngine::new().forecast_series(series, params).unwrap();
//! assert_eq!(result.forecast_values().len(), 3);
//! assert_eq!(
//!     result.forecast_dates()[0],
//!     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
//! );
//! ```

pub use demand_forecast as forecast;
pub use demand_math as math;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
