//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// Last calendar day of the month containing `date`
pub fn end_of_month(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .ok_or_else(|| ForecastError::DataError(format!("Date out of range: {}", date)))
}

/// Month-end dates for the `horizon` periods that follow `last_date`
///
/// The first date is the end of the month after `last_date`'s month; each
/// following date is the end of the next month. Series are assumed to be
/// aggregated to one observation per month upstream.
pub fn forecast_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    let month_start = NaiveDate::from_ymd_opt(last_date.year(), last_date.month(), 1)
        .ok_or_else(|| ForecastError::DataError(format!("Date out of range: {}", last_date)))?;

    let mut dates = Vec::with_capacity(horizon);
    for step in 1..=horizon {
        let month = u32::try_from(step)
            .ok()
            .and_then(|s| month_start.checked_add_months(Months::new(s)))
            .ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Forecast date {} months after {} is out of range",
                    step, last_date
                ))
            })?;
        dates.push(end_of_month(month)?);
    }

    Ok(dates)
}

/// Replace every run of non-alphanumeric characters with a single underscore
pub fn sanitize_file_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for c in raw.trim().chars() {
        if c.is_alphanumeric() || c == '-' {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}

/// Round to one decimal place, the precision used for display
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Date parsing for the formats seen in sales extracts
pub mod date_parser {
    use crate::error::{ForecastError, Result};
    use chrono::{NaiveDate, NaiveDateTime};

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Parse a date or date-time string, dropping any time of day
    pub fn parse_date(raw: &str) -> Result<NaiveDate> {
        let raw = raw.trim();

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Ok(date);
            }
        }

        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(datetime.date());
            }
        }

        Err(ForecastError::DataError(format!(
            "Unrecognized date: '{}'",
            raw
        )))
    }
}
