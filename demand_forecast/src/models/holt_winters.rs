//! Additive Holt-Winters model with a caller-pinned level coefficient
//!
//! Only the level smoothing coefficient (alpha) is supplied; the trend
//! (beta) and seasonal (gamma) coefficients are estimated by minimizing the
//! in-sample one-step-ahead squared error. Gamma is bounded by `1 - alpha`.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::series::TimeSeries;
use demand_math::{nelder_mead, sum_squared_errors, NelderMeadConfig, TripleExponentialSmoothing};
use statrs::statistics::Statistics;
use tracing::{debug, warn};

/// Starting point of the coefficient search
const INITIAL_BETA: f64 = 0.1;
const INITIAL_GAMMA: f64 = 0.1;

/// Relative spread (range over largest magnitude) at or below which a
/// series is treated as constant
const MIN_RELATIVE_SPREAD: f64 = 1e-12;

/// Holt-Winters model (additive trend, additive season)
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Name of the model
    name: String,
    /// Level smoothing coefficient
    alpha: f64,
    /// Length of one seasonal cycle
    seasonal_period: usize,
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    /// Name of the model
    name: String,
    /// Smoother holding the final level, trend and seasonal indices
    smoother: TripleExponentialSmoothing,
    /// One-step-ahead fitted values, aligned with the series
    fitted: Vec<f64>,
    /// Residuals after the seeding cycle
    residuals: Vec<f64>,
    /// Sum of squared residuals
    sse: f64,
    /// Number of observations trained on
    observations: usize,
}

impl HoltWinters {
    /// Create a new model with a fixed level coefficient
    pub fn new(alpha: f64, seasonal_period: usize) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Smoothing level must be in (0, 1], got {}",
                alpha
            )));
        }
        if seasonal_period == 0 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal period must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters (additive, alpha={}, m={})", alpha, seasonal_period),
            alpha,
            seasonal_period,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    /// Reject series the model cannot be fit on
    fn check_series(&self, values: &[f64]) -> Result<()> {
        let n = values.len();
        let m = self.seasonal_period;
        if n < 2 * m {
            return Err(ForecastError::InsufficientData { n, m });
        }

        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "Series contains a non-finite value at observation {}",
                pos + 1
            )));
        }

        let spread = Statistics::max(values) - Statistics::min(values);
        if spread <= MIN_RELATIVE_SPREAD * Statistics::abs_max(values) {
            return Err(ForecastError::ModelFit(
                "Series has zero variance; a constant history cannot be modeled".to_string(),
            ));
        }

        Ok(())
    }

    /// Estimate beta and gamma with alpha held fixed
    fn estimate_coefficients(&self, values: &[f64]) -> Result<(f64, f64)> {
        let gamma_max = (1.0 - self.alpha).max(0.0);
        let bounds = [(0.0, 1.0), (0.0, gamma_max)];
        let initial = [INITIAL_BETA, INITIAL_GAMMA.min(gamma_max)];

        let result = nelder_mead(
            |p| {
                sum_squared_errors(values, self.alpha, p[0], p[1], self.seasonal_period)
                    .unwrap_or(f64::INFINITY)
            },
            &initial,
            &bounds,
            &NelderMeadConfig::default(),
        )?;

        if !result.value.is_finite() {
            return Err(ForecastError::ModelFit(
                "Coefficient search did not reach a finite error".to_string(),
            ));
        }
        if !result.converged {
            warn!(
                iterations = result.iterations,
                sse = result.value,
                "coefficient search stopped before converging"
            );
        }

        debug!(
            beta = result.point[0],
            gamma = result.point[1],
            sse = result.value,
            iterations = result.iterations,
            "estimated smoothing coefficients"
        );
        Ok((result.point[0], result.point[1]))
    }
}

impl ForecastModel for HoltWinters {
    type Trained = TrainedHoltWinters;

    fn train(&self, series: &TimeSeries) -> Result<Self::Trained> {
        let values = series.values();
        self.check_series(values)?;

        let (beta, gamma) = self.estimate_coefficients(values)?;
        let mut smoother =
            TripleExponentialSmoothing::new(self.alpha, beta, gamma, self.seasonal_period)?;
        let fitted = smoother.fit(values)?;

        let residuals: Vec<f64> = values
            .iter()
            .zip(fitted.iter())
            .skip(self.seasonal_period)
            .map(|(y, f)| y - f)
            .collect();
        let sse: f64 = residuals.iter().map(|r| r.powi(2)).sum();

        if !sse.is_finite() {
            return Err(ForecastError::ModelFit(
                "Fitted model produced non-finite errors".to_string(),
            ));
        }

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            smoother,
            fitted,
            residuals,
            sse,
            observations: values.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    pub fn alpha(&self) -> f64 {
        self.smoother.alpha()
    }

    /// Estimated trend coefficient
    pub fn beta(&self) -> f64 {
        self.smoother.beta()
    }

    /// Estimated seasonal coefficient
    pub fn gamma(&self) -> f64 {
        self.smoother.gamma()
    }

    pub fn seasonal_period(&self) -> usize {
        self.smoother.period()
    }

    /// Final level
    pub fn level(&self) -> Result<f64> {
        Ok(self.smoother.level()?)
    }

    /// Final trend
    pub fn trend(&self) -> Result<f64> {
        Ok(self.smoother.trend()?)
    }

    /// Final seasonal indices, indexed by position in the cycle
    pub fn seasonals(&self) -> &[f64] {
        self.smoother.seasonals()
    }

    pub fn sse(&self) -> f64 {
        self.sse
    }

    pub fn observations(&self) -> usize {
        self.observations
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let values = (1..=horizon)
            .map(|step| self.smoother.forecast(step))
            .collect::<demand_math::Result<Vec<f64>>>()?;

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(
                "Forecast produced non-finite values".to_string(),
            ));
        }

        Ok(values)
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    fn name(&self) -> &str {
        &self.name
    }
}
