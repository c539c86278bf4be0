//! Triple exponential smoothing (additive Holt-Winters)
//!
//! Model equations, with season index `i = t mod m`:
//! - Level: `l_t = α(y_t - s_i) + (1-α)(l_{t-1} + b_{t-1})`
//! - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
//! - Seasonal: `s_i = γ(y_t - l_t) + (1-γ)s_i`
//! - Forecast: `ŷ_{t+h} = l_t + h·b_t + s_{(t+h) mod m}`

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Additive Holt-Winters state machine
///
/// The state is seeded from the first two seasonal cycles of a history and
/// then advanced one observation at a time from the start of the second
/// cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    level: Option<f64>,
    trend: Option<f64>,
    seasonals: Vec<f64>,
    values_seen: usize,
}

impl TripleExponentialSmoothing {
    /// Create a new smoother with the given coefficients and seasonal period
    pub fn new(alpha: f64, beta: f64, gamma: f64, period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Seasonal period must be at least 1".to_string(),
            ));
        }
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(MathError::InvalidInput(format!(
                "Alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(MathError::InvalidInput(format!(
                "Beta must be in [0, 1], got {}",
                beta
            )));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(MathError::InvalidInput(format!(
                "Gamma must be in [0, 1], got {}",
                gamma
            )));
        }

        Ok(Self {
            alpha,
            beta,
            gamma,
            period,
            level: None,
            trend: None,
            seasonals: Vec::new(),
            values_seen: 0,
        })
    }

    /// Seed level, trend and seasonal indices from the first two cycles
    ///
    /// The trend is the average per-step change between the first and second
    /// cycle. The seasonal indices are the first cycle's deviations from its
    /// mean after removing that trend, centered to sum to zero. The level is
    /// the detrended mean carried to the last step of the first cycle, which
    /// then counts as consumed.
    pub fn initialize(&mut self, history: &[f64]) -> Result<()> {
        let m = self.period;
        if history.len() < 2 * m {
            return Err(MathError::InsufficientData(format!(
                "Need at least {} values for seasonal period {}, got {}",
                2 * m,
                m,
                history.len()
            )));
        }

        let first_cycle = &history[..m];
        let mean = first_cycle.iter().sum::<f64>() / m as f64;

        let trend = (0..m)
            .map(|i| (history[m + i] - history[i]) / m as f64)
            .sum::<f64>()
            / m as f64;

        // Position of the cycle mean, measured in steps from its start
        let center = (m as f64 - 1.0) / 2.0;
        let level = mean + center * trend;

        let mut seasonals: Vec<f64> = first_cycle
            .iter()
            .enumerate()
            .map(|(i, y)| y - (mean + (i as f64 - center) * trend))
            .collect();
        let offset = seasonals.iter().sum::<f64>() / m as f64;
        for s in seasonals.iter_mut() {
            *s -= offset;
        }

        self.level = Some(level);
        self.trend = Some(trend);
        self.seasonals = seasonals;
        self.values_seen = m;

        Ok(())
    }

    /// Advance the state with a new observation
    ///
    /// Returns the one-step-ahead prediction that was made for `value`
    /// before the state absorbed it.
    pub fn update(&mut self, value: f64) -> Result<f64> {
        let (prev_level, prev_trend) = match (self.level, self.trend) {
            (Some(level), Some(trend)) => (level, trend),
            _ => {
                return Err(MathError::InsufficientData(
                    "Smoother must be initialized before updating".to_string(),
                ))
            }
        };

        let idx = self.values_seen % self.period;
        let season = self.seasonals[idx];
        let prediction = prev_level + prev_trend + season;

        let level =
            self.alpha * (value - season) + (1.0 - self.alpha) * (prev_level + prev_trend);
        let trend = self.beta * (level - prev_level) + (1.0 - self.beta) * prev_trend;
        self.seasonals[idx] = self.gamma * (value - level) + (1.0 - self.gamma) * season;

        self.level = Some(level);
        self.trend = Some(trend);
        self.values_seen += 1;

        Ok(prediction)
    }

    /// Initialize on `values` and run the recursion over the rest of them
    ///
    /// The returned fitted values line up with `values`; the first cycle is
    /// used for seeding, so its fitted values are the observations themselves.
    pub fn fit(&mut self, values: &[f64]) -> Result<Vec<f64>> {
        self.initialize(values)?;

        let mut fitted = Vec::with_capacity(values.len());
        fitted.extend_from_slice(&values[..self.period]);
        for &value in &values[self.period..] {
            fitted.push(self.update(value)?);
        }

        Ok(fitted)
    }

    /// Forecast `h` steps past the last absorbed observation
    pub fn forecast(&self, h: usize) -> Result<f64> {
        if h == 0 {
            return Err(MathError::InvalidInput(
                "Forecast step must be at least 1".to_string(),
            ));
        }

        match (self.level, self.trend) {
            (Some(level), Some(trend)) => {
                let idx = (self.values_seen + h - 1) % self.period;
                Ok(level + h as f64 * trend + self.seasonals[idx])
            }
            _ => Err(MathError::InsufficientData(
                "Not enough data to make a forecast".to_string(),
            )),
        }
    }

    /// Get the current level
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("Level not calculated yet".to_string())
        })
    }

    /// Get the current trend
    pub fn trend(&self) -> Result<f64> {
        self.trend.ok_or_else(|| {
            MathError::InsufficientData("Trend not calculated yet".to_string())
        })
    }

    /// Seasonal indices, indexed by position in the cycle
    pub fn seasonals(&self) -> &[f64] {
        &self.seasonals
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of observations absorbed, including the seeding cycle
    pub fn values_seen(&self) -> usize {
        self.values_seen
    }

    /// Reset the smoother, clearing all state
    pub fn reset(&mut self) {
        self.level = None;
        self.trend = None;
        self.seasonals.clear();
        self.values_seen = 0;
    }
}

/// In-sample one-step-ahead sum of squared errors
///
/// Errors from the seeding cycle are excluded since its fitted values are the
/// observations themselves.
pub fn sum_squared_errors(
    values: &[f64],
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
) -> Result<f64> {
    let mut smoother = TripleExponentialSmoothing::new(alpha, beta, gamma, period)?;
    let fitted = smoother.fit(values)?;

    Ok(values
        .iter()
        .zip(fitted.iter())
        .skip(period)
        .map(|(y, f)| (y - f).powi(2))
        .sum())
}
