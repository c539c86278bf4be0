//! Box-bounded Nelder-Mead minimization on top of `argmin`
//!
//! Used to estimate smoothing coefficients by minimizing in-sample error.
//! Bounds are applied by clamping inside the cost function, and coordinates
//! whose bounds have zero width are held fixed instead of searched. The
//! search is deterministic: the starting simplex is derived from the initial
//! point only.

use crate::{MathError, Result};
use argmin::core::{CostFunction, Error as ArgminError, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;

/// Cost reported for points where the objective is not finite
const LARGE_COST: f64 = 1e30;

/// Tuning knobs for the simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations
    pub max_iter: u64,
    /// Stop once the standard deviation of the simplex costs falls below this
    pub tolerance: f64,
    /// Offset of the initial simplex vertices from the starting point
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-10,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex search
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found, inside the bounds
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: u64,
    /// Whether the tolerance was reached before `max_iter`
    pub converged: bool,
}

/// The objective restricted to the free coordinates of a box
struct BoxedProblem<'a, F> {
    objective: &'a F,
    bounds: &'a [(f64, f64)],
    fixed: &'a [f64],
    free: &'a [usize],
}

/// Full point for the given free coordinates, clamped into the box
fn expand(bounds: &[(f64, f64)], fixed: &[f64], free: &[usize], free_values: &[f64]) -> Vec<f64> {
    let mut point = fixed.to_vec();
    for (&i, &v) in free.iter().zip(free_values) {
        let (lo, hi) = bounds[i];
        point[i] = v.max(lo).min(hi);
    }
    point
}

impl<'a, F> BoxedProblem<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, point: &[f64]) -> f64 {
        let value = (self.objective)(point);
        if value.is_finite() {
            value
        } else {
            LARGE_COST
        }
    }
}

impl<'a, F> CostFunction for BoxedProblem<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        Ok(self.evaluate(&expand(self.bounds, self.fixed, self.free, param)))
    }
}

/// Minimize `objective` starting from `initial`, keeping every coordinate
/// inside `bounds` (one `(min, max)` pair per dimension).
///
/// Non-finite objective values are treated as worse than any finite value.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: &[(f64, f64)],
    config: &NelderMeadConfig,
) -> Result<NelderMeadResult>
where
    F: Fn(&[f64]) -> f64,
{
    if bounds.len() != initial.len() {
        return Err(MathError::InvalidInput(format!(
            "Expected {} bounds, got {}",
            initial.len(),
            bounds.len()
        )));
    }
    if let Some((lo, hi)) = bounds.iter().find(|(lo, hi)| !(lo <= hi)) {
        return Err(MathError::InvalidInput(format!(
            "Invalid bounds [{}, {}]",
            lo, hi
        )));
    }

    let start: Vec<f64> = initial
        .iter()
        .zip(bounds)
        .map(|(&x, &(lo, hi))| x.max(lo).min(hi))
        .collect();
    let free: Vec<usize> = (0..bounds.len())
        .filter(|&i| bounds[i].1 > bounds[i].0)
        .collect();

    let problem = BoxedProblem {
        objective: &objective,
        bounds,
        fixed: &start,
        free: &free,
    };

    if free.is_empty() {
        return Ok(NelderMeadResult {
            value: problem.evaluate(&start),
            point: start,
            iterations: 0,
            converged: true,
        });
    }

    let origin: Vec<f64> = free.iter().map(|&i| start[i]).collect();
    let mut simplex = vec![origin.clone()];
    for (k, &i) in free.iter().enumerate() {
        // Step away from the nearer bound so the vertex stays inside the box
        let mut vertex = origin.clone();
        if vertex[k] + config.initial_step <= bounds[i].1 {
            vertex[k] += config.initial_step;
        } else {
            vertex[k] -= config.initial_step;
        }
        simplex.push(vertex);
    }

    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(config.tolerance)
        .map_err(|e| MathError::InvalidInput(e.to_string()))?;

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(config.max_iter))
        .run()
        .map_err(|e| MathError::CalculationError(e.to_string()))?;

    let state = result.state();
    let best = state.get_best_param().cloned().unwrap_or(origin);
    let converged = matches!(
        state.get_termination_reason(),
        Some(TerminationReason::SolverConverged)
    );
    let iterations = state.get_iter();

    let point = expand(bounds, &start, &free, &best);
    let value = objective(&point);

    Ok(NelderMeadResult {
        value: if value.is_finite() { value } else { f64::INFINITY },
        point,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_minimum() {
        let result = nelder_mead(
            |x| (x[0] - 0.2).powi(2) + (x[1] - 0.7).powi(2),
            &[0.5, 0.5],
            &[(0.0, 1.0), (0.0, 1.0)],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert!((result.point[0] - 0.2).abs() < 1e-3);
        assert!((result.point[1] - 0.7).abs() < 1e-3);
    }

    #[test]
    fn test_respects_bounds() {
        // Unconstrained minimum at (2, -1) lies outside the box
        let result = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
            &[0.5, 0.5],
            &[(0.0, 1.0), (0.0, 1.0)],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(result.point.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!((result.point[0] - 1.0).abs() < 1e-3);
        assert!(result.point[1].abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_bound() {
        // Second coordinate is pinned by a zero-width box
        let result = nelder_mead(
            |x| (x[0] - 0.4).powi(2) + x[1],
            &[0.1, 0.0],
            &[(0.0, 1.0), (0.0, 0.0)],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert_eq!(result.point[1], 0.0);
        assert!((result.point[0] - 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_all_coordinates_pinned() {
        let result = nelder_mead(|x| x[0] + 1.0, &[0.5], &[(0.0, 0.0)], &NelderMeadConfig::default())
            .unwrap();

        assert_eq!(result.point, vec![0.0]);
        assert_eq!(result.value, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_non_finite_objective() {
        let result = nelder_mead(
            |x| if x[0] > 0.5 { f64::NAN } else { (x[0] - 0.3).powi(2) },
            &[0.1],
            &[(0.0, 1.0)],
            &NelderMeadConfig::default(),
        )
        .unwrap();

        assert!(result.value.is_finite());
        assert!((result.point[0] - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_bounds() {
        let config = NelderMeadConfig::default();
        assert!(nelder_mead(|x| x[0], &[0.5], &[(1.0, 0.0)], &config).is_err());
        assert!(nelder_mead(|x| x[0], &[0.5, 0.5], &[(0.0, 1.0)], &config).is_err());
    }

    #[test]
    fn test_deterministic() {
        let objective = |x: &[f64]| (x[0] - 0.33).powi(2) + 2.0 * (x[1] - 0.66).powi(2);
        let bounds = [(0.0, 1.0), (0.0, 1.0)];
        let config = NelderMeadConfig::default();
        let a = nelder_mead(objective, &[0.1, 0.1], &bounds, &config).unwrap();
        let b = nelder_mead(objective, &[0.1, 0.1], &bounds, &config).unwrap();

        assert_eq!(a.point, b.point);
        assert_eq!(a.iterations, b.iterations);
    }
}
