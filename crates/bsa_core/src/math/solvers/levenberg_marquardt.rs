//! Levenberg-Marquardt nonlinear least-squares solver with box constraints.
//!
//! Each iteration solves the damped normal equations
//!
//! ```text
//! (J^T J + λI) δ = -J^T r
//! p_{n+1} = clamp(p_n + δ, lower, upper)
//! ```
//!
//! with a forward-difference Jacobian. Steps that do not reduce the sum of
//! squares are rejected and the damping `λ` is raised.
//!
//! # Example
//!
//! ```
//! use bsa_core::math::solvers::LevenbergMarquardtSolver;
//!
//! // Minimise (p - 3)^2 subject to 0 <= p <= 2
//! let solver = LevenbergMarquardtSolver::with_defaults();
//! let result = solver
//!     .solve_bounded(|p: &[f64]| vec![p[0] - 3.0], vec![1.0], &[0.0], &[2.0])
//!     .unwrap();
//! assert!((result.params[0] - 2.0).abs() < 1e-12);
//! ```

use crate::types::SolverError;

/// Configuration for [`LevenbergMarquardtSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig {
    /// Stop when the residual norm drops below this value.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Starting damping factor.
    pub initial_lambda: f64,
    /// Damping multiplier after a rejected step.
    pub lambda_up: f64,
    /// Damping multiplier after an accepted step.
    pub lambda_down: f64,
    /// Damping floor.
    pub min_lambda: f64,
    /// Damping ceiling.
    pub max_lambda: f64,
    /// Stop when the relative parameter step drops below this value.
    pub param_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-10,
            max_lambda: 1e10,
            param_tolerance: 1e-12,
        }
    }
}

impl LMConfig {
    /// Default damping schedule with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }
}

/// Outcome of a least-squares solve.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final parameters.
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub residual_ss: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// True if a stopping criterion was met before the cap.
    pub converged: bool,
    /// Damping factor at exit.
    pub final_lambda: f64,
}

impl LMResult {
    /// Euclidean norm of the final residual vector.
    pub fn residual_norm(&self) -> f64 {
        self.residual_ss.sqrt()
    }
}

/// Levenberg-Marquardt solver.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Creates a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LMConfig::default())
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Unconstrained minimisation of `sum(residuals(p)^2)`.
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n = initial_params.len();
        let lower = vec![f64::NEG_INFINITY; n];
        let upper = vec![f64::INFINITY; n];
        self.solve_bounded(residuals, initial_params, &lower, &upper)
    }

    /// Minimises `sum(residuals(p)^2)` with `lower <= p <= upper` elementwise.
    ///
    /// The starting point is clamped into the box first. A result is returned
    /// even when the cap is reached; check `converged` and the residual.
    ///
    /// # Errors
    ///
    /// `SolverError::NumericalInstability` for empty inputs, mismatched bound
    /// lengths, an inverted box, or a non-finite starting residual.
    pub fn solve_bounded<F>(
        &self,
        residuals: F,
        initial_params: Vec<f64>,
        lower: &[f64],
        upper: &[f64],
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }
        if lower.len() != n_params || upper.len() != n_params {
            return Err(SolverError::NumericalInstability(
                "Bounds do not match parameter count".to_string(),
            ));
        }
        if lower.iter().zip(upper).any(|(lo, hi)| !(lo <= hi)) {
            return Err(SolverError::NumericalInstability(
                "Lower bound exceeds upper bound".to_string(),
            ));
        }

        let mut params = project(&initial_params, lower, upper);
        let mut lambda = self.config.initial_lambda;
        let mut r = residuals(&params);
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty residual vector".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Residual is not finite at the starting point".to_string(),
            ));
        }

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let jacobian = compute_jacobian(&residuals, &params, &r, lower, upper);
            let Some(delta) = solve_normal_equations(&jacobian, &r, lambda, n_params) else {
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                continue;
            };

            let trial: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial = project(&trial, lower, upper);

            // Measure the step after projection so a step blocked by a bound counts as stalled.
            let step = params
                .iter()
                .zip(&trial)
                .map(|(a, b)| (b - a) * (b - a))
                .sum::<f64>()
                .sqrt();
            let scale = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if step / scale < self.config.param_tolerance {
                return Ok(self.result(params, ss, iteration, true, lambda));
            }

            let trial_r = residuals(&trial);
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss < ss {
                params = trial;
                r = trial_r;
                ss = trial_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
            } else {
                if lambda >= self.config.max_lambda {
                    return Ok(self.result(params, ss, iteration, false, lambda));
                }
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
            }
        }

        Ok(self.result(params, ss, self.config.max_iterations, false, lambda))
    }

    fn result(
        &self,
        params: Vec<f64>,
        residual_ss: f64,
        iterations: usize,
        converged: bool,
        final_lambda: f64,
    ) -> LMResult {
        LMResult {
            params,
            residual_ss,
            iterations,
            converged,
            final_lambda,
        }
    }
}

fn project(params: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    params
        .iter()
        .zip(lower.iter().zip(upper))
        .map(|(p, (lo, hi))| p.max(*lo).min(*hi))
        .collect()
}

/// Forward differences, stepping backwards where the forward point leaves the box.
fn compute_jacobian<F>(
    residuals: &F,
    params: &[f64],
    r0: &[f64],
    lower: &[f64],
    upper: &[f64],
) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n_params = params.len();
    let n_residuals = r0.len();
    let mut jacobian = vec![vec![0.0; n_params]; n_residuals];

    for j in 0..n_params {
        let mut h = 1e-8 * params[j].abs().max(1.0);
        if params[j] + h > upper[j] && params[j] - h >= lower[j] {
            h = -h;
        }
        let mut shifted = params.to_vec();
        shifted[j] += h;
        let r_shifted = residuals(&shifted);

        for (row, (rs, r)) in jacobian.iter_mut().zip(r_shifted.iter().zip(r0)) {
            row[j] = (rs - r) / h;
        }
    }

    jacobian
}

fn solve_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let mut jtj = vec![vec![0.0; n_params]; n_params];
    let mut jtr = vec![0.0; n_params];

    for (row, r) in jacobian.iter().zip(residuals) {
        for i in 0..n_params {
            jtr[i] -= row[i] * r;
            for j in 0..n_params {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, diag) in jtj.iter_mut().enumerate() {
        diag[i] += lambda;
    }

    solve_cholesky(&jtj, &jtr)
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Solves `A x = b` for symmetric positive definite `A`.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if !(sum > 0.0) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
