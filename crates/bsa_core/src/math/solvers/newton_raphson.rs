//! Newton-Raphson root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Newton-Raphson solver using an explicit derivative.
///
/// Iterates `x_{n+1} = x_n - f(x_n) / f'(x_n)` until `|f(x)|` drops below
/// the configured tolerance.
///
/// # Example
///
/// ```
/// use bsa_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let root = solver.find_root(|x: f64| x * x - 2.0, |x: f64| 2.0 * x, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
    derivative_floor: T,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Creates a solver with the given configuration and a derivative floor of 1e-30.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self {
            config,
            derivative_floor: T::from(1e-30).unwrap_or_else(T::min_positive_value),
        }
    }

    /// Creates a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    /// Treats any `|f'(x)|` below `floor` as degenerate.
    pub fn with_derivative_floor(mut self, floor: T) -> Self {
        self.derivative_floor = floor;
        self
    }

    /// Finds a root of `f` starting from `x0`.
    ///
    /// # Errors
    ///
    /// - `SolverError::DerivativeNearZero` if `|f'(x)|` falls below the floor
    /// - `SolverError::NumericalInstability` if an iterate is not finite
    /// - `SolverError::MaxIterationsExceeded` if the cap is reached
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let mut x = x0;

        for _ in 0..self.config.max_iterations {
            let f_val = f(x);
            if !f_val.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "objective is not finite".to_string(),
                ));
            }
            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);
            if !(f_prime_val.abs() >= self.derivative_floor) {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            x = x - f_val / f_prime_val;

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_two() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let root = solver
            .find_root(|x| x * x - 2.0, |x| 2.0 * x, 1.0)
            .unwrap();
        assert_relative_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_already_at_root() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let root = solver.find_root(|x| x - 3.0, |_| 1.0, 3.0).unwrap();
        assert_eq!(root, 3.0);
    }

    #[test]
    fn test_zero_derivative() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let result = solver.find_root(|x| x * x + 1.0, |x| 2.0 * x, 0.0);
        assert!(matches!(result, Err(SolverError::DerivativeNearZero { .. })));
    }

    #[test]
    fn test_derivative_floor() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults().with_derivative_floor(10.0);
        let result = solver.find_root(|x| x - 1.0, |_| 1.0, 0.0);
        assert!(matches!(result, Err(SolverError::DerivativeNearZero { .. })));
    }

    #[test]
    fn test_max_iterations() {
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12_f64, 3));
        // x^2 + 1 has no real root
        let result = solver.find_root(|x| x * x + 1.0, |x| 2.0 * x, 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_nan_objective() {
        let solver = NewtonRaphsonSolver::<f64>::with_defaults();
        let result = solver.find_root(|_| f64::NAN, |_| 1.0, 1.0);
        assert!(matches!(result, Err(SolverError::NumericalInstability(_))));
    }
}
