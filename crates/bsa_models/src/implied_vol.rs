//! Implied volatility inversion.
//!
//! Two methods are available:
//! - [`ImpliedVolMethod::Newton`]: Newton-Raphson on `price(σ) - target`
//!   using the closed-form vega
//! - [`ImpliedVolMethod::LeastSquares`]: bounded Levenberg-Marquardt
//!   minimisation of `(price(σ) - target)²` inside the configured box
//!
//! Failures never abort a batch: [`ImpliedVolSolver::solve_or_nan`]
//! reports them as NaN.

use tracing::trace;

use bsa_core::config::ImpliedVolConfig;
use bsa_core::math::solvers::{
    LMConfig, LevenbergMarquardtSolver, NewtonRaphsonSolver, SolverConfig,
};
use bsa_core::types::SolverError;

/// Inversion method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImpliedVolMethod {
    /// Newton-Raphson with analytic vega.
    #[default]
    Newton,
    /// Bounded least squares.
    LeastSquares,
}

/// Single-cell implied volatility solver.
///
/// # Examples
/// ```
/// use bsa_core::config::ImpliedVolConfig;
/// use bsa_models::analytical::BlackScholes;
/// use bsa_models::implied_vol::{ImpliedVolMethod, ImpliedVolSolver};
/// use bsa_models::instruments::OptionType;
///
/// let point = BlackScholes::new(100.0, 100.0, 1.0, 0.3, 0.01);
/// let target = point.price(OptionType::Call);
///
/// let solver = ImpliedVolSolver::new(ImpliedVolMethod::Newton, ImpliedVolConfig::default());
/// let sigma = solver
///     .solve(
///         target,
///         |s| point.with_volatility(s).price(OptionType::Call),
///         |s| point.with_volatility(s).vega(),
///     )
///     .unwrap();
/// assert!((sigma - 0.3).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolSolver {
    method: ImpliedVolMethod,
    config: ImpliedVolConfig,
}

impl ImpliedVolSolver {
    /// Creates a solver.
    pub fn new(method: ImpliedVolMethod, config: ImpliedVolConfig) -> Self {
        Self { method, config }
    }

    /// Selected method.
    pub fn method(&self) -> ImpliedVolMethod {
        self.method
    }

    /// Solver settings.
    pub fn config(&self) -> &ImpliedVolConfig {
        &self.config
    }

    /// Solves `price(σ) = target`.
    ///
    /// `vega` is the unscaled derivative ∂price/∂σ. Newton steps with it and
    /// both methods reject a root where it is below `min_vega`.
    ///
    /// # Errors
    /// Any [`SolverError`]; a non-positive root is `NumericalInstability`
    /// and a root with vega below the floor is `DerivativeNearZero`.
    pub fn solve<P, V>(&self, target: f64, price: P, vega: V) -> Result<f64, SolverError>
    where
        P: Fn(f64) -> f64,
        V: Fn(f64) -> f64,
    {
        if !target.is_finite() {
            return Err(SolverError::NumericalInstability(format!(
                "target price {} is not finite",
                target
            )));
        }
        let sigma = match self.method {
            ImpliedVolMethod::Newton => self.newton(target, &price, &vega)?,
            ImpliedVolMethod::LeastSquares => self.least_squares(target, &price)?,
        };
        // a flat price admits any volatility as a root
        if !(vega(sigma).abs() >= self.config.min_vega) {
            return Err(SolverError::DerivativeNearZero { x: sigma });
        }
        Ok(sigma)
    }

    /// As [`solve`](Self::solve), with every failure mapped to NaN.
    pub fn solve_or_nan<P, V>(&self, target: f64, price: P, vega: V) -> f64
    where
        P: Fn(f64) -> f64,
        V: Fn(f64) -> f64,
    {
        match self.solve(target, price, vega) {
            Ok(sigma) => sigma,
            Err(e) => {
                trace!(target, method = ?self.method, error = %e, "implied volatility failed");
                f64::NAN
            }
        }
    }

    fn newton<P, V>(&self, target: f64, price: P, vega: V) -> Result<f64, SolverError>
    where
        P: Fn(f64) -> f64,
        V: Fn(f64) -> f64,
    {
        let cfg = &self.config;
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(cfg.tolerance, cfg.max_iterations))
            .with_derivative_floor(cfg.min_vega);
        let sigma = solver.find_root(|s| price(s) - target, vega, cfg.initial_guess)?;
        if sigma > 0.0 {
            Ok(sigma)
        } else {
            Err(SolverError::NumericalInstability(format!(
                "non-positive volatility {}",
                sigma
            )))
        }
    }

    fn least_squares<P>(&self, target: f64, price: P) -> Result<f64, SolverError>
    where
        P: Fn(f64) -> f64,
    {
        let cfg = &self.config;
        let solver =
            LevenbergMarquardtSolver::new(LMConfig::new(cfg.tolerance, cfg.max_iterations));
        let result = solver.solve_bounded(
            |params: &[f64]| {
                vec![params.first().map_or(f64::NAN, |&s| price(s) - target)]
            },
            vec![cfg.initial_guess],
            &[cfg.lower_bound],
            &[cfg.upper_bound],
        )?;

        let residual = result.residual_norm();
        match result.params.first() {
            Some(&sigma) if result.converged && residual <= cfg.tolerance.sqrt() => Ok(sigma),
            _ => Err(SolverError::NoProgress { residual }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytical::BlackScholes;
    use crate::instruments::OptionType;
    use approx::assert_abs_diff_eq;

    fn solve(method: ImpliedVolMethod, point: BlackScholes, ty: OptionType) -> f64 {
        let target = point.price(ty);
        ImpliedVolSolver::new(method, ImpliedVolConfig::default()).solve_or_nan(
            target,
            |s| point.with_volatility(s).price(ty),
            |s| point.with_volatility(s).vega(),
        )
    }

    #[test]
    fn test_newton_round_trip() {
        for &(s, sigma) in &[(100.0, 0.2), (90.0, 0.45), (115.0, 0.15)] {
            let point = BlackScholes::new(s, 100.0, 0.8, sigma, 0.02);
            for ty in [OptionType::Call, OptionType::Put] {
                assert_abs_diff_eq!(solve(ImpliedVolMethod::Newton, point, ty), sigma, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_least_squares_round_trip() {
        for &(s, sigma) in &[(100.0, 0.2), (90.0, 0.45), (115.0, 0.15)] {
            let point = BlackScholes::new(s, 100.0, 0.8, sigma, 0.02);
            assert_abs_diff_eq!(
                solve(ImpliedVolMethod::LeastSquares, point, OptionType::Call),
                sigma,
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_unreachable_target_is_nan() {
        let point = BlackScholes::new(100.0, 100.0, 1.0, 0.2, 0.01);
        let solver = ImpliedVolSolver::new(ImpliedVolMethod::LeastSquares, ImpliedVolConfig::default());
        // a call can never be worth more than the underlying
        let sigma = solver.solve_or_nan(
            150.0,
            |s| point.with_volatility(s).price(OptionType::Call),
            |s| point.with_volatility(s).vega(),
        );
        assert!(sigma.is_nan());
    }

    #[test]
    fn test_degenerate_vega_is_error() {
        let solver = ImpliedVolSolver::new(ImpliedVolMethod::Newton, ImpliedVolConfig::default());
        let err = solver.solve(1.0, |_| 0.5, |_| 0.0).unwrap_err();
        assert!(matches!(err, SolverError::DerivativeNearZero { .. }));
    }

    #[test]
    fn test_flat_price_at_seed_is_error() {
        // the seed already matches the target, but vega vanishes there
        for method in [ImpliedVolMethod::Newton, ImpliedVolMethod::LeastSquares] {
            let solver = ImpliedVolSolver::new(method, ImpliedVolConfig::default());
            let err = solver.solve(0.0, |_| 0.0, |_| 0.0).unwrap_err();
            assert!(matches!(err, SolverError::DerivativeNearZero { .. }));
        }
    }

    #[test]
    fn test_deep_out_of_the_money_is_nan() {
        let point = BlackScholes::new(50.0, 100.0, 0.05, 0.1, 0.01);
        let target = point.price(OptionType::Call);
        assert!(target < 1e-100);
        for method in [ImpliedVolMethod::Newton, ImpliedVolMethod::LeastSquares] {
            assert!(solve(method, point, OptionType::Call).is_nan());
        }
    }

    #[test]
    fn test_non_finite_target() {
        let solver = ImpliedVolSolver::new(ImpliedVolMethod::Newton, ImpliedVolConfig::default());
        assert!(solver.solve(f64::NAN, |s| s, |_| 1.0).is_err());
    }
}
