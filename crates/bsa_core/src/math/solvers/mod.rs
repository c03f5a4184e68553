//! Root-finding and least-squares solvers.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: Quadratic convergence using an explicit derivative
//! - [`LevenbergMarquardtSolver`]: Damped least squares with optional box constraints
//!
//! Root finding uses [`SolverConfig`] (tolerance, iteration cap); the
//! least-squares solver uses [`LMConfig`], which adds the damping schedule.

mod config;
mod levenberg_marquardt;
mod newton_raphson;

pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use newton_raphson::NewtonRaphsonSolver;
