//! Numerical routines.
//!
//! - `solvers`: Newton-Raphson root finding and bounded Levenberg-Marquardt least squares

pub mod solvers;
