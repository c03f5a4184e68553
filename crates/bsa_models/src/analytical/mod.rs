//! Closed-form Black-Scholes analytics.
//!
//! This module provides:
//! - [`norm_cdf`], [`norm_pdf`]: Standard normal distribution
//! - [`BlackScholes`]: A parameter point with plain-vanilla and digital
//!   prices, payoffs, bounds and Greeks

mod black_scholes;
mod digital;
mod distributions;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
