//! # bsa_core: Foundation for Black-Scholes Analytics
//!
//! ## Layer 1 (Foundation) Role
//!
//! bsa_core is the bottom layer of the workspace, providing:
//! - Time types: [`types::Date`] in the fixed `dd-mm-YYYY` format and time-to-maturity helpers (`types::time`)
//! - Error types: `InputError`, `DateError`, `SolverError` and the `ErrorKind` taxonomy (`types::error`)
//! - Raw query inputs and their type/shape classification (`input`)
//! - Newton-Raphson and bounded Levenberg-Marquardt solvers (`math::solvers`)
//! - Layered configuration from defaults, TOML and environment (`config`)
//! - Tracing subscriber bootstrap (`logging`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other bsa_* crates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use bsa_core::input::{homogenize_numeric, RawInput, Values};
//! use bsa_core::types::{time_to_maturity, Date, Parameter};
//!
//! let t = Date::parse("19-04-2020").unwrap();
//! let expiry = Date::parse("31-12-2020").unwrap();
//! assert!(time_to_maturity(t, expiry) > 0.7);
//!
//! let spot: RawInput = vec![100.0, 80.0].into();
//! let spot = homogenize_numeric(&spot, Parameter::Underlying).unwrap();
//! assert_eq!(spot, Values::Vector(vec![80.0, 100.0]));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod input;
pub mod logging;
pub mod math;
pub mod types;
