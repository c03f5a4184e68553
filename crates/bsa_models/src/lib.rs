//! # bsa_models (L2: Business Logic)
//!
//! European options and the closed-form Black-Scholes core.
//!
//! This crate provides:
//! - Market snapshots consumed by option constructors (`market`)
//! - Standard normal functions and plain-vanilla/digital closed forms (`analytical`)
//! - Option instruments and the shared [`instruments::Valuation`] interface (`instruments`)
//! - The parameter coordinator broadcasting raw inputs onto aligned grids (`coordination`)
//! - Newton and least-squares implied volatility (`implied_vol`)
//!
//! ## Design Principles
//!
//! - **Enum-based option styles** instead of an open hierarchy
//! - **Shape logic isolated in the coordinator**: formulas only ever see one point
//! - **Builder pattern** for options, with the defaults of a classroom contract
//!
//! ## Usage Examples
//!
//! ```rust
//! use bsa_models::coordination::{OutputFormat, QueryParams};
//! use bsa_models::instruments::{EuropeanOption, Valuation};
//! use bsa_models::market::MarketEnvironment;
//!
//! let market = MarketEnvironment::default();
//! let call = EuropeanOption::plain_vanilla(&market).strike(95.0).build().unwrap();
//!
//! let query = QueryParams::new()
//!     .underlying(vec![80.0, 90.0, 100.0])
//!     .time(vec!["19-07-2020", "19-10-2020"])
//!     .output(OutputFormat::Labeled);
//! let surface = call.price(&query).unwrap();
//! assert_eq!(surface.shape(), (2, 3));
//! assert!(surface.labels().is_some());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod coordination;
pub mod implied_vol;
pub mod instruments;
pub mod market;
