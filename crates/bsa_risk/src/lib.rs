//! # bsa_risk (L3: Aggregation)
//!
//! Linear option portfolios and a finite-difference cross-check of the
//! closed-form Greeks.
//!
//! This crate provides:
//! - [`portfolio::Portfolio`]: signed positions in European options, valued
//!   through the same [`Valuation`](bsa_models::instruments::Valuation)
//!   interface as a single option
//! - [`numerical_greeks::NumericalGreeks`]: central differences of the price
//!   of any valued object
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              bsa_risk (L3)              │
//! ├─────────────────────────────────────────┤
//! │  portfolio/        - Portfolio, errors  │
//! │  numerical_greeks  - bump and revalue   │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             bsa_models (L2)             │
//! │  Options, coordinator, closed forms     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use bsa_models::coordination::QueryParams;
//! use bsa_models::instruments::{EuropeanOption, OptionType, Valuation};
//! use bsa_models::market::MarketEnvironment;
//! use bsa_risk::portfolio::Portfolio;
//!
//! let market = MarketEnvironment::default();
//! let long_call = EuropeanOption::plain_vanilla(&market).strike(90.0).build().unwrap();
//! let short_call = EuropeanOption::plain_vanilla(&market).strike(110.0).build().unwrap();
//!
//! let mut spread = Portfolio::new("Bull Spread");
//! spread.add_instrument(long_call, 1.0).unwrap();
//! spread.add_instrument(short_call, -1.0).unwrap();
//!
//! let payoff = spread
//!     .payoff(&QueryParams::new().underlying(vec![80.0, 100.0, 130.0]))
//!     .unwrap();
//! assert_eq!(payoff.values().row(0).to_vec(), vec![0.0, 10.0, 20.0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod numerical_greeks;
pub mod portfolio;

pub use numerical_greeks::NumericalGreeks;
pub use portfolio::{Portfolio, PortfolioError, Position};
