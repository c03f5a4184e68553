//! Option instruments.
//!
//! - [`OptionType`], [`OptionStyle`]: Call/put and plain-vanilla/digital
//! - [`EuropeanOption`]: An option frozen on a market snapshot
//! - [`Valuation`], [`Metric`]: The query interface shared with portfolios

mod option;
mod payoff;
mod traits;

pub use option::{EuropeanOption, OptionBuilder, DEFAULT_EXPIRY, DEFAULT_STRIKE};
pub use payoff::{OptionStyle, OptionType};
pub use traits::{Metric, Valuation};
