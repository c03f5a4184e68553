//! Names of the market and contract inputs a query may vary.

use std::fmt;

/// A pricing input that can be supplied to a query.
///
/// The declaration order is the canonical axis order used when reporting
/// iterable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    /// Underlying spot level `S`.
    Underlying,
    /// Strike `K`.
    Strike,
    /// Time parameter, either time-to-maturity `tau` or a valuation date.
    Time,
    /// Volatility `sigma`.
    Volatility,
    /// Risk-free rate `r`.
    Rate,
}

impl Parameter {
    /// Short symbol used in labels and messages.
    ///
    /// # Examples
    /// ```
    /// use bsa_core::types::Parameter;
    ///
    /// assert_eq!(Parameter::Volatility.symbol(), "sigma");
    /// ```
    pub fn symbol(&self) -> &'static str {
        match self {
            Parameter::Underlying => "S",
            Parameter::Strike => "K",
            Parameter::Time => "tau",
            Parameter::Volatility => "sigma",
            Parameter::Rate => "r",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
