//! Option type and style definitions.

use std::fmt;
use std::str::FromStr;

use bsa_core::types::InputError;

/// Right conferred by the option.
///
/// # Examples
/// ```
/// use bsa_models::instruments::OptionType;
///
/// let t: OptionType = "Put".parse().unwrap();
/// assert_eq!(t, OptionType::Put);
/// assert_eq!(t.to_string(), "put");
/// assert!("straddle".parse::<OptionType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptionType {
    /// Right to buy.
    #[default]
    Call,
    /// Right to sell.
    Put,
}

impl OptionType {
    /// Returns true for calls.
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl FromStr for OptionType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            _ => Err(InputError::UnknownOptionType(s.to_string())),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payoff family of a European option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionStyle {
    /// `max(S - K, 0)` for calls, `max(K - S, 0)` for puts.
    PlainVanilla,
    /// Cash-or-nothing: pays `cash_amount` on the winning side of the strike.
    Digital {
        /// Cash payout Q.
        cash_amount: f64,
    },
}

impl OptionStyle {
    /// Digital style paying 1.0.
    pub fn digital() -> Self {
        OptionStyle::Digital { cash_amount: 1.0 }
    }

    /// Cash payout for digitals, `None` for plain vanillas.
    pub fn cash_amount(&self) -> Option<f64> {
        match self {
            OptionStyle::PlainVanilla => None,
            OptionStyle::Digital { cash_amount } => Some(*cash_amount),
        }
    }

    /// Short label used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            OptionStyle::PlainVanilla => "Plain Vanilla",
            OptionStyle::Digital { .. } => "CON",
        }
    }

    /// Textual payoff formula.
    pub fn payoff_description(&self, option_type: OptionType) -> &'static str {
        match (self, option_type) {
            (OptionStyle::PlainVanilla, OptionType::Call) => "Payoff: max(S-K, 0)",
            (OptionStyle::PlainVanilla, OptionType::Put) => "Payoff: max(K-S, 0)",
            (OptionStyle::Digital { .. }, OptionType::Call) => "Payoff: Q I(S > K)",
            (OptionStyle::Digital { .. }, OptionType::Put) => "Payoff: Q I(S <= K)",
        }
    }

    /// Textual no-arbitrage upper bound.
    pub fn upper_limit_description(&self, option_type: OptionType) -> &'static str {
        match (self, option_type) {
            (OptionStyle::PlainVanilla, OptionType::Call) => "Upper limit: S_t",
            (OptionStyle::PlainVanilla, OptionType::Put) => "Upper limit: K e^(-r tau)",
            (OptionStyle::Digital { .. }, _) => "Upper limit: Q e^(-r tau)",
        }
    }

    /// Textual no-arbitrage lower bound.
    pub fn lower_limit_description(&self, option_type: OptionType) -> &'static str {
        match (self, option_type) {
            (OptionStyle::PlainVanilla, OptionType::Call) => {
                "Lower limit: max(S_t - K e^(-r tau), 0)"
            }
            (OptionStyle::PlainVanilla, OptionType::Put) => {
                "Lower limit: max(K e^(-r tau) - S_t, 0)"
            }
            (OptionStyle::Digital { .. }, _) => "Lower limit: 0",
        }
    }
}
