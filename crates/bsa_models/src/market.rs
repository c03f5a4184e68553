//! Market snapshot consumed by option constructors.

use std::fmt;

use bsa_core::types::Date;

/// Immutable snapshot of spot, valuation date, rate and volatility.
///
/// # Examples
/// ```
/// use bsa_models::market::MarketEnvironment;
///
/// let market = MarketEnvironment::default();
/// assert_eq!(market.spot(), 90.0);
/// assert_eq!(market.to_string(), "[S_t=90.0, r=5.0%, sigma=20.0%, t=19-04-2020]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketEnvironment {
    spot: f64,
    valuation_date: Date,
    rate: f64,
    volatility: f64,
}

impl MarketEnvironment {
    /// Creates a snapshot.
    pub fn new(spot: f64, valuation_date: Date, rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            valuation_date,
            rate,
            volatility,
        }
    }

    /// Current underlying level S_t.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Valuation date t.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Continuously compounded risk-free rate r.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility σ.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

impl Default for MarketEnvironment {
    fn default() -> Self {
        Self {
            spot: 90.0,
            valuation_date: Date::from_ymd(2020, 4, 19).unwrap_or(Date::MIN),
            rate: 0.05,
            volatility: 0.2,
        }
    }
}

impl fmt::Display for MarketEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[S_t={:.1}, r={:.1}%, sigma={:.1}%, t={}]",
            self.spot,
            self.rate * 100.0,
            self.volatility * 100.0,
            self.valuation_date
        )
    }
}
