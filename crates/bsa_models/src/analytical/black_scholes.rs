//! Black-Scholes closed forms for European plain-vanilla options.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·Φ(d₁) - K·e^(-rτ)·Φ(d₂)
//! **Put Price**: P = C + K·e^(-rτ) - S (put-call parity)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)τ) / (σ√τ)
//! - d₂ = d₁ - σ√τ
//!
//! Every formula assumes τ > 0. Terminal cells (τ = 0) are routed to the
//! payoff and the expiry limits by the coordinated evaluation layer.

use super::distributions::{norm_cdf, norm_pdf};
use crate::instruments::OptionType;

/// One point of the Black-Scholes parameter space.
///
/// # Examples
/// ```
/// use bsa_models::analytical::BlackScholes;
/// use bsa_models::instruments::OptionType;
///
/// let bs = BlackScholes::new(100.0, 100.0, 1.0, 0.2, 0.01);
/// let call = bs.price(OptionType::Call);
/// let put = bs.price(OptionType::Put);
///
/// // Put-call parity: C - P = S - K*exp(-rτ)
/// let parity = call - put - (100.0 - 100.0 * (-0.01_f64).exp());
/// assert!(parity.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Underlying level (S)
    pub spot: f64,
    /// Strike (K)
    pub strike: f64,
    /// Time-to-maturity in years (τ)
    pub tau: f64,
    /// Volatility (σ)
    pub volatility: f64,
    /// Risk-free rate (r)
    pub rate: f64,
}

impl BlackScholes {
    /// Creates a parameter point.
    #[inline]
    pub fn new(spot: f64, strike: f64, tau: f64, volatility: f64, rate: f64) -> Self {
        Self {
            spot,
            strike,
            tau,
            volatility,
            rate,
        }
    }

    /// Copy of `self` with a different volatility.
    #[inline]
    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Returns `(d₁, d₂)`.
    #[inline]
    pub fn d1_d2(&self) -> (f64, f64) {
        let vol_sqrt_t = self.volatility * self.tau.sqrt();
        let log_moneyness = (self.spot / self.strike).ln();
        let drift = (self.rate + 0.5 * self.volatility * self.volatility) * self.tau;
        let d1 = (log_moneyness + drift) / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// Discount factor e^(-rτ).
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.tau).exp()
    }

    /// `max(S - K, 0)` or `max(K - S, 0)`.
    #[inline]
    pub fn payoff(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => (self.spot - self.strike).max(0.0),
            OptionType::Put => (self.strike - self.spot).max(0.0),
        }
    }

    /// Option price; the put always follows from parity.
    pub fn price(&self, option_type: OptionType) -> f64 {
        let discounted_strike = self.strike * self.discount_factor();
        let call = if self.spot == 0.0 {
            0.0
        } else {
            let (d1, d2) = self.d1_d2();
            self.spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2)
        };
        match option_type {
            OptionType::Call => call,
            OptionType::Put => call + discounted_strike - self.spot,
        }
    }

    /// ∂V/∂S: Φ(d₁) for calls, Φ(d₁) - 1 for puts.
    pub fn delta(&self, option_type: OptionType) -> f64 {
        let (d1, _) = self.d1_d2();
        match option_type {
            OptionType::Call => norm_cdf(d1),
            OptionType::Put => norm_cdf(d1) - 1.0,
        }
    }

    /// ∂²V/∂S²: φ(d₁) / (S·σ·√τ), equal for calls and puts.
    pub fn gamma(&self) -> f64 {
        let (d1, _) = self.d1_d2();
        norm_pdf(d1) / (self.spot * self.volatility * self.tau.sqrt())
    }

    /// -∂V/∂τ per year.
    pub fn theta(&self, option_type: OptionType) -> f64 {
        let (d1, d2) = self.d1_d2();
        let decay = -self.spot * self.volatility * norm_pdf(d1) / (2.0 * self.tau.sqrt());
        let carry = self.rate * self.strike * self.discount_factor();
        match option_type {
            OptionType::Call => decay - carry * norm_cdf(d2),
            OptionType::Put => decay + carry * norm_cdf(-d2),
        }
    }

    /// ∂V/∂σ: S·√τ·φ(d₁), equal for calls and puts.
    pub fn vega(&self) -> f64 {
        let (d1, _) = self.d1_d2();
        self.spot * self.tau.sqrt() * norm_pdf(d1)
    }

    /// ∂V/∂r.
    pub fn rho(&self, option_type: OptionType) -> f64 {
        let (_, d2) = self.d1_d2();
        let k_t_df = self.tau * self.strike * self.discount_factor();
        match option_type {
            OptionType::Call => k_t_df * norm_cdf(d2),
            OptionType::Put => -k_t_df * norm_cdf(-d2),
        }
    }

    /// No-arbitrage upper bound: S for calls, K·e^(-rτ) for puts.
    pub fn upper_limit(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.spot,
            OptionType::Put => self.strike * self.discount_factor(),
        }
    }

    /// No-arbitrage lower bound: the discounted intrinsic value.
    pub fn lower_limit(&self, option_type: OptionType) -> f64 {
        let discounted_strike = self.strike * self.discount_factor();
        match option_type {
            OptionType::Call => (self.spot - discounted_strike).max(0.0),
            OptionType::Put => (discounted_strike - self.spot).max(0.0),
        }
    }

    /// Delta at τ = 0: the slope of the payoff.
    pub fn expiry_delta(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call if self.spot > self.strike => 1.0,
            OptionType::Put if self.spot < self.strike => -1.0,
            _ => 0.0,
        }
    }
}
