//! Cash-or-nothing digital closed forms.
//!
//! With D = Q·e^(-rτ):
//! - call price = D·Φ(d₂), put price = D - call (parity)
//! - put delta, gamma and vega are the negated call values
//! - put theta and rho carry the derivative of the parity constant D

use super::black_scholes::BlackScholes;
use super::distributions::{norm_cdf, norm_pdf};
use crate::instruments::OptionType;

impl BlackScholes {
    /// `Q·1[S > K]` for calls, `Q·1[S <= K]` for puts.
    #[inline]
    pub fn digital_payoff(&self, option_type: OptionType, cash: f64) -> f64 {
        let call_pays = self.spot > self.strike;
        match option_type {
            OptionType::Call if call_pays => cash,
            OptionType::Put if !call_pays => cash,
            _ => 0.0,
        }
    }

    /// Digital price; the put follows from parity.
    pub fn digital_price(&self, option_type: OptionType, cash: f64) -> f64 {
        let discounted_cash = cash * self.discount_factor();
        let (_, d2) = self.d1_d2();
        let call = discounted_cash * norm_cdf(d2);
        match option_type {
            OptionType::Call => call,
            OptionType::Put => discounted_cash - call,
        }
    }

    fn sign(option_type: OptionType) -> f64 {
        if option_type.is_call() {
            1.0
        } else {
            -1.0
        }
    }

    /// ∂V/∂S = ±D·φ(d₂) / (S·σ·√τ).
    pub fn digital_delta(&self, option_type: OptionType, cash: f64) -> f64 {
        let (_, d2) = self.d1_d2();
        let call = cash * self.discount_factor() * norm_pdf(d2)
            / (self.spot * self.volatility * self.tau.sqrt());
        Self::sign(option_type) * call
    }

    /// ∂²V/∂S² = ∓D·φ(d₂)·d₁ / (S²·σ²·τ).
    pub fn digital_gamma(&self, option_type: OptionType, cash: f64) -> f64 {
        let (d1, d2) = self.d1_d2();
        let s_sigma = self.spot * self.volatility;
        let call = -cash * self.discount_factor() * norm_pdf(d2) * d1 / (s_sigma * s_sigma * self.tau);
        Self::sign(option_type) * call
    }

    /// ∂V/∂σ = ∓D·φ(d₂)·d₁ / σ.
    pub fn digital_vega(&self, option_type: OptionType, cash: f64) -> f64 {
        let (d1, d2) = self.d1_d2();
        let call = -cash * self.discount_factor() * norm_pdf(d2) * d1 / self.volatility;
        Self::sign(option_type) * call
    }

    /// -∂V/∂τ per year.
    pub fn digital_theta(&self, option_type: OptionType, cash: f64) -> f64 {
        let (_, d2) = self.d1_d2();
        let discounted_cash = cash * self.discount_factor();
        let sigma = self.volatility;
        // ∂d₂/∂τ
        let d2_dtau = ((self.rate - 0.5 * sigma * sigma) * self.tau
            - (self.spot / self.strike).ln())
            / (2.0 * sigma * self.tau.powf(1.5));
        let call = discounted_cash * (self.rate * norm_cdf(d2) - norm_pdf(d2) * d2_dtau);
        match option_type {
            OptionType::Call => call,
            OptionType::Put => self.rate * discounted_cash - call,
        }
    }

    /// ∂V/∂r.
    pub fn digital_rho(&self, option_type: OptionType, cash: f64) -> f64 {
        let (_, d2) = self.d1_d2();
        let discounted_cash = cash * self.discount_factor();
        let sqrt_t = self.tau.sqrt();
        let call = discounted_cash
            * (norm_pdf(d2) * sqrt_t / self.volatility - self.tau * norm_cdf(d2));
        match option_type {
            OptionType::Call => call,
            OptionType::Put => -call - self.tau * discounted_cash,
        }
    }

    /// Q·e^(-rτ) for both calls and puts.
    #[inline]
    pub fn digital_upper_limit(&self, cash: f64) -> f64 {
        cash * self.discount_factor()
    }
}
