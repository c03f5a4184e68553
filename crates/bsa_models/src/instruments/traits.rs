//! The valuation interface shared by options and portfolios.

use std::fmt;

use bsa_core::types::InputError;

use crate::coordination::{Evaluation, QueryParams};

/// A quantity that can be evaluated over a query grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Terminal payoff at each underlying level.
    Payoff,
    /// Present value.
    Price,
    /// Price less the price frozen at construction.
    PnL,
    /// ∂V/∂S.
    Delta,
    /// -∂V/∂τ, rescaled.
    Theta,
    /// ∂²V/∂S².
    Gamma,
    /// ∂V/∂σ, rescaled.
    Vega,
    /// ∂V/∂r, rescaled.
    Rho,
    /// No-arbitrage upper bound of the price.
    UpperLimit,
    /// No-arbitrage lower bound of the price.
    LowerLimit,
}

impl Metric {
    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Payoff => "payoff",
            Metric::Price => "price",
            Metric::PnL => "PnL",
            Metric::Delta => "delta",
            Metric::Theta => "theta",
            Metric::Gamma => "gamma",
            Metric::Vega => "vega",
            Metric::Rho => "rho",
            Metric::UpperLimit => "upper limit",
            Metric::LowerLimit => "lower limit",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that evaluates metrics over coordinated query parameters.
///
/// Implementors only provide [`evaluate`](Valuation::evaluate); the named
/// metric methods forward to it.
pub trait Valuation {
    /// Failure type; every implementor can report input errors.
    type Error: From<InputError>;

    /// Evaluates `metric` over the grid described by `params`.
    fn evaluate(&self, metric: Metric, params: &QueryParams) -> Result<Evaluation, Self::Error>;

    /// Terminal payoff.
    fn payoff(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Payoff, params)
    }

    /// Present value.
    fn price(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Price, params)
    }

    /// Profit and loss against the initial price.
    fn pnl(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::PnL, params)
    }

    /// Delta.
    fn delta(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Delta, params)
    }

    /// Theta.
    fn theta(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Theta, params)
    }

    /// Gamma.
    fn gamma(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Gamma, params)
    }

    /// Vega.
    fn vega(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Vega, params)
    }

    /// Rho.
    fn rho(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::Rho, params)
    }

    /// Upper price bound.
    fn price_upper_limit(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::UpperLimit, params)
    }

    /// Lower price bound.
    fn price_lower_limit(&self, params: &QueryParams) -> Result<Evaluation, Self::Error> {
        self.evaluate(Metric::LowerLimit, params)
    }
}
