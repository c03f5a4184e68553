//! Finite-difference Greeks.
//!
//! Every Greek is estimated by bumping one coordinated parameter of the
//! price query and revaluing:
//!
//! - delta ≈ (V(S+ε) − V(S−ε)) / 2ε
//! - gamma ≈ (V(S+ε) − 2V(S) + V(S−ε)) / ε²
//! - vega  ≈ (V(σ+ε) − V(σ−ε)) / 2ε, rescaled
//! - theta ≈ −(V(τ+ε) − V(τ−ε)) / 2ε, rescaled
//! - rho   ≈ (V(r+ε) − V(r−ε)) / 2ε, rescaled
//!
//! Bumps are applied after coordination, so labels, date inputs and
//! multi-horizon portfolios behave exactly as in the unbumped query.
//! Cells within ε of expiry are not meaningful.

use bsa_core::config::{AnalyticsConfig, Rescaling};
use bsa_core::types::Parameter;
use bsa_models::coordination::{Evaluation, QueryParams};
use bsa_models::instruments::Valuation;

/// Default bump size.
pub const DEFAULT_STEP: f64 = 1e-4;

/// Central-difference Greeks of any [`Valuation`].
///
/// Rescaling mirrors the closed-form Greeks, so both can be compared cell
/// by cell.
///
/// # Examples
/// ```
/// use bsa_models::coordination::QueryParams;
/// use bsa_models::instruments::{EuropeanOption, Valuation};
/// use bsa_models::market::MarketEnvironment;
/// use bsa_risk::NumericalGreeks;
///
/// let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
///     .build()
///     .unwrap();
/// let query = QueryParams::new().underlying(vec![90.0, 100.0]);
///
/// let numeric = NumericalGreeks::new(&option).delta(&query).unwrap();
/// let analytic = option.delta(&query).unwrap();
/// for (n, a) in numeric.values().iter().zip(analytic.values()) {
///     assert!((n - a).abs() < 1e-6);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NumericalGreeks<'a, V> {
    target: &'a V,
    step: f64,
    rescaling: Rescaling,
}

impl<'a, V: Valuation> NumericalGreeks<'a, V> {
    /// Step [`DEFAULT_STEP`] and the default rescaling.
    pub fn new(target: &'a V) -> Self {
        Self {
            target,
            step: DEFAULT_STEP,
            rescaling: Rescaling::default(),
        }
    }

    /// Step and rescaling taken from `config`.
    pub fn from_config(target: &'a V, config: &AnalyticsConfig) -> Self {
        Self {
            target,
            step: config.finite_difference_step,
            rescaling: config.rescaling(),
        }
    }

    /// Overrides the bump size ε.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Overrides the rescaling factors.
    pub fn with_rescaling(mut self, rescaling: Rescaling) -> Self {
        self.rescaling = rescaling;
        self
    }

    /// Bump size ε.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Rescaling factors.
    pub fn rescaling(&self) -> Rescaling {
        self.rescaling
    }

    fn bumped(
        &self,
        params: &QueryParams,
        parameter: Parameter,
        amount: f64,
    ) -> Result<Evaluation, V::Error> {
        self.target.price(&params.clone().shifted(parameter, amount))
    }

    fn central(
        &self,
        params: &QueryParams,
        parameter: Parameter,
        factor: f64,
    ) -> Result<Evaluation, V::Error> {
        let mut up = self.bumped(params, parameter, self.step)?;
        let down = self.bumped(params, parameter, -self.step)?;
        up.scaled_add(-1.0, &down)?;
        Ok(up.scaled(factor / (2.0 * self.step)))
    }

    /// ∂V/∂S.
    pub fn delta(&self, params: &QueryParams) -> Result<Evaluation, V::Error> {
        self.central(params, Parameter::Underlying, 1.0)
    }

    /// ∂²V/∂S².
    pub fn gamma(&self, params: &QueryParams) -> Result<Evaluation, V::Error> {
        let mut total = self.bumped(params, Parameter::Underlying, self.step)?;
        let mid = self.target.price(params)?;
        let down = self.bumped(params, Parameter::Underlying, -self.step)?;
        total.scaled_add(-2.0, &mid)?;
        total.scaled_add(1.0, &down)?;
        Ok(total.scaled(1.0 / (self.step * self.step)))
    }

    /// Rescaled ∂V/∂σ.
    pub fn vega(&self, params: &QueryParams) -> Result<Evaluation, V::Error> {
        let scale = params.scale_override().unwrap_or(self.rescaling.vega);
        self.central(params, Parameter::Volatility, scale)
    }

    /// Rescaled −∂V/∂τ.
    pub fn theta(&self, params: &QueryParams) -> Result<Evaluation, V::Error> {
        let scale = params.scale_override().unwrap_or(self.rescaling.theta);
        self.central(params, Parameter::Time, -scale)
    }

    /// Rescaled ∂V/∂r.
    pub fn rho(&self, params: &QueryParams) -> Result<Evaluation, V::Error> {
        let scale = params.scale_override().unwrap_or(self.rescaling.rho);
        self.central(params, Parameter::Rate, scale)
    }
}
