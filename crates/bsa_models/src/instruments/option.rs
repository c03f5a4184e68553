//! European plain-vanilla and digital options.
//!
//! An option freezes a market snapshot at construction. Every query
//! parameter left unset falls back to that snapshot, and the price at the
//! snapshot is kept as the reference for profit and loss.

use std::fmt;

use ndarray::{Array2, Zip};
use tracing::debug;

use bsa_core::config::{ImpliedVolConfig, Rescaling};
use bsa_core::input::{to_datetime, RawInput, Values};
use bsa_core::types::{
    expiry_from_time_to_maturity, time_to_maturity, Date, InputError, Parameter,
};

use super::payoff::{OptionStyle, OptionType};
use super::traits::{Metric, Valuation};
use crate::coordination::{coordinate, CoordinatedParameters, Evaluation, QueryParams, Snapshot};
use crate::implied_vol::{ImpliedVolMethod, ImpliedVolSolver};
use crate::market::MarketEnvironment;

/// Expiry used when none is given.
pub const DEFAULT_EXPIRY: &str = "31-12-2020";

/// Strike used when none is given.
pub const DEFAULT_STRIKE: f64 = 100.0;

fn scalar_date(raw: &RawInput) -> Result<Date, InputError> {
    match to_datetime(raw)? {
        Values::Scalar(date) => Ok(date),
        Values::Vector(_) => Err(InputError::UnrecognisedType {
            parameter: Parameter::Time,
            found: "collection",
        }),
    }
}

/// Builder for [`EuropeanOption`].
#[derive(Debug, Clone)]
pub struct OptionBuilder {
    market: MarketEnvironment,
    style: OptionStyle,
    option_type: OptionType,
    strike: f64,
    expiry: Option<RawInput>,
    tau: Option<f64>,
    rescaling: Rescaling,
}

impl OptionBuilder {
    fn new(market: &MarketEnvironment, style: OptionStyle) -> Self {
        Self {
            market: *market,
            style,
            option_type: OptionType::default(),
            strike: DEFAULT_STRIKE,
            expiry: None,
            tau: None,
            rescaling: Rescaling::default(),
        }
    }

    /// Call or put.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Strike K.
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = strike;
        self
    }

    /// Expiry date T, as a [`Date`] or `dd-mm-YYYY` text.
    pub fn expiry(mut self, expiry: impl Into<RawInput>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Time-to-maturity τ in years; the expiry is derived from it.
    pub fn time_to_maturity(mut self, tau: f64) -> Self {
        self.tau = Some(tau);
        self
    }

    /// Cash payout Q. Ignored for plain vanillas.
    pub fn cash_amount(mut self, cash_amount: f64) -> Self {
        if let OptionStyle::Digital { .. } = self.style {
            self.style = OptionStyle::Digital { cash_amount };
        }
        self
    }

    /// Greek rescaling factors.
    pub fn rescaling(mut self, rescaling: Rescaling) -> Self {
        self.rescaling = rescaling;
        self
    }

    /// Builds the option and freezes its initial price.
    ///
    /// # Errors
    /// - `MultipleTimeParameters` when both expiry and time-to-maturity are set
    /// - Format and type errors from the expiry
    pub fn build(self) -> Result<EuropeanOption, InputError> {
        let valuation_date = self.market.valuation_date();
        let (expiry, tau) = match (self.expiry, self.tau) {
            (Some(_), Some(_)) => {
                return Err(InputError::MultipleTimeParameters {
                    found: vec!["expiry", "time_to_maturity"],
                })
            }
            (Some(raw), None) => {
                let expiry = scalar_date(&raw)?;
                (expiry, time_to_maturity(valuation_date, expiry))
            }
            (None, Some(tau)) => (expiry_from_time_to_maturity(valuation_date, tau), tau),
            (None, None) => {
                let expiry = Date::parse(DEFAULT_EXPIRY)?;
                (expiry, time_to_maturity(valuation_date, expiry))
            }
        };

        let mut option = EuropeanOption {
            style: self.style,
            option_type: self.option_type,
            strike: self.strike,
            spot: self.market.spot(),
            valuation_date,
            expiry,
            tau,
            rate: self.market.rate(),
            volatility: self.market.volatility(),
            rescaling: self.rescaling,
            initial_price: f64::NAN,
        };
        option.initial_price = option
            .evaluate(Metric::Price, &QueryParams::new())?
            .scalar()
            .unwrap_or(f64::NAN);

        debug!(
            option = %option.info(),
            initial_price = option.initial_price,
            "option constructed"
        );
        Ok(option)
    }
}

/// A European option on one underlying, plain-vanilla or cash-or-nothing.
///
/// # Examples
/// ```
/// use bsa_models::coordination::QueryParams;
/// use bsa_models::instruments::{EuropeanOption, OptionType, Valuation};
/// use bsa_models::market::MarketEnvironment;
///
/// let market = MarketEnvironment::default();
/// let put = EuropeanOption::plain_vanilla(&market)
///     .option_type(OptionType::Put)
///     .strike(95.0)
///     .build()
///     .unwrap();
///
/// let prices = put.price(&QueryParams::new().underlying(vec![80.0, 90.0, 100.0])).unwrap();
/// assert_eq!(prices.shape(), (1, 3));
/// assert!(prices.values()[[0, 0]] > prices.values()[[0, 2]]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EuropeanOption {
    style: OptionStyle,
    option_type: OptionType,
    strike: f64,
    spot: f64,
    valuation_date: Date,
    expiry: Date,
    tau: f64,
    rate: f64,
    volatility: f64,
    rescaling: Rescaling,
    initial_price: f64,
}

impl EuropeanOption {
    /// Starts a plain-vanilla option on `market`.
    pub fn plain_vanilla(market: &MarketEnvironment) -> OptionBuilder {
        OptionBuilder::new(market, OptionStyle::PlainVanilla)
    }

    /// Starts a cash-or-nothing option on `market`, paying 1.0 by default.
    pub fn digital(market: &MarketEnvironment) -> OptionBuilder {
        OptionBuilder::new(market, OptionStyle::digital())
    }

    // ========================================
    // Accessors
    // ========================================

    /// Payoff family.
    pub fn style(&self) -> OptionStyle {
        self.style
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike K.
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Underlying level at construction.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Valuation date t.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Expiry date T.
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// Time-to-maturity τ in years.
    pub fn time_to_maturity(&self) -> f64 {
        self.tau
    }

    /// Risk-free rate r.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Volatility σ.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Cash payout Q of a digital.
    pub fn cash_amount(&self) -> Option<f64> {
        self.style.cash_amount()
    }

    /// Price frozen at construction.
    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    /// Greek rescaling factors.
    pub fn rescaling(&self) -> Rescaling {
        self.rescaling
    }

    /// Parameters used for every unset query field.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            spot: self.spot,
            strike: self.strike,
            tau: self.tau,
            valuation_date: self.valuation_date,
            expiry: self.expiry,
            volatility: self.volatility,
            rate: self.rate,
        }
    }

    // ========================================
    // Setters
    // ========================================

    /// Moves the expiry and recomputes τ.
    pub fn set_expiry(&mut self, expiry: impl Into<RawInput>) -> Result<(), InputError> {
        let expiry = scalar_date(&expiry.into())?;
        self.expiry = expiry;
        self.tau = time_to_maturity(self.valuation_date, expiry);
        Ok(())
    }

    /// Sets τ and moves the expiry to `t + ceil(τ·365)` days.
    pub fn set_time_to_maturity(&mut self, tau: f64) {
        self.tau = tau;
        self.expiry = expiry_from_time_to_maturity(self.valuation_date, tau);
    }

    /// Sets the strike.
    pub fn set_strike(&mut self, strike: f64) {
        self.strike = strike;
    }

    /// Sets call or put.
    pub fn set_option_type(&mut self, option_type: OptionType) {
        self.option_type = option_type;
    }

    /// Sets the cash payout of a digital; no effect on plain vanillas.
    pub fn set_cash_amount(&mut self, cash_amount: f64) {
        if let OptionStyle::Digital { .. } = self.style {
            self.style = OptionStyle::Digital { cash_amount };
        }
    }

    // ========================================
    // Descriptions
    // ========================================

    /// One-line contract description.
    pub fn info(&self) -> String {
        let terms = format!(
            "K={:.1}, T={} (tau={:.2}y)",
            self.strike, self.expiry, self.tau
        );
        match self.style {
            OptionStyle::PlainVanilla => {
                format!("{} {} [{}]", self.style.label(), self.option_type, terms)
            }
            OptionStyle::Digital { cash_amount } => format!(
                "{} {} [{}, Q={:.1}]",
                self.style.label(),
                self.option_type,
                terms,
                cash_amount
            ),
        }
    }

    /// Market snapshot the option was built on.
    pub fn market_info(&self) -> String {
        MarketEnvironment::new(self.spot, self.valuation_date, self.rate, self.volatility)
            .to_string()
    }

    /// Textual payoff formula.
    pub fn payoff_description(&self) -> &'static str {
        self.style.payoff_description(self.option_type)
    }

    /// Textual upper price bound.
    pub fn upper_limit_description(&self) -> &'static str {
        self.style.upper_limit_description(self.option_type)
    }

    /// Textual lower price bound.
    pub fn lower_limit_description(&self) -> &'static str {
        self.style.lower_limit_description(self.option_type)
    }

    // ========================================
    // Evaluation
    // ========================================

    fn values(&self, metric: Metric, grid: &CoordinatedParameters, scale: Option<f64>) -> Array2<f64> {
        let ty = self.option_type;
        let theta_scale = scale.unwrap_or(self.rescaling.theta);
        let vega_scale = scale.unwrap_or(self.rescaling.vega);
        let rho_scale = scale.unwrap_or(self.rescaling.rho);

        match self.style {
            OptionStyle::PlainVanilla => match metric {
                Metric::Payoff => grid.evaluate(|p| p.payoff(ty), |p| p.payoff(ty)),
                Metric::Price => grid.evaluate(|p| p.price(ty), |p| p.payoff(ty)),
                Metric::PnL => self.values(Metric::Price, grid, scale) - self.initial_price,
                Metric::Delta => grid.evaluate(|p| p.delta(ty), |p| p.expiry_delta(ty)),
                Metric::Theta => grid.evaluate(|p| p.theta(ty) * theta_scale, |_| 0.0),
                Metric::Gamma => grid.evaluate(|p| p.gamma(), |_| 0.0),
                Metric::Vega => grid.evaluate(|p| p.vega() * vega_scale, |_| 0.0),
                Metric::Rho => grid.evaluate(|p| p.rho(ty) * rho_scale, |_| 0.0),
                Metric::UpperLimit => grid.evaluate(|p| p.upper_limit(ty), |p| p.upper_limit(ty)),
                Metric::LowerLimit => grid.evaluate(|p| p.lower_limit(ty), |p| p.lower_limit(ty)),
            },
            OptionStyle::Digital { cash_amount: q } => match metric {
                Metric::Payoff => {
                    grid.evaluate(|p| p.digital_payoff(ty, q), |p| p.digital_payoff(ty, q))
                }
                Metric::Price => grid.evaluate(|p| p.digital_price(ty, q), |p| p.digital_payoff(ty, q)),
                Metric::PnL => self.values(Metric::Price, grid, scale) - self.initial_price,
                Metric::Delta => grid.evaluate(|p| p.digital_delta(ty, q), |_| 0.0),
                Metric::Theta => {
                    grid.evaluate(|p| p.digital_theta(ty, q) * theta_scale, |_| 0.0)
                }
                Metric::Gamma => grid.evaluate(|p| p.digital_gamma(ty, q), |_| 0.0),
                Metric::Vega => grid.evaluate(|p| p.digital_vega(ty, q) * vega_scale, |_| 0.0),
                Metric::Rho => grid.evaluate(|p| p.digital_rho(ty, q) * rho_scale, |_| 0.0),
                Metric::UpperLimit => {
                    grid.evaluate(|p| p.digital_upper_limit(q), |p| p.digital_upper_limit(q))
                }
                Metric::LowerLimit => grid.evaluate(|_| 0.0, |_| 0.0),
            },
        }
    }

    /// Volatility reproducing each target price.
    ///
    /// `target_prices` must broadcast onto the coordinated grid; cells
    /// where the inversion fails hold NaN.
    ///
    /// # Errors
    /// Coordination errors, and `TargetShapeMismatch` for targets that do
    /// not broadcast.
    ///
    /// # Examples
    /// ```
    /// use bsa_core::config::ImpliedVolConfig;
    /// use bsa_models::coordination::QueryParams;
    /// use bsa_models::implied_vol::ImpliedVolMethod;
    /// use bsa_models::instruments::{EuropeanOption, Valuation};
    /// use bsa_models::market::MarketEnvironment;
    ///
    /// let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
    ///     .build()
    ///     .unwrap();
    /// let query = QueryParams::new().underlying(vec![85.0, 95.0]);
    /// let prices = option.price(&query).unwrap();
    ///
    /// let vols = option
    ///     .implied_volatility(prices.values(), &query, ImpliedVolMethod::Newton, &ImpliedVolConfig::default())
    ///     .unwrap();
    /// assert!(vols.values().iter().all(|s| (s - 0.2).abs() < 1e-6));
    /// ```
    pub fn implied_volatility(
        &self,
        target_prices: &Array2<f64>,
        params: &QueryParams,
        method: ImpliedVolMethod,
        config: &ImpliedVolConfig,
    ) -> Result<Evaluation, InputError> {
        let grid = coordinate(params, &self.snapshot())?;
        let shape = grid.shape();
        let targets = target_prices
            .broadcast(shape)
            .ok_or(InputError::TargetShapeMismatch {
                found: target_prices.dim(),
                expected: shape,
            })?;

        let solver = ImpliedVolSolver::new(method, *config);
        let ty = self.option_type;
        let points = grid.points();
        let values = Zip::from(&points)
            .and(targets)
            .map_collect(|point, &target| match self.style {
                // the price at expiry carries no volatility
                _ if !(point.tau > 0.0) => f64::NAN,
                OptionStyle::PlainVanilla => solver.solve_or_nan(
                    target,
                    |s| point.with_volatility(s).price(ty),
                    |s| point.with_volatility(s).vega(),
                ),
                OptionStyle::Digital { cash_amount: q } => solver.solve_or_nan(
                    target,
                    |s| point.with_volatility(s).digital_price(ty, q),
                    |s| point.with_volatility(s).digital_vega(ty, q),
                ),
            });
        Ok(grid.finish(values))
    }
}

impl Valuation for EuropeanOption {
    type Error = InputError;

    fn evaluate(&self, metric: Metric, params: &QueryParams) -> Result<Evaluation, InputError> {
        let grid = coordinate(params, &self.snapshot())?;
        let values = self.values(metric, &grid, params.scale_override());
        Ok(grid.finish(values))
    }
}

impl fmt::Display for EuropeanOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info())
    }
}
