//! Linear portfolios of European options.
//!
//! A [`Portfolio`] holds signed positions and evaluates every metric as the
//! position-weighted sum of its constituents' results. Constituents
//! coordinate the query themselves; the portfolio only checks the guards
//! that make the sum well defined and adds up aligned grids.

mod error;

pub use error::PortfolioError;

use std::fmt;

use tracing::info;

use bsa_core::types::{Date, InputError};
use bsa_models::coordination::{Evaluation, QueryParams, TimeParameter};
use bsa_models::instruments::{EuropeanOption, Metric, Valuation};

/// One constituent and the quantity held.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// The option held.
    pub option: EuropeanOption,
    /// Signed quantity: positive long, negative short.
    pub quantity: f64,
}

impl Position {
    /// "Long 2 Plain Vanilla call [...]" style description.
    pub fn info(&self) -> String {
        let side = if self.quantity > 0.0 { "Long" } else { "Short" };
        format!("{} {} {}", side, self.quantity.abs(), self.option.info())
    }
}

/// A named collection of signed option positions sharing one valuation date.
///
/// # Examples
/// ```
/// use bsa_models::coordination::QueryParams;
/// use bsa_models::instruments::{EuropeanOption, OptionType, Valuation};
/// use bsa_models::market::MarketEnvironment;
/// use bsa_risk::portfolio::Portfolio;
///
/// let market = MarketEnvironment::default();
/// let call = EuropeanOption::plain_vanilla(&market).build().unwrap();
/// let put = EuropeanOption::plain_vanilla(&market)
///     .option_type(OptionType::Put)
///     .build()
///     .unwrap();
///
/// let mut straddle = Portfolio::new("Straddle");
/// straddle.add_instrument(call, 1.0).unwrap();
/// straddle.add_instrument(put, 1.0).unwrap();
///
/// let price = straddle.price(&QueryParams::new()).unwrap();
/// assert!(price.scalar().unwrap() > 0.0);
/// assert!(!straddle.is_multi_horizon());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    name: String,
    composition: Vec<Position>,
    valuation_date: Option<Date>,
    market_info: Option<String>,
    spot: Option<f64>,
    strikes: Vec<f64>,
    expiries: Vec<Date>,
    taus: Vec<f64>,
}

impl Portfolio {
    /// Creates an empty portfolio.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            composition: Vec::new(),
            valuation_date: None,
            market_info: None,
            spot: None,
            strikes: Vec::new(),
            expiries: Vec::new(),
            taus: Vec::new(),
        }
    }

    /// Appends `quantity` units of `option` and refreshes the summary fields.
    ///
    /// # Errors
    /// - `InvalidPosition` for a zero or non-finite quantity
    /// - `ValuationDateMismatch` when the option is valued on another date
    pub fn add_instrument(
        &mut self,
        option: EuropeanOption,
        quantity: f64,
    ) -> Result<(), PortfolioError> {
        if quantity == 0.0 || !quantity.is_finite() {
            return Err(PortfolioError::InvalidPosition(quantity));
        }
        let date = option.valuation_date();
        match self.valuation_date {
            Some(expected) if expected != date => {
                return Err(PortfolioError::ValuationDateMismatch {
                    expected,
                    found: date,
                })
            }
            Some(_) => {}
            None => {
                self.valuation_date = Some(date);
                self.market_info = Some(option.market_info());
                self.spot = Some(option.spot());
            }
        }

        insert_sorted(&mut self.strikes, option.strike());
        insert_sorted(&mut self.expiries, option.expiry());
        insert_sorted(&mut self.taus, option.time_to_maturity());

        let position = Position { option, quantity };
        info!(
            portfolio = %self.name,
            position = %position.info(),
            multi_horizon = self.expiries.len() > 1,
            "instrument added"
        );
        self.composition.push(position);
        Ok(())
    }

    // ========================================
    // Accessors
    // ========================================

    /// Portfolio name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positions in insertion order.
    pub fn composition(&self) -> &[Position] {
        &self.composition
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.composition.len()
    }

    /// True when no position has been added.
    pub fn is_empty(&self) -> bool {
        self.composition.is_empty()
    }

    /// Valuation date shared by every constituent.
    pub fn valuation_date(&self) -> Option<Date> {
        self.valuation_date
    }

    /// Underlying level when the portfolio was formed.
    pub fn spot(&self) -> Option<f64> {
        self.spot
    }

    /// Distinct strikes, ascending.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Distinct expiries, chronological.
    pub fn expiries(&self) -> &[Date] {
        &self.expiries
    }

    /// Distinct times-to-maturity at formation, ascending.
    pub fn times_to_maturity(&self) -> &[f64] {
        &self.taus
    }

    /// True when constituents expire on more than one date.
    pub fn is_multi_horizon(&self) -> bool {
        self.expiries.len() > 1
    }

    /// Market snapshot of the first constituent.
    pub fn market_info(&self) -> Option<&str> {
        self.market_info.as_deref()
    }

    /// Name followed by one line per position.
    pub fn info(&self) -> String {
        let mut text = format!("{} Portfolio: \n", self.name);
        for position in &self.composition {
            text.push_str(&position.info());
            text.push('\n');
        }
        text
    }

    fn check_query(&self, metric: Metric, params: &QueryParams) -> Result<(), InputError> {
        if matches!(metric, Metric::UpperLimit | Metric::LowerLimit) {
            return Err(InputError::UnsupportedMetric {
                metric: metric.name(),
                target: "portfolio",
            });
        }
        if params.has_strike() {
            return Err(InputError::StrikeOnPortfolio);
        }
        if self.is_multi_horizon() {
            if let Some(TimeParameter::TimeToMaturity(_)) = params.resolve_time()? {
                return Err(InputError::TimeToMaturityOnMultiHorizon);
            }
        }
        Ok(())
    }
}

fn insert_sorted<T: PartialOrd + Copy>(values: &mut Vec<T>, value: T) {
    if values.contains(&value) {
        return;
    }
    let at = values.iter().take_while(|v| **v < value).count();
    values.insert(at, value);
}

impl Valuation for Portfolio {
    type Error = PortfolioError;

    /// Position-weighted sum of the constituents' `metric`.
    ///
    /// An empty portfolio evaluates to a single zero.
    fn evaluate(
        &self,
        metric: Metric,
        params: &QueryParams,
    ) -> Result<Evaluation, PortfolioError> {
        self.check_query(metric, params)?;

        let mut positions = self.composition.iter();
        let Some(first) = positions.next() else {
            return Ok(Evaluation::from_scalar(0.0));
        };
        let mut total = first.option.evaluate(metric, params)?.scaled(first.quantity);
        for position in positions {
            let value = position.option.evaluate(metric, params)?;
            total.scaled_add(position.quantity, &value)?;
        }
        Ok(total)
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bsa_core::types::ErrorKind;
    use bsa_models::instruments::OptionType;
    use bsa_models::market::MarketEnvironment;

    fn market() -> MarketEnvironment {
        MarketEnvironment::default()
    }

    fn call(strike: f64) -> EuropeanOption {
        EuropeanOption::plain_vanilla(&market())
            .strike(strike)
            .build()
            .unwrap()
    }

    #[test]
    fn test_summary_fields() {
        let mut portfolio = Portfolio::new("Test");
        assert!(portfolio.is_empty());
        assert_eq!(portfolio.spot(), None);

        portfolio.add_instrument(call(110.0), 1.0).unwrap();
        portfolio.add_instrument(call(90.0), -2.0).unwrap();
        portfolio.add_instrument(call(110.0), 3.0).unwrap();

        assert_eq!(portfolio.len(), 3);
        assert_eq!(portfolio.spot(), Some(90.0));
        assert_eq!(portfolio.strikes(), &[90.0, 110.0]);
        assert_eq!(portfolio.expiries(), &[Date::parse("31-12-2020").unwrap()]);
        assert_eq!(portfolio.times_to_maturity().len(), 1);
        assert!(!portfolio.is_multi_horizon());
        assert_eq!(
            portfolio.market_info(),
            Some("[S_t=90.0, r=5.0%, sigma=20.0%, t=19-04-2020]")
        );
    }

    #[test]
    fn test_multi_horizon_flag() {
        let mut portfolio = Portfolio::new("Calendar");
        let near = EuropeanOption::plain_vanilla(&market())
            .expiry("30-06-2020")
            .build()
            .unwrap();
        portfolio.add_instrument(call(100.0), 1.0).unwrap();
        portfolio.add_instrument(near, -1.0).unwrap();

        assert!(portfolio.is_multi_horizon());
        assert_eq!(
            portfolio.expiries(),
            &[
                Date::parse("30-06-2020").unwrap(),
                Date::parse("31-12-2020").unwrap()
            ]
        );
        assert!(portfolio.times_to_maturity()[0] < portfolio.times_to_maturity()[1]);
    }

    #[test]
    fn test_invalid_positions() {
        let mut portfolio = Portfolio::new("Test");
        for q in [0.0, f64::NAN, f64::INFINITY] {
            let err = portfolio.add_instrument(call(100.0), q).unwrap_err();
            assert!(matches!(err, PortfolioError::InvalidPosition(_)));
        }
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_valuation_date_mismatch() {
        let mut portfolio = Portfolio::new("Test");
        portfolio.add_instrument(call(100.0), 1.0).unwrap();

        let later = MarketEnvironment::new(90.0, Date::parse("20-04-2020").unwrap(), 0.05, 0.2);
        let option = EuropeanOption::plain_vanilla(&later).build().unwrap();
        let err = portfolio.add_instrument(option, 1.0).unwrap_err();
        assert_eq!(
            err,
            PortfolioError::ValuationDateMismatch {
                expected: Date::parse("19-04-2020").unwrap(),
                found: Date::parse("20-04-2020").unwrap(),
            }
        );
        assert_eq!(portfolio.len(), 1);
    }

    #[test]
    fn test_info() {
        let mut portfolio = Portfolio::new("Spread");
        portfolio.add_instrument(call(90.0), 1.0).unwrap();
        portfolio.add_instrument(call(110.0), -1.5).unwrap();
        assert_eq!(
            portfolio.to_string(),
            "Spread Portfolio: \n\
             Long 1 Plain Vanilla call [K=90.0, T=31-12-2020 (tau=0.70y)]\n\
             Short 1.5 Plain Vanilla call [K=110.0, T=31-12-2020 (tau=0.70y)]\n"
        );
    }

    #[test]
    fn test_empty_portfolio_is_zero() {
        let portfolio = Portfolio::new("Empty");
        for metric in [Metric::Price, Metric::PnL, Metric::Payoff, Metric::Delta, Metric::Vega] {
            let value = portfolio.evaluate(metric, &QueryParams::new()).unwrap();
            assert_eq!(value.scalar(), Some(0.0));
        }
    }

    #[test]
    fn test_weighted_sum() {
        let a = call(95.0);
        let b = EuropeanOption::digital(&market())
            .option_type(OptionType::Put)
            .build()
            .unwrap();
        let mut portfolio = Portfolio::new("Mixed");
        portfolio.add_instrument(a.clone(), 2.0).unwrap();
        portfolio.add_instrument(b.clone(), -3.0).unwrap();

        let query = QueryParams::new().underlying(vec![80.0, 100.0]).time_to_maturity(vec![0.1, 0.5]);
        let total = portfolio.gamma(&query).unwrap();
        let expected = a.gamma(&query).unwrap().into_values() * 2.0
            - b.gamma(&query).unwrap().into_values() * 3.0;
        assert_eq!(total.shape(), (2, 2));
        for (x, y) in total.values().iter().zip(expected.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_strike_rejected() {
        let mut portfolio = Portfolio::new("Test");
        portfolio.add_instrument(call(100.0), 1.0).unwrap();
        let err = portfolio
            .price(&QueryParams::new().strike(105.0))
            .unwrap_err();
        assert_eq!(err, PortfolioError::Input(InputError::StrikeOnPortfolio));
        assert_eq!(err.kind(), ErrorKind::Type);

        // rejected even before any position exists
        assert!(Portfolio::new("Empty")
            .price(&QueryParams::new().strike(105.0))
            .is_err());
    }

    #[test]
    fn test_time_to_maturity_on_multi_horizon() {
        let mut portfolio = Portfolio::new("Calendar");
        let near = EuropeanOption::plain_vanilla(&market())
            .time_to_maturity(0.25)
            .build()
            .unwrap();
        portfolio.add_instrument(call(100.0), 1.0).unwrap();
        portfolio.add_instrument(near, -1.0).unwrap();

        for query in [
            QueryParams::new().time_to_maturity(0.1),
            QueryParams::new().time(0.1),
        ] {
            let err = portfolio.price(&query).unwrap_err();
            assert_eq!(err, PortfolioError::Input(InputError::TimeToMaturityOnMultiHorizon));
            assert_eq!(err.kind(), ErrorKind::Type);
        }

        let by_date = portfolio
            .price(&QueryParams::new().valuation_date(vec!["01-05-2020", "01-06-2020"]))
            .unwrap();
        assert_eq!(by_date.shape(), (2, 1));
    }

    #[test]
    fn test_limits_not_supported() {
        let mut portfolio = Portfolio::new("Test");
        portfolio.add_instrument(call(100.0), 1.0).unwrap();
        let err = portfolio.price_upper_limit(&QueryParams::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }
}
