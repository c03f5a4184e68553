//! Closed-form Greeks against central finite differences.

use approx::assert_abs_diff_eq;
use bsa_core::config::Rescaling;
use bsa_core::types::Date;
use bsa_models::coordination::{Evaluation, QueryParams};
use bsa_models::instruments::{EuropeanOption, OptionType, Valuation};
use bsa_models::market::MarketEnvironment;
use bsa_risk::{NumericalGreeks, Portfolio};

fn market() -> MarketEnvironment {
    MarketEnvironment::new(100.0, Date::parse("01-01-2021").unwrap(), 0.01, 0.2)
}

fn query() -> QueryParams {
    QueryParams::new()
        .underlying(vec![70.0, 85.0, 100.0, 115.0, 130.0])
        .time_to_maturity(vec![0.25, 0.5, 1.0, 2.0])
}

fn assert_close(numeric: &Evaluation, analytic: &Evaluation, tolerance: f64) {
    assert_eq!(numeric.shape(), analytic.shape());
    for (n, a) in numeric.values().iter().zip(analytic.values()) {
        assert_abs_diff_eq!(*n, *a, epsilon = tolerance * (1.0 + a.abs()));
    }
}

fn check_all<V>(target: &V, query: &QueryParams)
where
    V: Valuation,
    V::Error: std::fmt::Debug,
{
    let numeric = NumericalGreeks::new(target);
    assert_close(&numeric.delta(query).unwrap(), &target.delta(query).unwrap(), 1e-6);
    assert_close(&numeric.gamma(query).unwrap(), &target.gamma(query).unwrap(), 1e-4);
    assert_close(&numeric.vega(query).unwrap(), &target.vega(query).unwrap(), 1e-6);
    assert_close(&numeric.theta(query).unwrap(), &target.theta(query).unwrap(), 1e-6);
    assert_close(&numeric.rho(query).unwrap(), &target.rho(query).unwrap(), 1e-6);
}

#[test]
fn test_plain_vanilla_greeks() {
    for ty in [OptionType::Call, OptionType::Put] {
        let option = EuropeanOption::plain_vanilla(&market())
            .option_type(ty)
            .time_to_maturity(1.0)
            .build()
            .unwrap();
        check_all(&option, &query());
    }
}

#[test]
fn test_digital_greeks() {
    for ty in [OptionType::Call, OptionType::Put] {
        let option = EuropeanOption::digital(&market())
            .option_type(ty)
            .cash_amount(10.0)
            .strike(105.0)
            .time_to_maturity(1.0)
            .build()
            .unwrap();
        check_all(&option, &query());
    }
}

#[test]
fn test_unit_rescaling_with_volatility_axis() {
    let option = EuropeanOption::plain_vanilla(&market())
        .time_to_maturity(1.0)
        .rescaling(Rescaling::unit())
        .build()
        .unwrap();
    let query = QueryParams::new()
        .underlying(vec![90.0, 100.0, 110.0])
        .volatility(vec![0.1, 0.3, 0.5]);
    let numeric = NumericalGreeks::new(&option).with_rescaling(Rescaling::unit());
    assert_close(&numeric.vega(&query).unwrap(), &option.vega(&query).unwrap(), 1e-6);
    assert_close(&numeric.theta(&query).unwrap(), &option.theta(&query).unwrap(), 1e-6);
}

#[test]
fn test_multi_horizon_portfolio_greeks() {
    let m = market();
    let mut portfolio = Portfolio::new("Butterfly and Calendar");
    portfolio
        .add_instrument(EuropeanOption::plain_vanilla(&m).strike(90.0).time_to_maturity(1.0).build().unwrap(), 1.0)
        .unwrap();
    portfolio
        .add_instrument(EuropeanOption::plain_vanilla(&m).strike(100.0).time_to_maturity(1.0).build().unwrap(), -2.0)
        .unwrap();
    portfolio
        .add_instrument(EuropeanOption::plain_vanilla(&m).strike(110.0).time_to_maturity(1.0).build().unwrap(), 1.0)
        .unwrap();
    portfolio
        .add_instrument(EuropeanOption::digital(&m).time_to_maturity(0.5).build().unwrap(), 3.0)
        .unwrap();
    assert!(portfolio.is_multi_horizon());

    let query = QueryParams::new()
        .underlying(vec![85.0, 100.0, 115.0])
        .valuation_date(vec!["01-02-2021", "01-04-2021"]);
    check_all(&portfolio, &query);
}
