//! Implied volatility recovered across coordinated surfaces.

use approx::assert_abs_diff_eq;
use bsa_core::config::ImpliedVolConfig;
use bsa_models::coordination::QueryParams;
use bsa_models::implied_vol::ImpliedVolMethod;
use bsa_models::instruments::{EuropeanOption, OptionType, Valuation};
use bsa_models::market::MarketEnvironment;
use ndarray::{array, Array2};

fn surface_query() -> QueryParams {
    QueryParams::new()
        .underlying(vec![80.0, 90.0, 100.0, 110.0, 120.0])
        .time_to_maturity(vec![0.25, 0.5, 1.0, 2.0])
}

#[test]
fn test_round_trip_both_methods() {
    let market = MarketEnvironment::default();
    for ty in [OptionType::Call, OptionType::Put] {
        let option = EuropeanOption::plain_vanilla(&market)
            .option_type(ty)
            .build()
            .unwrap();
        let query = surface_query();
        let targets = option.price(&query).unwrap().into_values();

        for method in [ImpliedVolMethod::Newton, ImpliedVolMethod::LeastSquares] {
            let vols = option
                .implied_volatility(&targets, &query, method, &ImpliedVolConfig::default())
                .unwrap();
            assert_eq!(vols.shape(), (4, 5));
            for sigma in vols.values() {
                assert_abs_diff_eq!(*sigma, 0.2, epsilon = 1e-4);
            }
        }
    }
}

#[test]
fn test_volatility_surface_recovered() {
    let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
        .build()
        .unwrap();
    let smile = array![[0.30, 0.25, 0.20], [0.28, 0.24, 0.21]];
    let query = QueryParams::new()
        .underlying(vec![85.0, 95.0, 105.0])
        .time_to_maturity(vec![0.5, 1.0]);
    let targets = option
        .price(&query.clone().volatility(smile.clone()))
        .unwrap()
        .into_values();

    let vols = option
        .implied_volatility(&targets, &query, ImpliedVolMethod::Newton, &ImpliedVolConfig::default())
        .unwrap();
    for (got, want) in vols.values().iter().zip(smile.iter()) {
        assert_abs_diff_eq!(*got, *want, epsilon = 1e-6);
    }
}

#[test]
fn test_failed_cells_are_nan_without_aborting() {
    let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
        .build()
        .unwrap();
    let query = QueryParams::new().underlying(vec![90.0, 100.0]);
    let mut targets = option.price(&query).unwrap().into_values();
    // above the no-arbitrage bound of S
    targets[[0, 0]] = 500.0;

    let vols = option
        .implied_volatility(&targets, &query, ImpliedVolMethod::LeastSquares, &ImpliedVolConfig::default())
        .unwrap();
    assert!(vols.values()[[0, 0]].is_nan());
    assert_abs_diff_eq!(vols.values()[[0, 1]], 0.2, epsilon = 1e-4);
}

#[test]
fn test_terminal_cells_are_nan() {
    let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
        .build()
        .unwrap();
    let query = QueryParams::new().time_to_maturity(vec![0.0, 0.5]);
    let vols = option
        .implied_volatility(&Array2::from_elem((1, 1), 1.0), &query, ImpliedVolMethod::Newton, &ImpliedVolConfig::default())
        .unwrap();
    assert!(vols.values()[[0, 0]].is_nan());
}

#[test]
fn test_digital_round_trip() {
    let option = EuropeanOption::digital(&MarketEnvironment::default())
        .cash_amount(10.0)
        .build()
        .unwrap();
    let query = QueryParams::new().underlying(vec![80.0, 85.0]);
    let targets = option.price(&query).unwrap().into_values();
    let vols = option
        .implied_volatility(&targets, &query, ImpliedVolMethod::LeastSquares, &ImpliedVolConfig::default())
        .unwrap();
    for sigma in vols.values() {
        assert_abs_diff_eq!(*sigma, 0.2, epsilon = 1e-4);
    }
}

#[test]
fn test_expiry_prices_do_not_return_the_seed() {
    let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
        .build()
        .unwrap();
    let query = QueryParams::new()
        .underlying(vec![90.0, 110.0])
        .time_to_maturity(vec![0.0, 0.5]);
    let targets = option.price(&query).unwrap().into_values();
    assert_eq!(targets.row(0).to_vec(), vec![0.0, 10.0]);

    for method in [ImpliedVolMethod::Newton, ImpliedVolMethod::LeastSquares] {
        let vols = option
            .implied_volatility(&targets, &query, method, &ImpliedVolConfig::default())
            .unwrap();
        assert!(vols.values().row(0).iter().all(|s| s.is_nan()));
        for sigma in vols.values().row(1) {
            assert_abs_diff_eq!(*sigma, 0.2, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_vanishing_vega_is_nan() {
    let option = EuropeanOption::plain_vanilla(&MarketEnvironment::default())
        .build()
        .unwrap();
    let query = QueryParams::new()
        .underlying(50.0)
        .strike(100.0)
        .time_to_maturity(0.05)
        .volatility(0.1);
    let targets = option.price(&query).unwrap().into_values();
    assert!(targets[[0, 0]] < 1e-100);

    for method in [ImpliedVolMethod::Newton, ImpliedVolMethod::LeastSquares] {
        let vols = option
            .implied_volatility(&targets, &query, method, &ImpliedVolConfig::default())
            .unwrap();
        assert!(vols.values()[[0, 0]].is_nan());
    }
}
