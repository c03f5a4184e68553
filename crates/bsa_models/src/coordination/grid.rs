//! The parameter coordinator: broadcasts raw inputs onto one aligned grid.
//!
//! At most two of {S or K, τ, σ, r} may be iterable. With two, the pair
//! is laid out as a mesh grid whose column ("x") axis is the first member
//! of the pair in this order:
//!
//! | iterable pair | columns | rows |
//! |---------------|---------|------|
//! | (S or K, τ)   | S or K  | τ    |
//! | (S or K, σ)   | S or K  | σ    |
//! | (S or K, r)   | S or K  | r    |
//! | (σ, τ)        | σ       | τ    |
//! | (r, τ)        | r       | τ    |
//! | (r, σ)        | r       | σ    |
//!
//! A single iterable τ yields an n×1 column, any other single iterable a
//! 1×n row, and all-scalar inputs a 1×1 grid. Scalars are broadcast to
//! every cell.

use ndarray::{Array2, Zip};
use tracing::{debug, warn};

use bsa_core::input::{homogenize_numeric, RawInput, Values};
use bsa_core::types::{time_to_maturity, Date, InputError, Parameter, RangeWarning};

use super::evaluation::{AxisLabels, Evaluation, Label};
use super::query::{MarketInput, OutputFormat, QueryParams, TimeParameter};
use crate::analytical::BlackScholes;

/// The parameters an instrument was built with, used for every unset query field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Underlying level.
    pub spot: f64,
    /// Strike.
    pub strike: f64,
    /// Years to expiry at the valuation date.
    pub tau: f64,
    /// Valuation date.
    pub valuation_date: Date,
    /// Expiry date.
    pub expiry: Date,
    /// Volatility.
    pub volatility: f64,
    /// Risk-free rate.
    pub rate: f64,
}

/// Aligned, same-shaped parameter arrays ready for elementwise evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatedParameters {
    /// Underlying levels.
    pub spot: Array2<f64>,
    /// Strikes.
    pub strike: Array2<f64>,
    /// Years to expiry.
    pub tau: Array2<f64>,
    /// Volatilities.
    pub volatility: Array2<f64>,
    /// Rates.
    pub rate: Array2<f64>,
    /// Row and column labels.
    pub labels: AxisLabels,
    /// Requested output format.
    pub output: OutputFormat,
    /// Range warnings raised during coordination.
    pub warnings: Vec<RangeWarning>,
}

impl CoordinatedParameters {
    /// `(rows, columns)` of every array.
    pub fn shape(&self) -> (usize, usize) {
        self.spot.dim()
    }

    /// One [`BlackScholes`] point per cell.
    pub fn points(&self) -> Array2<BlackScholes> {
        Zip::from(&self.spot)
            .and(&self.strike)
            .and(&self.tau)
            .and(&self.volatility)
            .and(&self.rate)
            .map_collect(|&s, &k, &t, &v, &r| BlackScholes::new(s, k, t, v, r))
    }

    /// Applies `live` to cells with τ ≠ 0 and `expired` to terminal cells.
    pub fn evaluate<F, G>(&self, live: F, expired: G) -> Array2<f64>
    where
        F: Fn(&BlackScholes) -> f64,
        G: Fn(&BlackScholes) -> f64,
    {
        self.points().map(|point| {
            if point.tau == 0.0 {
                expired(point)
            } else {
                live(point)
            }
        })
    }

    /// Wraps `values` with the labels (for labelled output) and warnings.
    pub fn finish(&self, values: Array2<f64>) -> Evaluation {
        let labels = match self.output {
            OutputFormat::Labeled => Some(self.labels.clone()),
            OutputFormat::Raw => None,
        };
        Evaluation::new(values)
            .with_labels(labels)
            .with_warnings(self.warnings.clone())
    }
}

#[derive(Debug)]
enum Field {
    Values(Values<f64>),
    Surface(Array2<f64>),
}

impl Field {
    fn axis(&self) -> Option<&[f64]> {
        match self {
            Field::Values(values @ Values::Vector(_)) => Some(values.as_slice()),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Axis {
    parameter: Parameter,
    values: Vec<f64>,
    labels: Vec<Label>,
}

impl Axis {
    fn numeric(parameter: Parameter, values: &[f64]) -> Self {
        Self {
            parameter,
            values: values.to_vec(),
            labels: values.iter().map(|v| Label::Number(*v)).collect(),
        }
    }
}

/// Columns prefer S or K, then r, then σ, then τ.
fn column_rank(parameter: Parameter) -> u8 {
    match parameter {
        Parameter::Underlying | Parameter::Strike => 0,
        Parameter::Rate => 1,
        Parameter::Volatility => 2,
        Parameter::Time => 3,
    }
}

fn numeric_or(
    input: Option<&RawInput>,
    parameter: Parameter,
    default: f64,
) -> Result<Values<f64>, InputError> {
    match input {
        Some(raw) => homogenize_numeric(raw, parameter),
        None => Ok(Values::Scalar(default)),
    }
}

fn market_or(
    input: Option<&MarketInput>,
    parameter: Parameter,
    default: f64,
) -> Result<Field, InputError> {
    match input {
        Some(MarketInput::Axis(raw)) => Ok(Field::Values(homogenize_numeric(raw, parameter)?)),
        Some(MarketInput::Surface(surface)) => Ok(Field::Surface(surface.clone())),
        None => Ok(Field::Values(Values::Scalar(default))),
    }
}

/// τ values and their labels; dates are converted against the expiry.
fn resolve_tau(time: Option<TimeParameter>, snapshot: &Snapshot) -> (Values<f64>, Values<Label>) {
    match time {
        None => (
            Values::Scalar(snapshot.tau),
            Values::Scalar(Label::Date(snapshot.valuation_date)),
        ),
        Some(TimeParameter::TimeToMaturity(taus)) => {
            let labels = taus.map(|t| Label::Number(*t));
            (taus, labels)
        }
        Some(TimeParameter::ValuationDate(dates)) => (
            dates.map(|d| time_to_maturity(*d, snapshot.expiry)),
            dates.map(|d| Label::Date(*d)),
        ),
    }
}

fn fill(
    field: &Field,
    parameter: Parameter,
    col: Option<&Axis>,
    row: Option<&Axis>,
    shape: (usize, usize),
) -> Result<Array2<f64>, InputError> {
    match field {
        Field::Surface(surface) => {
            if surface.dim() != shape {
                return Err(InputError::ShapeMismatch {
                    parameter,
                    found: surface.dim(),
                    expected: shape,
                });
            }
            Ok(surface.clone())
        }
        Field::Values(Values::Scalar(value)) => Ok(Array2::from_elem(shape, *value)),
        Field::Values(Values::Vector(_)) => match (col, row) {
            (Some(axis), _) if axis.parameter == parameter => {
                Ok(Array2::from_shape_fn(shape, |(_, j)| axis.values[j]))
            }
            (_, Some(axis)) if axis.parameter == parameter => {
                Ok(Array2::from_shape_fn(shape, |(i, _)| axis.values[i]))
            }
            // unreachable once every iterable field has been assigned an axis
            _ => Err(InputError::TooManyIterableAxes {
                axes: vec![parameter],
            }),
        },
    }
}

fn range_warning(parameter: Parameter, values: &Array2<f64>) -> Option<RangeWarning> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if min < 0.0 {
        let warning = RangeWarning {
            parameter,
            value: min,
        };
        warn!("{}", warning);
        Some(warning)
    } else {
        None
    }
}

/// Validates, classifies and broadcasts `params` over `snapshot`.
///
/// # Errors
/// - `ConflictingAxes` when both S and K are iterable
/// - `MultipleTimeParameters` and classification errors from the time input
/// - `TooManyIterableAxes` when more than two inputs are iterable
/// - `ShapeMismatch` when a surface does not match the grid
///
/// # Examples
/// ```
/// use bsa_core::types::Date;
/// use bsa_models::coordination::{coordinate, QueryParams, Snapshot};
///
/// let t = Date::parse("19-04-2020").unwrap();
/// let snapshot = Snapshot {
///     spot: 90.0,
///     strike: 100.0,
///     tau: 0.7,
///     valuation_date: t,
///     expiry: Date::parse("31-12-2020").unwrap(),
///     volatility: 0.2,
///     rate: 0.05,
/// };
///
/// let query = QueryParams::new()
///     .underlying(vec![80.0, 90.0, 100.0, 110.0])
///     .time_to_maturity(vec![0.25, 0.5]);
/// let grid = coordinate(&query, &snapshot).unwrap();
/// assert_eq!(grid.shape(), (2, 4));
/// assert_eq!(grid.tau[[1, 3]], 0.5);
/// assert_eq!(grid.spot[[1, 3]], 110.0);
/// ```
pub fn coordinate(
    params: &QueryParams,
    snapshot: &Snapshot,
) -> Result<CoordinatedParameters, InputError> {
    let spot = numeric_or(params.underlying.as_ref(), Parameter::Underlying, snapshot.spot)?;
    let strike = numeric_or(params.strike.as_ref(), Parameter::Strike, snapshot.strike)?;
    if !spot.is_scalar() && !strike.is_scalar() {
        return Err(InputError::ConflictingAxes);
    }
    let (tau, time_labels) = resolve_tau(params.resolve_time()?, snapshot);
    let volatility = market_or(
        params.volatility.as_ref(),
        Parameter::Volatility,
        snapshot.volatility,
    )?;
    let rate = market_or(params.rate.as_ref(), Parameter::Rate, snapshot.rate)?;

    let x_default = spot.as_slice().first().copied().unwrap_or(snapshot.spot);
    let spot = Field::Values(spot);
    let strike = Field::Values(strike);

    let mut axes: Vec<Axis> = Vec::new();
    for (parameter, field) in [
        (Parameter::Underlying, &spot),
        (Parameter::Strike, &strike),
        (Parameter::Volatility, &volatility),
        (Parameter::Rate, &rate),
    ] {
        if let Some(values) = field.axis() {
            axes.push(Axis::numeric(parameter, values));
        }
    }
    if let Values::Vector(taus) = &tau {
        axes.push(Axis {
            parameter: Parameter::Time,
            values: taus.clone(),
            labels: time_labels.to_vec(),
        });
    }
    if axes.len() > 2 {
        let mut iterable: Vec<Parameter> = axes.iter().map(|a| a.parameter).collect();
        iterable.sort();
        return Err(InputError::TooManyIterableAxes { axes: iterable });
    }
    axes.sort_by_key(|a| column_rank(a.parameter));

    let mut axes = axes.into_iter();
    let (col, row) = match (axes.next(), axes.next()) {
        (Some(first), Some(second)) => (Some(first), Some(second)),
        (Some(only), None) if only.parameter == Parameter::Time => (None, Some(only)),
        (Some(only), None) => (Some(only), None),
        (None, _) => (None, None),
    };
    let shape = (
        row.as_ref().map_or(1, |a| a.values.len()),
        col.as_ref().map_or(1, |a| a.values.len()),
    );
    debug!(
        rows = ?row.as_ref().map(|a| a.parameter),
        cols = ?col.as_ref().map(|a| a.parameter),
        ?shape,
        "coordinated query parameters"
    );

    let tau = Field::Values(tau);
    let mut spot = fill(&spot, Parameter::Underlying, col.as_ref(), row.as_ref(), shape)?;
    let mut strike = fill(&strike, Parameter::Strike, col.as_ref(), row.as_ref(), shape)?;
    let mut tau = fill(&tau, Parameter::Time, col.as_ref(), row.as_ref(), shape)?;
    let mut volatility = fill(&volatility, Parameter::Volatility, col.as_ref(), row.as_ref(), shape)?;
    let mut rate = fill(&rate, Parameter::Rate, col.as_ref(), row.as_ref(), shape)?;

    let shifts = params.shifts;
    for (array, shift) in [
        (&mut spot, shifts.underlying),
        (&mut strike, shifts.strike),
        (&mut tau, shifts.tau),
        (&mut volatility, shifts.volatility),
        (&mut rate, shifts.rate),
    ] {
        if shift != 0.0 {
            *array += shift;
        }
    }

    let warnings: Vec<RangeWarning> = [
        (Parameter::Underlying, &spot),
        (Parameter::Time, &tau),
        (Parameter::Volatility, &volatility),
        (Parameter::Rate, &rate),
    ]
    .into_iter()
    .filter_map(|(parameter, values)| range_warning(parameter, values))
    .collect();

    let (col_parameter, cols) = match col {
        Some(axis) => (axis.parameter, axis.labels),
        None => (Parameter::Underlying, vec![Label::Number(x_default)]),
    };
    let (row_parameter, rows) = match row {
        Some(axis) => (axis.parameter, axis.labels),
        None => (Parameter::Time, time_labels.to_vec()),
    };

    Ok(CoordinatedParameters {
        spot,
        strike,
        tau,
        volatility,
        rate,
        labels: AxisLabels {
            row_parameter,
            col_parameter,
            rows,
            cols,
        },
        output: params.output,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bsa_core::types::ErrorKind;
    use ndarray::array;

    fn snapshot() -> Snapshot {
        Snapshot {
            spot: 90.0,
            strike: 100.0,
            tau: 256.0 / 365.0,
            valuation_date: Date::parse("19-04-2020").unwrap(),
            expiry: Date::parse("31-12-2020").unwrap(),
            volatility: 0.2,
            rate: 0.05,
        }
    }

    #[test]
    fn test_all_scalar_is_one_by_one() {
        let grid = coordinate(&QueryParams::new(), &snapshot()).unwrap();
        assert_eq!(grid.shape(), (1, 1));
        assert_eq!(grid.spot[[0, 0]], 90.0);
        assert_relative_eq!(grid.tau[[0, 0]], 256.0 / 365.0);
        assert_eq!(grid.labels.row_parameter, Parameter::Time);
        assert_eq!(
            grid.labels.rows,
            vec![Label::Date(Date::parse("19-04-2020").unwrap())]
        );
        assert_eq!(grid.labels.cols, vec![Label::Number(90.0)]);
        assert!(grid.warnings.is_empty());
    }

    #[test]
    fn test_single_spot_axis_is_row_vector() {
        let query = QueryParams::new().underlying(vec![110.0, 90.0, 100.0]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (1, 3));
        assert_eq!(grid.spot, array![[90.0, 100.0, 110.0]]);
        assert_eq!(grid.strike, array![[100.0, 100.0, 100.0]]);
    }

    #[test]
    fn test_single_time_axis_is_column_vector() {
        let query = QueryParams::new().time_to_maturity(vec![0.5, 0.25, 1.0]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (3, 1));
        assert_eq!(grid.tau, array![[0.25], [0.5], [1.0]]);
        assert_eq!(grid.labels.row_parameter, Parameter::Time);
    }

    #[test]
    fn test_dates_converted_against_expiry() {
        let query = QueryParams::new().time(vec!["30-12-2020", "31-12-2020"]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (2, 1));
        assert_relative_eq!(grid.tau[[0, 0]], 1.0 / 365.0);
        assert_eq!(grid.tau[[1, 0]], 0.0);
        assert_eq!(
            grid.labels.rows[1],
            Label::Date(Date::parse("31-12-2020").unwrap())
        );
    }

    #[test]
    fn test_pair_priority() {
        let snap = snapshot();
        let cases = [
            (
                QueryParams::new()
                    .underlying(vec![1.0, 2.0, 3.0])
                    .volatility(vec![0.1, 0.2]),
                Parameter::Underlying,
                Parameter::Volatility,
            ),
            (
                QueryParams::new()
                    .strike(vec![1.0, 2.0, 3.0])
                    .rate(vec![0.01, 0.02]),
                Parameter::Strike,
                Parameter::Rate,
            ),
            (
                QueryParams::new()
                    .volatility(vec![0.1, 0.2, 0.3])
                    .time_to_maturity(vec![0.5, 1.0]),
                Parameter::Volatility,
                Parameter::Time,
            ),
            (
                QueryParams::new()
                    .rate(vec![0.01, 0.02, 0.03])
                    .time(vec![0.5, 1.0]),
                Parameter::Rate,
                Parameter::Time,
            ),
            (
                QueryParams::new()
                    .rate(vec![0.01, 0.02, 0.03])
                    .volatility(vec![0.1, 0.2]),
                Parameter::Rate,
                Parameter::Volatility,
            ),
        ];
        for (query, col, row) in cases {
            let grid = coordinate(&query, &snap).unwrap();
            assert_eq!(grid.shape(), (2, 3));
            assert_eq!(grid.labels.col_parameter, col);
            assert_eq!(grid.labels.row_parameter, row);
        }
    }

    #[test]
    fn test_mesh_grid_semantics() {
        let query = QueryParams::new()
            .underlying(vec![80.0, 100.0, 120.0])
            .volatility(vec![0.1, 0.3]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.spot, array![[80.0, 100.0, 120.0], [80.0, 100.0, 120.0]]);
        assert_eq!(grid.volatility, array![[0.1, 0.1, 0.1], [0.3, 0.3, 0.3]]);
        assert_eq!(grid.rate, Array2::from_elem((2, 3), 0.05));
    }

    #[test]
    fn test_three_axes_not_supported() {
        let query = QueryParams::new()
            .underlying(vec![80.0, 100.0])
            .time_to_maturity(vec![0.5, 1.0])
            .volatility(vec![0.1, 0.2]);
        let err = coordinate(&query, &snapshot()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(
            err,
            InputError::TooManyIterableAxes {
                axes: vec![Parameter::Underlying, Parameter::Time, Parameter::Volatility]
            }
        );
    }

    #[test]
    fn test_spot_and_strike_conflict() {
        let query = QueryParams::new()
            .underlying(vec![80.0, 100.0])
            .strike(vec![90.0, 110.0]);
        let err = coordinate(&query, &snapshot()).unwrap_err();
        assert_eq!(err, InputError::ConflictingAxes);
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_single_element_lists_are_scalars() {
        let query = QueryParams::new()
            .underlying(vec![80.0, 100.0])
            .time_to_maturity(vec![0.5])
            .volatility(vec![0.3])
            .rate(vec![0.02]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (1, 2));
        assert_eq!(grid.volatility[[0, 1]], 0.3);
    }

    #[test]
    fn test_surface_does_not_count_as_axis() {
        let surface = array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]];
        let query = QueryParams::new()
            .underlying(vec![80.0, 90.0, 100.0])
            .time_to_maturity(vec![0.5, 1.0])
            .volatility(surface.clone());
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.volatility, surface);
    }

    #[test]
    fn test_surface_shape_mismatch() {
        let query = QueryParams::new()
            .underlying(vec![80.0, 90.0, 100.0])
            .rate(array![[0.01, 0.02]]);
        let err = coordinate(&query, &snapshot()).unwrap_err();
        assert_eq!(
            err,
            InputError::ShapeMismatch {
                parameter: Parameter::Rate,
                found: (1, 2),
                expected: (1, 3),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_negative_values_warn_but_proceed() {
        let query = QueryParams::new()
            .time_to_maturity(vec![-0.5, 0.5])
            .rate(-0.01);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (2, 1));
        assert_eq!(
            grid.warnings,
            vec![
                RangeWarning {
                    parameter: Parameter::Time,
                    value: -0.5
                },
                RangeWarning {
                    parameter: Parameter::Rate,
                    value: -0.01
                },
            ]
        );
    }

    #[test]
    fn test_negative_underlying_and_volatility_warn() {
        let query = QueryParams::new()
            .underlying(vec![-10.0, -20.0, 100.0])
            .volatility(-0.2);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.shape(), (1, 3));
        assert_eq!(grid.spot, array![[-10.0, -20.0, 100.0]]);
        assert_eq!(
            grid.warnings,
            vec![
                RangeWarning {
                    parameter: Parameter::Underlying,
                    value: -20.0
                },
                RangeWarning {
                    parameter: Parameter::Volatility,
                    value: -0.2
                },
            ]
        );
    }

    #[test]
    fn test_shifts_keep_labels() {
        let query = QueryParams::new()
            .underlying(vec![90.0, 100.0])
            .shifted(Parameter::Underlying, 0.5);
        let grid = coordinate(&query, &snapshot()).unwrap();
        assert_eq!(grid.spot, array![[90.5, 100.5]]);
        assert_eq!(grid.labels.cols, vec![Label::Number(90.0), Label::Number(100.0)]);
    }

    #[test]
    fn test_evaluate_routes_terminal_cells() {
        let query = QueryParams::new().time_to_maturity(vec![0.0, 1.0]);
        let grid = coordinate(&query, &snapshot()).unwrap();
        let values = grid.evaluate(|_| 1.0, |_| -1.0);
        assert_eq!(values, array![[-1.0], [1.0]]);
    }
}
