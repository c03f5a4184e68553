//! Raw query parameters as supplied by callers.

use ndarray::Array2;

use bsa_core::input::{homogenize_numeric, is_numeric, to_datetime, RawInput, Values};
use bsa_core::types::{Date, InputError, Parameter};

/// Shape of the values handed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Plain arrays.
    #[default]
    Raw,
    /// Arrays carrying their row and column labels.
    Labeled,
}

/// Volatility or rate input.
///
/// An `Axis` holding several values spans one axis of the grid. A
/// `Surface` is already shaped like the grid and spans no axis.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketInput {
    /// Scalar or axis vector.
    Axis(RawInput),
    /// Pre-shaped (rows × columns) values.
    Surface(Array2<f64>),
}

impl From<RawInput> for MarketInput {
    fn from(value: RawInput) -> Self {
        MarketInput::Axis(value)
    }
}

impl From<f64> for MarketInput {
    fn from(value: f64) -> Self {
        MarketInput::Axis(value.into())
    }
}

impl From<Vec<f64>> for MarketInput {
    fn from(values: Vec<f64>) -> Self {
        MarketInput::Axis(values.into())
    }
}

impl From<&[f64]> for MarketInput {
    fn from(values: &[f64]) -> Self {
        MarketInput::Axis(values.into())
    }
}

impl<const N: usize> From<[f64; N]> for MarketInput {
    fn from(values: [f64; N]) -> Self {
        MarketInput::Axis(values.into())
    }
}

impl From<Array2<f64>> for MarketInput {
    fn from(surface: Array2<f64>) -> Self {
        MarketInput::Surface(surface)
    }
}

/// A classified time input.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeParameter {
    /// Years to expiry.
    TimeToMaturity(Values<f64>),
    /// Valuation dates, converted to years against each expiry.
    ValuationDate(Values<Date>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Shifts {
    pub(crate) underlying: f64,
    pub(crate) strike: f64,
    pub(crate) tau: f64,
    pub(crate) volatility: f64,
    pub(crate) rate: f64,
}

/// Optional overrides of an instrument's own parameters.
///
/// Every field left unset falls back to the snapshot the queried
/// instrument was built with.
///
/// # Examples
/// ```
/// use bsa_models::coordination::{OutputFormat, QueryParams};
///
/// let query = QueryParams::new()
///     .underlying(vec![80.0, 90.0, 100.0])
///     .time(vec!["19-05-2020", "19-06-2020"])
///     .output(OutputFormat::Labeled);
/// assert!(!query.has_strike());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub(crate) underlying: Option<RawInput>,
    pub(crate) strike: Option<RawInput>,
    pub(crate) time: Option<RawInput>,
    pub(crate) tau: Option<RawInput>,
    pub(crate) valuation_date: Option<RawInput>,
    pub(crate) volatility: Option<MarketInput>,
    pub(crate) rate: Option<MarketInput>,
    pub(crate) output: OutputFormat,
    pub(crate) scale: Option<f64>,
    pub(crate) shifts: Shifts,
}

impl QueryParams {
    /// A query with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Underlying level(s) S.
    pub fn underlying(mut self, value: impl Into<RawInput>) -> Self {
        self.underlying = Some(value.into());
        self
    }

    /// Strike(s) K.
    pub fn strike(mut self, value: impl Into<RawInput>) -> Self {
        self.strike = Some(value.into());
        self
    }

    /// Time given either as years to expiry (numbers) or as valuation dates.
    pub fn time(mut self, value: impl Into<RawInput>) -> Self {
        self.time = Some(value.into());
        self
    }

    /// Years to expiry τ.
    pub fn time_to_maturity(mut self, value: impl Into<RawInput>) -> Self {
        self.tau = Some(value.into());
        self
    }

    /// Valuation date(s) t.
    pub fn valuation_date(mut self, value: impl Into<RawInput>) -> Self {
        self.valuation_date = Some(value.into());
        self
    }

    /// Volatility σ: scalar, axis vector or surface.
    pub fn volatility(mut self, value: impl Into<MarketInput>) -> Self {
        self.volatility = Some(value.into());
        self
    }

    /// Rate r: scalar, axis vector or surface.
    pub fn rate(mut self, value: impl Into<MarketInput>) -> Self {
        self.rate = Some(value.into());
        self
    }

    /// Output format of the result.
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Overrides the rescaling factor of theta, vega or rho.
    pub fn scale(mut self, factor: f64) -> Self {
        self.scale = Some(factor);
        self
    }

    /// Adds `amount` to every coordinated value of `parameter`.
    ///
    /// Labels keep the unshifted values, so shifted and unshifted results
    /// line up cell by cell.
    pub fn shifted(mut self, parameter: Parameter, amount: f64) -> Self {
        let slot = match parameter {
            Parameter::Underlying => &mut self.shifts.underlying,
            Parameter::Strike => &mut self.shifts.strike,
            Parameter::Time => &mut self.shifts.tau,
            Parameter::Volatility => &mut self.shifts.volatility,
            Parameter::Rate => &mut self.shifts.rate,
        };
        *slot += amount;
        self
    }

    /// Returns true if a strike override is present.
    pub fn has_strike(&self) -> bool {
        self.strike.is_some()
    }

    /// Requested output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output
    }

    /// Requested rescaling override.
    pub fn scale_override(&self) -> Option<f64> {
        self.scale
    }

    /// Classifies the time input, if any.
    ///
    /// # Errors
    /// - `MultipleTimeParameters` when more than one time input is set
    /// - Type and format errors from classification
    pub fn resolve_time(&self) -> Result<Option<TimeParameter>, InputError> {
        let supplied: Vec<&'static str> = [
            ("time", self.time.is_some()),
            ("time_to_maturity", self.tau.is_some()),
            ("valuation_date", self.valuation_date.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
        if supplied.len() > 1 {
            return Err(InputError::MultipleTimeParameters { found: supplied });
        }

        if let Some(tau) = &self.tau {
            let values = homogenize_numeric(tau, Parameter::Time)?;
            return Ok(Some(TimeParameter::TimeToMaturity(values)));
        }
        if let Some(dates) = &self.valuation_date {
            return Ok(Some(TimeParameter::ValuationDate(to_datetime(dates)?)));
        }
        match &self.time {
            None => Ok(None),
            Some(time) if is_numeric(time, Parameter::Time)? => Ok(Some(
                TimeParameter::TimeToMaturity(homogenize_numeric(time, Parameter::Time)?),
            )),
            Some(time) => Ok(Some(TimeParameter::ValuationDate(to_datetime(time)?))),
        }
    }
}
