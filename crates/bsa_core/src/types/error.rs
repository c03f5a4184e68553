//! Structured error types for analytics operations.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `InputError`: Fatal errors raised while classifying and coordinating query inputs
//! - `ErrorKind`: The coarse taxonomy (format, type, not-supported) every `InputError` belongs to
//! - `RangeWarning`: Non-fatal out-of-range parameter notices
//! - `SolverError`: Errors from root-finding and least-squares solvers

use std::fmt;
use thiserror::Error;

use super::parameter::Parameter;

/// Date-related errors.
///
/// # Variants
/// - `InvalidDate`: Components do not form a calendar date
/// - `ParseError`: Text does not match the `dd-mm-YYYY` format
///
/// # Examples
/// ```
/// use bsa_core::types::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 30-2-2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    ParseError(String),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::InvalidDate { year, month, day } => {
                write!(f, "Invalid date: {}-{}-{}", day, month, year)
            }
            DateError::ParseError(msg) => write!(f, "Date parse error: {}", msg),
        }
    }
}

impl std::error::Error for DateError {}

/// Coarse error taxonomy.
///
/// Every fatal [`InputError`] maps onto exactly one kind, so callers can
/// branch on the category without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed date text.
    Format,
    /// Wrong, mixed or conflicting parameter types.
    Type,
    /// A structurally valid request the engine refuses to evaluate.
    NotSupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Format => "FormatKind",
            ErrorKind::Type => "TypeKind",
            ErrorKind::NotSupported => "NotSupported",
        };
        f.write_str(name)
    }
}

/// Fatal input errors.
///
/// Any of these aborts the whole requested computation; no partial
/// result is produced.
///
/// # Examples
/// ```
/// use bsa_core::types::{ErrorKind, InputError, Parameter};
///
/// let err = InputError::TooManyIterableAxes {
///     axes: vec![Parameter::Underlying, Parameter::Time, Parameter::Volatility],
/// };
/// assert_eq!(err.kind(), ErrorKind::NotSupported);
/// assert!(format!("{}", err).contains("S, tau, sigma"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A date string does not match the fixed format.
    #[error(transparent)]
    Format(#[from] DateError),

    /// A collection mixes element types.
    #[error("Heterogeneous collection: found element types {types:?}")]
    HeterogeneousCollection {
        /// Distinct element type names, in order of appearance
        types: Vec<&'static str>,
    },

    /// An iterable parameter with no elements.
    #[error("Parameter {parameter} was given an empty collection")]
    EmptyCollection {
        /// Offending parameter
        parameter: Parameter,
    },

    /// A parameter carries a value of a type it cannot accept.
    #[error("Parameter {parameter} does not accept {found} values")]
    UnrecognisedType {
        /// Offending parameter
        parameter: Parameter,
        /// Type name of the rejected value
        found: &'static str,
    },

    /// Option type text other than `call`/`put`.
    #[error("Unknown option type '{0}': expected 'call' or 'put'")]
    UnknownOptionType(String),

    /// More than one time representation supplied to a single query.
    #[error("At most one time parameter may be given, found: {found:?}")]
    MultipleTimeParameters {
        /// Names of the time parameters that were supplied
        found: Vec<&'static str>,
    },

    /// Numeric time-to-maturity requested from a portfolio with several expiries.
    #[error(
        "Time-to-maturity is ambiguous for a multi-horizon portfolio; pass a valuation date instead"
    )]
    TimeToMaturityOnMultiHorizon,

    /// Strike supplied as a query parameter to a portfolio.
    #[error("Strike cannot be a pricing parameter of a portfolio")]
    StrikeOnPortfolio,

    /// A pre-shaped surface does not match the coordinated grid.
    #[error("Parameter {parameter} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Offending parameter
        parameter: Parameter,
        /// Shape received
        found: (usize, usize),
        /// Shape required by the coordinated grid
        expected: (usize, usize),
    },

    /// More than two parameters supplied as iterable axes.
    #[error("At most two iterable parameters are supported, found: {}", join(.axes))]
    TooManyIterableAxes {
        /// Parameters supplied as iterables
        axes: Vec<Parameter>,
    },

    /// Underlying and strike both supplied as iterables.
    #[error("Underlying and strike cannot both be iterable")]
    ConflictingAxes,

    /// Target prices that cannot be broadcast onto the coordinated grid.
    #[error("Target prices of shape {found:?} do not broadcast to {expected:?}")]
    TargetShapeMismatch {
        /// Shape received
        found: (usize, usize),
        /// Shape of the coordinated grid
        expected: (usize, usize),
    },

    /// Two evaluations that should share a grid do not.
    #[error("Evaluations of shape {found:?} and {expected:?} cannot be combined")]
    MisalignedResults {
        /// Shape of the evaluation being added
        found: (usize, usize),
        /// Shape of the accumulated evaluation
        expected: (usize, usize),
    },

    /// A metric the valued object does not define.
    #[error("Metric {metric} is not defined for {target}")]
    UnsupportedMetric {
        /// Metric name
        metric: &'static str,
        /// Kind of object queried
        target: &'static str,
    },
}

fn join(axes: &[Parameter]) -> String {
    axes.iter()
        .map(|p| p.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}

impl InputError {
    /// Returns the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InputError::Format(_) => ErrorKind::Format,
            InputError::TooManyIterableAxes { .. }
            | InputError::ConflictingAxes
            | InputError::UnsupportedMetric { .. } => ErrorKind::NotSupported,
            _ => ErrorKind::Type,
        }
    }
}

/// Non-fatal notice that a parameter carries a financially suspicious value.
///
/// Computation proceeds with the value as supplied; the warning is
/// returned alongside the result and logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeWarning {
    /// Parameter carrying the value
    pub parameter: Parameter,
    /// Smallest (most negative) offending value
    pub value: f64,
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let note = match self.parameter {
            Parameter::Time => "valuation after expiry",
            Parameter::Rate => "negative rate regime",
            Parameter::Volatility => "no financial meaning",
            _ => "unexpected sign",
        };
        write!(
            f,
            "Negative {} encountered ({}): {}",
            self.parameter.symbol(),
            self.value,
            note
        )
    }
}

/// Solver-specific errors.
///
/// # Examples
/// ```
/// use bsa_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where derivative was near zero
        x: f64,
    },

    /// Least-squares iteration stalled without meeting the tolerance.
    #[error("No progress: residual {residual} above tolerance")]
    NoProgress {
        /// Final residual norm
        residual: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}
