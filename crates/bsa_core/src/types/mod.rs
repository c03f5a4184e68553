//! Core time, parameter and error types.
//!
//! This module provides:
//! - `time`: [`Date`] in the fixed `dd-mm-YYYY` format and time-to-maturity helpers
//! - `parameter`: [`Parameter`] names of the query inputs
//! - `error`: Structured errors, the [`ErrorKind`] taxonomy and [`RangeWarning`]

pub mod error;
pub mod parameter;
pub mod time;

pub use error::{DateError, ErrorKind, InputError, RangeWarning, SolverError};
pub use parameter::Parameter;
pub use time::{expiry_from_time_to_maturity, time_to_maturity, Date, DATE_FORMAT, DAYS_PER_YEAR};
