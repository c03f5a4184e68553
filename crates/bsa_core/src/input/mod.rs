//! Raw query inputs and their classification.
//!
//! This module provides:
//! - `raw`: [`Atom`], [`RawInput`] and the classified [`Values`] container
//! - `classify`: Iterability, type and format predicates plus sorting/scalarizing
//! - `normalize`: Date text to date conversions

pub mod classify;
pub mod normalize;
pub mod raw;

pub use classify::{
    homogenize, homogenize_dates, homogenize_numeric, is_date, is_iterable,
    is_iterable_not_string, is_numeric, scalarize, test_same_type, test_valid_format,
};
pub use normalize::{to_date_string, to_datetime};
pub use raw::{Atom, RawInput, Values};
