//! Calendar dates and time-to-maturity arithmetic.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate, written and
//!   parsed in the fixed `dd-mm-YYYY` format
//! - `time_to_maturity`: Year fraction between two dates on an Act/365 basis
//! - `expiry_from_time_to_maturity`: The inverse, rounding up to whole days
//!
//! # Examples
//!
//! ```
//! use bsa_core::types::time::{expiry_from_time_to_maturity, time_to_maturity, Date};
//!
//! let t = Date::parse("19-04-2020").unwrap();
//! let expiry = Date::parse("31-12-2020").unwrap();
//!
//! let tau = time_to_maturity(t, expiry);
//! assert!((tau - 256.0 / 365.0).abs() < 1e-12);
//! assert_eq!(expiry_from_time_to_maturity(t, tau), expiry);
//! ```

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Text format of every date accepted or produced by the library.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Calendar days per year used for time-to-maturity.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use bsa_core::types::time::Date;
///
/// let date = Date::from_ymd(2020, 12, 31).unwrap();
/// assert_eq!(date.to_string(), "31-12-2020");
///
/// let parsed: Date = "31-12-2020".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let start = Date::from_ymd(2020, 1, 1).unwrap();
/// assert_eq!(date - start, 365);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    /// Earliest representable date.
    pub const MIN: Date = Date(NaiveDate::MIN);

    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use bsa_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2020, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2021, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Parses a date written as `dd-mm-YYYY`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bsa_core::types::time::Date;
    ///
    /// let date = Date::parse("01-06-2020").unwrap();
    /// assert_eq!(date.month(), 6);
    ///
    /// // ISO order is rejected
    /// assert!(Date::parse("2020-06-01").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("'{}' is not dd-mm-YYYY: {}", s, e)))
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// Saturates at chrono's representable range.
    pub fn add_days(self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        match shifted {
            Some(date) => Date(date),
            None if days >= 0 => Date(NaiveDate::MAX),
            None => Date(NaiveDate::MIN),
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    ///
    /// The result is positive if `self` is after `other`, negative otherwise.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Time-to-maturity in years between valuation date `t` and expiry.
///
/// Negative when `t` lies after the expiry; callers warn rather than fail.
///
/// # Examples
///
/// ```
/// use bsa_core::types::time::{time_to_maturity, Date};
///
/// let t = Date::parse("01-01-2021").unwrap();
/// let expiry = Date::parse("31-12-2020").unwrap();
/// assert!((time_to_maturity(t, expiry) + 1.0 / 365.0).abs() < 1e-15);
/// ```
pub fn time_to_maturity(valuation_date: Date, expiry: Date) -> f64 {
    (expiry - valuation_date) as f64 / DAYS_PER_YEAR
}

/// Expiry implied by a time-to-maturity: `t + ceil(tau * 365)` days.
///
/// Values within 1e-9 of a whole day count as that day, so a `tau` produced
/// by [`time_to_maturity`] maps back onto the same expiry.
pub fn expiry_from_time_to_maturity(valuation_date: Date, tau: f64) -> Date {
    let days = tau * DAYS_PER_YEAR;
    let nearest = days.round();
    let whole = if (days - nearest).abs() < 1e-9 {
        nearest
    } else {
        days.ceil()
    };
    valuation_date.add_days(whole as i64)
}
