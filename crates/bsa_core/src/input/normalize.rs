//! Conversions between date text, parsed dates and time-to-maturity.

use super::classify::homogenize_dates;
use super::raw::{RawInput, Values};
use crate::types::{Date, InputError, Parameter};

/// Parses date text (or a collection of it) into chronologically sorted dates.
///
/// Parsed dates pass through unchanged.
///
/// # Examples
/// ```
/// use bsa_core::input::{to_datetime, Values};
/// use bsa_core::types::Date;
///
/// let d = to_datetime(&"31-12-2020".into()).unwrap();
/// assert_eq!(d, Values::Scalar(Date::from_ymd(2020, 12, 31).unwrap()));
/// ```
pub fn to_datetime(x: &RawInput) -> Result<Values<Date>, InputError> {
    homogenize_dates(x, Parameter::Time)
}

/// Formats dates as `dd-mm-YYYY` text, preserving scalar or vector shape.
pub fn to_date_string(dates: &Values<Date>) -> Values<String> {
    dates.map(|d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_to_datetime_collection() {
        let raw: RawInput = vec!["30-06-2021", "31-12-2020"].into();
        let dates = to_datetime(&raw).unwrap();
        assert_eq!(
            to_date_string(&dates),
            Values::Vector(vec!["31-12-2020".to_string(), "30-06-2021".to_string()])
        );
    }

    #[test]
    fn test_to_datetime_rejects_numbers() {
        let raw: RawInput = 0.5.into();
        assert_eq!(to_datetime(&raw).unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn test_to_datetime_rejects_bad_text() {
        let raw: RawInput = "31-13-2020".into();
        assert_eq!(to_datetime(&raw).unwrap_err().kind(), ErrorKind::Format);
    }

    proptest! {
        #[test]
        fn prop_date_string_round_trip(offset in -20_000i64..20_000) {
            let d = Date::from_ymd(2000, 1, 1).unwrap().add_days(offset);
            let text = to_date_string(&Values::Scalar(d));
            let Values::Scalar(s) = text else { panic!("shape changed") };
            prop_assert_eq!(to_datetime(&s.as_str().into()).unwrap(), Values::Scalar(d));
        }
    }
}
