//! Type and shape predicates over raw parameter values.
//!
//! Classification is the only place that inspects what a caller passed;
//! everything downstream receives [`Values`] of a single known type.

use std::cmp::Ordering;
use std::mem::discriminant;

use super::raw::{Atom, RawInput, Values};
use crate::types::{Date, DateError, InputError, Parameter};

/// True if `x` can be iterated. Text counts, since it is a sequence of characters.
pub fn is_iterable(x: &RawInput) -> bool {
    match x {
        RawInput::List(_) => true,
        RawInput::Atom(Atom::Text(_)) => true,
        RawInput::Atom(_) => false,
    }
}

/// True if `x` is a collection. Text is treated as one atomic date value.
pub fn is_iterable_not_string(x: &RawInput) -> bool {
    matches!(x, RawInput::List(_))
}

/// Checks that every element of a collection carries the same type.
///
/// # Errors
/// `InputError::HeterogeneousCollection` listing the distinct types found.
///
/// # Examples
/// ```
/// use bsa_core::input::{test_same_type, Atom};
///
/// assert!(test_same_type(&[Atom::Number(1.0), Atom::Number(2.0)]).is_ok());
/// assert!(test_same_type(&[Atom::Number(1.0), Atom::Text("01-01-2020".into())]).is_err());
/// ```
pub fn test_same_type(items: &[Atom]) -> Result<(), InputError> {
    let Some(first) = items.first() else {
        return Ok(());
    };
    let kind = discriminant(first);
    if items.iter().all(|a| discriminant(a) == kind) {
        return Ok(());
    }
    let mut types: Vec<&'static str> = Vec::new();
    for item in items {
        let name = item.type_name();
        if !types.contains(&name) {
            types.push(name);
        }
    }
    Err(InputError::HeterogeneousCollection { types })
}

/// Checks that `text` is a date in `dd-mm-YYYY` format.
pub fn test_valid_format(text: &str) -> Result<(), DateError> {
    Date::parse(text).map(|_| ())
}

fn first_atom(x: &RawInput, parameter: Parameter) -> Result<&Atom, InputError> {
    let atoms = x.atoms();
    test_same_type(atoms)?;
    atoms
        .first()
        .ok_or(InputError::EmptyCollection { parameter })
}

/// True if `x` holds numbers.
///
/// Collections must be homogeneous and are classified by their first element.
pub fn is_numeric(x: &RawInput, parameter: Parameter) -> Result<bool, InputError> {
    Ok(matches!(first_atom(x, parameter)?, Atom::Number(_)))
}

/// True if `x` holds dates, either parsed or as valid `dd-mm-YYYY` text.
///
/// # Errors
/// A heterogeneous collection is a type error; text that is not a valid
/// date is a format error.
///
/// # Examples
/// ```
/// use bsa_core::input::{is_date, RawInput};
/// use bsa_core::types::{ErrorKind, Parameter};
///
/// let t: RawInput = vec!["01-06-2020", "15-06-2020"].into();
/// assert!(is_date(&t, Parameter::Time).unwrap());
///
/// let bad: RawInput = "2020/06/01".into();
/// assert_eq!(is_date(&bad, Parameter::Time).unwrap_err().kind(), ErrorKind::Format);
/// ```
pub fn is_date(x: &RawInput, parameter: Parameter) -> Result<bool, InputError> {
    match first_atom(x, parameter)? {
        Atom::Date(_) => Ok(true),
        Atom::Text(_) => {
            for atom in x.atoms() {
                if let Atom::Text(text) = atom {
                    test_valid_format(text)?;
                }
            }
            Ok(true)
        }
        Atom::Number(_) => Ok(false),
    }
}

/// Collapses a one-element collection to its bare value.
pub fn scalarize<T>(mut values: Vec<T>) -> Values<T> {
    if values.len() == 1 {
        if let Some(only) = values.pop() {
            return Values::Scalar(only);
        }
    }
    Values::Vector(values)
}

/// Orders a homogeneous collection and scalarizes it.
///
/// With `sort` false the input order is kept.
pub fn homogenize<T, F>(mut values: Vec<T>, sort: bool, compare: F) -> Values<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if sort {
        values.sort_by(compare);
    }
    scalarize(values)
}

/// Classifies a numeric parameter into ascending [`Values`].
///
/// # Errors
/// Empty or heterogeneous collections, and non-numeric values.
///
/// # Examples
/// ```
/// use bsa_core::input::{homogenize_numeric, RawInput, Values};
/// use bsa_core::types::Parameter;
///
/// let s: RawInput = vec![120.0, 80.0, 100.0].into();
/// assert_eq!(
///     homogenize_numeric(&s, Parameter::Underlying).unwrap(),
///     Values::Vector(vec![80.0, 100.0, 120.0])
/// );
///
/// let single: RawInput = vec![90.0].into();
/// assert_eq!(homogenize_numeric(&single, Parameter::Underlying).unwrap(), Values::Scalar(90.0));
/// ```
pub fn homogenize_numeric(x: &RawInput, parameter: Parameter) -> Result<Values<f64>, InputError> {
    let first = first_atom(x, parameter)?;
    if !matches!(first, Atom::Number(_)) {
        return Err(InputError::UnrecognisedType {
            parameter,
            found: first.type_name(),
        });
    }
    let numbers: Vec<f64> = x
        .atoms()
        .iter()
        .filter_map(|a| match a {
            Atom::Number(v) => Some(*v),
            _ => None,
        })
        .collect();
    match x {
        RawInput::Atom(_) => Ok(scalarize(numbers)),
        RawInput::List(_) => Ok(homogenize(numbers, true, |a, b| a.total_cmp(b))),
    }
}

/// Classifies a date parameter into chronologically ordered [`Values`].
pub fn homogenize_dates(x: &RawInput, parameter: Parameter) -> Result<Values<Date>, InputError> {
    if !is_date(x, parameter)? {
        return Err(InputError::UnrecognisedType {
            parameter,
            found: "number",
        });
    }
    let dates = x
        .atoms()
        .iter()
        .map(|a| match a {
            Atom::Date(d) => Ok(*d),
            Atom::Text(text) => Date::parse(text).map_err(InputError::from),
            Atom::Number(_) => Err(InputError::UnrecognisedType {
                parameter,
                found: "number",
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(homogenize(dates, true, |a, b| a.cmp(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn test_iterability() {
        let text: RawInput = "01-06-2020".into();
        let number: RawInput = 1.0.into();
        let list: RawInput = vec![1.0, 2.0].into();

        assert!(is_iterable(&text));
        assert!(!is_iterable_not_string(&text));
        assert!(!is_iterable(&number));
        assert!(is_iterable(&list));
        assert!(is_iterable_not_string(&list));
    }

    #[test]
    fn test_heterogeneous_collection_rejected() {
        let mixed = RawInput::List(vec![
            Atom::Number(1.0),
            Atom::Text("01-06-2020".into()),
            Atom::Number(2.0),
        ]);
        let err = is_numeric(&mixed, Parameter::Time).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(
            err,
            InputError::HeterogeneousCollection {
                types: vec!["number", "text"]
            }
        );
    }

    #[test]
    fn test_numeric_and_date_classification() {
        let numbers: RawInput = vec![0.1, 0.2].into();
        assert!(is_numeric(&numbers, Parameter::Time).unwrap());
        assert!(!is_date(&numbers, Parameter::Time).unwrap());

        let dates: RawInput = vec![date("01-06-2020")].into();
        assert!(is_date(&dates, Parameter::Time).unwrap());
        assert!(!is_numeric(&dates, Parameter::Time).unwrap());
    }

    #[test]
    fn test_empty_collection() {
        let empty: RawInput = Vec::<f64>::new().into();
        assert_eq!(
            is_numeric(&empty, Parameter::Underlying).unwrap_err(),
            InputError::EmptyCollection {
                parameter: Parameter::Underlying
            }
        );
    }

    #[test]
    fn test_invalid_text_in_collection_is_format_error() {
        let texts: RawInput = vec!["01-06-2020", "June 2020"].into();
        let err = is_date(&texts, Parameter::Time).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_scalarize() {
        assert_eq!(scalarize(vec![3.0]), Values::Scalar(3.0));
        assert_eq!(scalarize(vec![1.0, 2.0]), Values::Vector(vec![1.0, 2.0]));
    }

    #[test]
    fn test_homogenize_custom_order() {
        let v = homogenize(vec![1.0, 3.0, 2.0], true, |a: &f64, b: &f64| b.total_cmp(a));
        assert_eq!(v, Values::Vector(vec![3.0, 2.0, 1.0]));
        let kept = homogenize(vec![1.0, 3.0, 2.0], false, |a: &f64, b: &f64| a.total_cmp(b));
        assert_eq!(kept, Values::Vector(vec![1.0, 3.0, 2.0]));
    }

    #[test]
    fn test_homogenize_numeric_rejects_dates() {
        let t: RawInput = "01-06-2020".into();
        assert_eq!(
            homogenize_numeric(&t, Parameter::Volatility).unwrap_err(),
            InputError::UnrecognisedType {
                parameter: Parameter::Volatility,
                found: "text"
            }
        );
    }

    #[test]
    fn test_homogenize_dates_sorts_chronologically() {
        let t: RawInput = vec!["30-06-2021", "31-12-2020", "01-06-2020"].into();
        let dates = homogenize_dates(&t, Parameter::Time).unwrap();
        assert_eq!(
            dates,
            Values::Vector(vec![
                date("01-06-2020"),
                date("31-12-2020"),
                date("30-06-2021")
            ])
        );
    }
}
