//! Raw parameter values as they arrive at the query boundary.

use crate::types::Date;

/// A single untyped value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// A plain number.
    Number(f64),
    /// Text, expected to hold a `dd-mm-YYYY` date.
    Text(String),
    /// An already-parsed date.
    Date(Date),
}

impl Atom {
    /// Name of the carried type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::Number(_) => "number",
            Atom::Text(_) => "text",
            Atom::Date(_) => "date",
        }
    }
}

/// A query parameter before classification: one value or a flat collection.
///
/// # Examples
/// ```
/// use bsa_core::input::{Atom, RawInput};
///
/// let spot: RawInput = vec![80.0, 100.0, 120.0].into();
/// assert!(matches!(spot, RawInput::List(ref v) if v.len() == 3));
///
/// let t: RawInput = "01-06-2020".into();
/// assert_eq!(t, RawInput::Atom(Atom::Text("01-06-2020".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A single value.
    Atom(Atom),
    /// A collection of values.
    List(Vec<Atom>),
}

impl RawInput {
    /// Number of carried values (1 for an atom).
    pub fn len(&self) -> usize {
        match self {
            RawInput::Atom(_) => 1,
            RawInput::List(items) => items.len(),
        }
    }

    /// Returns true for an empty collection.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The carried values as a slice.
    pub fn atoms(&self) -> &[Atom] {
        match self {
            RawInput::Atom(atom) => std::slice::from_ref(atom),
            RawInput::List(items) => items,
        }
    }
}

impl From<Atom> for RawInput {
    fn from(atom: Atom) -> Self {
        RawInput::Atom(atom)
    }
}

impl From<f64> for RawInput {
    fn from(value: f64) -> Self {
        RawInput::Atom(Atom::Number(value))
    }
}

impl From<&str> for RawInput {
    fn from(value: &str) -> Self {
        RawInput::Atom(Atom::Text(value.to_string()))
    }
}

impl From<String> for RawInput {
    fn from(value: String) -> Self {
        RawInput::Atom(Atom::Text(value))
    }
}

impl From<Date> for RawInput {
    fn from(value: Date) -> Self {
        RawInput::Atom(Atom::Date(value))
    }
}

impl From<Vec<f64>> for RawInput {
    fn from(values: Vec<f64>) -> Self {
        RawInput::List(values.into_iter().map(Atom::Number).collect())
    }
}

impl From<&[f64]> for RawInput {
    fn from(values: &[f64]) -> Self {
        RawInput::List(values.iter().copied().map(Atom::Number).collect())
    }
}

impl<const N: usize> From<[f64; N]> for RawInput {
    fn from(values: [f64; N]) -> Self {
        RawInput::List(values.into_iter().map(Atom::Number).collect())
    }
}

impl From<Vec<&str>> for RawInput {
    fn from(values: Vec<&str>) -> Self {
        RawInput::List(
            values
                .into_iter()
                .map(|s| Atom::Text(s.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for RawInput {
    fn from(values: Vec<String>) -> Self {
        RawInput::List(values.into_iter().map(Atom::Text).collect())
    }
}

impl From<Vec<Date>> for RawInput {
    fn from(values: Vec<Date>) -> Self {
        RawInput::List(values.into_iter().map(Atom::Date).collect())
    }
}

impl From<Vec<Atom>> for RawInput {
    fn from(values: Vec<Atom>) -> Self {
        RawInput::List(values)
    }
}

/// A classified parameter: a scalar or an ordered vector of one type.
#[derive(Debug, Clone, PartialEq)]
pub enum Values<T> {
    /// A single value.
    Scalar(T),
    /// Two or more values (or one, when scalarization was not requested).
    Vector(Vec<T>),
}

impl<T> Values<T> {
    /// Returns true for the scalar variant.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Values::Scalar(_))
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Values::Scalar(_) => 1,
            Values::Vector(v) => v.len(),
        }
    }

    /// Returns true for an empty vector.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The values as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Values::Scalar(x) => std::slice::from_ref(x),
            Values::Vector(v) => v,
        }
    }

    /// Applies `f` to every value, preserving the variant.
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Values<U> {
        match self {
            Values::Scalar(x) => Values::Scalar(f(x)),
            Values::Vector(v) => Values::Vector(v.iter().map(f).collect()),
        }
    }
}

impl<T: Clone> Values<T> {
    /// The values as an owned vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_type_names() {
        assert_eq!(Atom::Number(1.0).type_name(), "number");
        assert_eq!(Atom::Text("x".into()).type_name(), "text");
        let d = Date::from_ymd(2020, 1, 1).unwrap();
        assert_eq!(Atom::Date(d).type_name(), "date");
    }

    #[test]
    fn test_raw_input_conversions() {
        let r: RawInput = [1.0, 2.0].into();
        assert_eq!(r.len(), 2);
        assert_eq!(r.atoms()[1], Atom::Number(2.0));

        let r: RawInput = 3.0.into();
        assert_eq!(r.len(), 1);
        assert!(!r.is_empty());

        let r: RawInput = Vec::<f64>::new().into();
        assert!(r.is_empty());
    }

    #[test]
    fn test_values_helpers() {
        let v = Values::Vector(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert!(!v.is_scalar());
        assert_eq!(v.map(|x| x * 2.0).to_vec(), vec![2.0, 4.0, 6.0]);

        let s = Values::Scalar(5.0);
        assert!(s.is_scalar());
        assert_eq!(s.as_slice(), &[5.0]);
    }
}
