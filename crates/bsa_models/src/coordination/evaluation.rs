//! Evaluation results: aligned values, optional axis labels and warnings.

use std::fmt;

use ndarray::{Array1, Array2};

use bsa_core::types::{Date, InputError, Parameter, RangeWarning};

/// One row or column label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Label {
    /// A numeric parameter value.
    Number(f64),
    /// A valuation date.
    Date(Date),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(x) => write!(f, "{}", x),
            Label::Date(d) => write!(f, "{}", d),
        }
    }
}

/// Row and column labels of a two-axis result.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    /// Parameter varying down the rows.
    pub row_parameter: Parameter,
    /// Parameter varying across the columns.
    pub col_parameter: Parameter,
    /// One label per row.
    pub rows: Vec<Label>,
    /// One label per column.
    pub cols: Vec<Label>,
}

/// A result with redundant dimensions removed.
#[derive(Debug, Clone, PartialEq)]
pub enum Squeezed {
    /// A 1×1 result.
    Scalar(f64),
    /// A 1×n or n×1 result.
    Vector(Array1<f64>),
    /// An m×n result with m, n > 1.
    Grid(Array2<f64>),
}

/// Values of a metric over the coordinated grid.
///
/// # Examples
/// ```
/// use bsa_models::coordination::{Evaluation, Squeezed};
/// use ndarray::array;
///
/// let single = Evaluation::new(array![[4.2]]);
/// assert_eq!(single.scalar(), Some(4.2));
///
/// let row = Evaluation::new(array![[1.0, 2.0, 3.0]]);
/// assert!(matches!(row.squeeze(), Squeezed::Vector(v) if v.len() == 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    values: Array2<f64>,
    labels: Option<AxisLabels>,
    warnings: Vec<RangeWarning>,
}

impl Evaluation {
    /// Unlabelled values with no warnings.
    pub fn new(values: Array2<f64>) -> Self {
        Self {
            values,
            labels: None,
            warnings: Vec::new(),
        }
    }

    /// A 1×1 result.
    pub fn from_scalar(value: f64) -> Self {
        Self::new(Array2::from_elem((1, 1), value))
    }

    /// Attaches labels.
    pub fn with_labels(mut self, labels: Option<AxisLabels>) -> Self {
        self.labels = labels;
        self
    }

    /// Attaches range warnings.
    pub fn with_warnings(mut self, warnings: Vec<RangeWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// The values, rows × columns.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consumes the result, returning the values.
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Labels, present for labelled output only.
    pub fn labels(&self) -> Option<&AxisLabels> {
        self.labels.as_ref()
    }

    /// Range warnings raised while coordinating the inputs.
    pub fn warnings(&self) -> &[RangeWarning] {
        &self.warnings
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// The single value of a 1×1 result.
    pub fn scalar(&self) -> Option<f64> {
        match self.shape() {
            (1, 1) => self.values.first().copied(),
            _ => None,
        }
    }

    /// Removes the redundant dimensions.
    pub fn squeeze(&self) -> Squeezed {
        match self.shape() {
            (1, 1) => Squeezed::Scalar(self.values[[0, 0]]),
            (1, _) => Squeezed::Vector(self.values.row(0).to_owned()),
            (_, 1) => Squeezed::Vector(self.values.column(0).to_owned()),
            _ => Squeezed::Grid(self.values.clone()),
        }
    }

    /// Multiplies every value by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        self.values.mapv_inplace(|v| v * factor);
        self
    }

    /// `self += weight * other`, merging warnings.
    ///
    /// # Errors
    /// `MisalignedResults` when the two results are not the same shape.
    pub fn scaled_add(&mut self, weight: f64, other: &Evaluation) -> Result<(), InputError> {
        if self.shape() != other.shape() {
            return Err(InputError::MisalignedResults {
                found: other.shape(),
                expected: self.shape(),
            });
        }
        self.values.scaled_add(weight, &other.values);
        for warning in &other.warnings {
            if !self.warnings.contains(warning) {
                self.warnings.push(*warning);
            }
        }
        if self.labels.is_none() {
            self.labels = other.labels.clone();
        }
        Ok(())
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(labels) = &self.labels else {
            return write!(f, "{}", self.values);
        };
        let corner = format!(
            "{}\\{}",
            labels.row_parameter.symbol(),
            labels.col_parameter.symbol()
        );
        write!(f, "{:>12}", corner)?;
        for col in &labels.cols {
            write!(f, " {:>12}", col.to_string())?;
        }
        writeln!(f)?;
        for (row_label, row) in labels.rows.iter().zip(self.values.rows()) {
            write!(f, "{:>12}", row_label.to_string())?;
            for value in row {
                write!(f, " {:>12.6}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_squeeze_shapes() {
        assert_eq!(Evaluation::from_scalar(1.5).squeeze(), Squeezed::Scalar(1.5));
        assert_eq!(
            Evaluation::new(array![[1.0], [2.0]]).squeeze(),
            Squeezed::Vector(array![1.0, 2.0])
        );
        assert!(matches!(
            Evaluation::new(array![[1.0, 2.0], [3.0, 4.0]]).squeeze(),
            Squeezed::Grid(_)
        ));
    }

    #[test]
    fn test_scalar_only_for_single_cell() {
        assert_eq!(Evaluation::new(array![[1.0, 2.0]]).scalar(), None);
        assert_eq!(Evaluation::from_scalar(-3.0).scalar(), Some(-3.0));
    }

    #[test]
    fn test_scaled_add() {
        let mut total = Evaluation::new(array![[1.0, 2.0]]).scaled(2.0);
        let other = Evaluation::new(array![[10.0, 20.0]]).with_warnings(vec![RangeWarning {
            parameter: Parameter::Rate,
            value: -0.01,
        }]);
        total.scaled_add(-1.0, &other).unwrap();
        assert_eq!(total.values(), &array![[-8.0, -16.0]]);
        assert_eq!(total.warnings().len(), 1);

        total.scaled_add(1.0, &other).unwrap();
        assert_eq!(total.warnings().len(), 1);
    }

    #[test]
    fn test_scaled_add_shape_mismatch() {
        let mut a = Evaluation::new(array![[1.0, 2.0]]);
        let b = Evaluation::new(array![[1.0], [2.0]]);
        assert_eq!(
            a.scaled_add(1.0, &b).unwrap_err(),
            InputError::MisalignedResults {
                found: (2, 1),
                expected: (1, 2)
            }
        );
    }

    #[test]
    fn test_labelled_display() {
        let labels = AxisLabels {
            row_parameter: Parameter::Time,
            col_parameter: Parameter::Underlying,
            rows: vec![Label::Date(Date::parse("19-04-2020").unwrap())],
            cols: vec![Label::Number(90.0), Label::Number(100.0)],
        };
        let text = Evaluation::new(array![[1.0, 2.0]])
            .with_labels(Some(labels))
            .to_string();
        assert!(text.lines().next().unwrap().trim_start().starts_with("tau\\S"));
        assert!(text.contains("19-04-2020"));
        assert!(text.contains("2.000000"));
    }
}
