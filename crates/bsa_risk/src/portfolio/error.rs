//! Portfolio error types.
//!
//! Insertion errors are portfolio-specific; everything raised while
//! valuing the constituents is an [`InputError`] and keeps its kind.

use thiserror::Error;

use bsa_core::types::{Date, ErrorKind, InputError};

/// Errors that can occur during portfolio operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Input error raised by a guard or by a constituent.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Constituent valued on a different date than the portfolio.
    #[error("Valuation date mismatch: portfolio is valued on {expected}, option on {found}")]
    ValuationDateMismatch {
        /// Valuation date of the portfolio
        expected: Date,
        /// Valuation date of the rejected option
        found: Date,
    },

    /// Zero or non-finite position.
    #[error("Invalid position {0}: must be finite and non-zero")]
    InvalidPosition(f64),
}

impl PortfolioError {
    /// Taxonomy kind; insertion errors are type errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortfolioError::Input(e) => e.kind(),
            _ => ErrorKind::Type,
        }
    }
}
