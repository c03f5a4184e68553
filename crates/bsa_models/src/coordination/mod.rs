//! Parameter coordination: from raw query inputs to aligned grids.
//!
//! - [`QueryParams`]: The optional overrides a caller supplies
//! - [`coordinate`]: Classification, axis selection and broadcasting
//! - [`Evaluation`]: Values of one metric over the grid, with labels and warnings

mod evaluation;
mod grid;
mod query;

pub use evaluation::{AxisLabels, Evaluation, Label, Squeezed};
pub use grid::{coordinate, CoordinatedParameters, Snapshot};
pub use query::{MarketInput, OutputFormat, QueryParams, TimeParameter};
