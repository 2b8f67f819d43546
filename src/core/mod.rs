//! Core types for PLS analysis.

mod options;
mod regression;
mod result;

pub use options::{Algorithm, OptionsError, PlsOptions, PlsOptionsBuilder};
pub use regression::MultivariateLinearRegression;
pub use result::{FactorDecomposition, FactorSummary, ResponseStatistics};
