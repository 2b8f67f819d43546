//! Partial Least Squares regression.
//!
//! This library fits PLS models with either the NIPALS or the SIMPLS
//! algorithm and exposes the fitted latent structure: scores, loadings,
//! projection weights, explained variance, Variable Importance in Projection,
//! and linear regressions in the original variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use anofox_pls::prelude::*;
//!
//! // Fit a three-factor model with SIMPLS
//! let fitted = PlsRegressor::builder()
//!     .n_factors(3)
//!     .algorithm(Algorithm::Simpls)
//!     .build()
//!     .fit(&x, &y)?;
//!
//! // Scores of new observations on the first two factors
//! let scores = fitted.scores_for(&x_new, 2)?;
//!
//! // Regression in the original units using two factors
//! let model = fitted.build_regression(2)?;
//! let predictions = model.predict(&x_new)?;
//! ```

pub mod core;
pub mod diagnostics;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Algorithm, FactorDecomposition, FactorSummary, MultivariateLinearRegression, PlsOptions,
        PlsOptionsBuilder, ResponseStatistics,
    };
    pub use crate::diagnostics::{important_predictors, variable_importance};
    pub use crate::solvers::{
        FittedPls, FittedRegressor, PlsError, PlsRegressor, PlsRegressorBuilder, Regressor,
    };
    pub use crate::utils::ColumnStatistics;
}

pub use crate::core::{Algorithm, MultivariateLinearRegression, PlsOptions};
pub use crate::solvers::{FittedPls, FittedRegressor, PlsError, PlsRegressor, Regressor};
