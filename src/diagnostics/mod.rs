//! PLS diagnostics.
//!
//! - **VIP**: Variable Importance in Projection, the share of explained Y
//!   variance attributed to each predictor through the factor weights
//!
//! # Example
//!
//! ```rust,ignore
//! use anofox_pls::diagnostics::{important_predictors, variable_importance};
//!
//! // After fitting a model
//! let vip = variable_importance(fitted.factors());
//! let relevant = important_predictors(&vip, fitted.n_factors(), 1.0);
//! ```

mod vip;

pub use vip::{important_predictors, variable_importance};
