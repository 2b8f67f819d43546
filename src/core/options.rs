//! PLS options and configuration.

use thiserror::Error;

/// Factor extraction strategy.
///
/// Both strategies produce the same output contract (scores, loadings, weights and
/// explained variance); they differ only in how each factor is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Nonlinear Iterative Partial Least Squares (Wold, 1966).
    ///
    /// Power iteration on the residual matrices with deflation of both X and Y
    /// after every factor.
    #[default]
    Nipals,
    /// Statistically Inspired Modification of PLS (de Jong, 1993).
    ///
    /// Closed-form factors from the dominant singular vector of the deflated
    /// cross-covariance matrix. No inner convergence loop.
    Simpls,
}

/// Configuration options for PLS training.
#[derive(Debug, Clone)]
pub struct PlsOptions {
    /// Number of factors to extract. `None` extracts the maximum, `min(n - 1, p)`.
    pub n_factors: Option<usize>,
    /// Factor extraction strategy (default: NIPALS).
    pub algorithm: Algorithm,
    /// Whether to scale X and Y columns to unit variance after centering (default: false).
    pub standardize: bool,
    /// Convergence and rank-exhaustion tolerance (default: 1e-10).
    pub tolerance: f64,
    /// Maximum inner iterations per NIPALS factor (default: 10 000).
    pub max_iterations: usize,
}

impl Default for PlsOptions {
    fn default() -> Self {
        Self {
            n_factors: None,
            algorithm: Algorithm::Nipals,
            standardize: false,
            tolerance: 1e-10,
            max_iterations: 10_000,
        }
    }
}

/// Errors that can occur when validating PLS options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
    #[error("n_factors must be at least 1")]
    ZeroFactors,
}

impl PlsOptions {
    /// Create a new builder for PLS options.
    pub fn builder() -> PlsOptionsBuilder {
        PlsOptionsBuilder::default()
    }

    /// Options for a NIPALS fit with the given number of factors.
    pub fn nipals(n_factors: usize) -> Self {
        Self {
            n_factors: Some(n_factors),
            ..Default::default()
        }
    }

    /// Options for a SIMPLS fit with the given number of factors.
    pub fn simpls(n_factors: usize) -> Self {
        Self {
            n_factors: Some(n_factors),
            algorithm: Algorithm::Simpls,
            ..Default::default()
        }
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        if self.n_factors == Some(0) {
            return Err(OptionsError::ZeroFactors);
        }
        Ok(())
    }
}

/// Builder for `PlsOptions`.
#[derive(Debug, Clone, Default)]
pub struct PlsOptionsBuilder {
    options: PlsOptions,
}

impl PlsOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of factors to extract.
    pub fn n_factors(mut self, n: usize) -> Self {
        self.options.n_factors = Some(n);
        self
    }

    /// Set the factor extraction strategy.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.options.algorithm = algorithm;
        self
    }

    /// Set whether to standardize X and Y columns.
    pub fn standardize(mut self, standardize: bool) -> Self {
        self.options.standardize = standardize;
        self
    }

    /// Set the convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set the NIPALS iteration cap.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Build the options, validating them.
    pub fn build(self) -> Result<PlsOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> PlsOptions {
        self.options
    }
}
