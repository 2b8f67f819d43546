//! Core traits and errors for PLS estimators.

use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during PLS training or when using a trained model.
#[derive(Debug, Error)]
pub enum PlsError {
    #[error("empty input: {0} has no rows or no columns")]
    EmptyInput(&'static str),

    #[error("dimension mismatch: X has {x_rows} rows but Y has {y_rows} rows")]
    RowCountMismatch { x_rows: usize, y_rows: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error("invalid number of factors: requested {requested}, allowed 1..={max}")]
    InvalidFactorCount { requested: usize, max: usize },

    #[error("non-finite value in {matrix} at row {row}, column {column}")]
    NonFiniteValue {
        matrix: &'static str,
        row: usize,
        column: usize,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::core::OptionsError),

    #[error("dimension mismatch: expected {expected} columns, got {got}")]
    ColumnMismatch { expected: usize, got: usize },

    #[error("requested {requested} dimensions but only {available} factors are available")]
    DimensionsExceedFactors { requested: usize, available: usize },

    #[error("column {column} of {matrix} has zero standard deviation and cannot be standardized")]
    ZeroStandardDeviation { matrix: &'static str, column: usize },

    #[error("factor {factor} did not converge after {iterations} iterations")]
    ConvergenceFailed { factor: usize, iterations: usize },

    #[error("data carries no extractable covariance structure")]
    DegenerateData,

    #[error("matrix is singular or nearly singular")]
    SingularMatrix,

    #[error("decomposition failed: {0}")]
    DecompositionFailed(String),
}

/// A PLS estimator that can be fit to paired input/output data.
///
/// Fitting returns an immutable fitted model; re-training produces a new one.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `x` - Input matrix of shape (n_samples, n_features)
    /// * `y` - Output matrix of shape (n_samples, n_responses)
    fn fit(&self, x: &Mat<f64>, y: &Mat<f64>) -> Result<Self::Fitted, PlsError>;
}

/// A fitted model that maps inputs to one or more responses.
pub trait FittedRegressor {
    /// Make predictions on new data.
    ///
    /// # Arguments
    /// * `x` - Input matrix of shape (n_samples, n_features)
    ///
    /// # Returns
    /// Predicted values of shape (n_samples, n_responses).
    fn predict(&self, x: &Mat<f64>) -> Result<Mat<f64>, PlsError>;

    /// Calculate R² for every response column on new data.
    ///
    /// # Arguments
    /// * `x` - Input matrix
    /// * `y` - True output values
    fn score(&self, x: &Mat<f64>, y: &Mat<f64>) -> Result<Col<f64>, PlsError> {
        if x.nrows() != y.nrows() {
            return Err(PlsError::RowCountMismatch {
                x_rows: x.nrows(),
                y_rows: y.nrows(),
            });
        }
        let predictions = self.predict(x)?;
        if predictions.ncols() != y.ncols() {
            return Err(PlsError::ColumnMismatch {
                expected: predictions.ncols(),
                got: y.ncols(),
            });
        }

        let n = y.nrows();
        let mut scores = Col::zeros(y.ncols());

        for j in 0..y.ncols() {
            let y_mean: f64 = (0..n).map(|i| y[(i, j)]).sum::<f64>() / n as f64;
            let tss: f64 = (0..n).map(|i| (y[(i, j)] - y_mean).powi(2)).sum();
            let rss: f64 = (0..n)
                .map(|i| (y[(i, j)] - predictions[(i, j)]).powi(2))
                .sum();

            scores[j] = if tss == 0.0 {
                // Perfect prediction of constant target
                if rss == 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                1.0 - rss / tss
            };
        }

        Ok(scores)
    }
}
