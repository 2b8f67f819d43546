//! Multivariate linear model produced from PLS factors.

use crate::solvers::{FittedRegressor, PlsError};
use faer::{Col, Mat};

/// A linear map `y = xB + a` from `p` inputs to `q` outputs.
///
/// Weights are oriented inputs-by-outputs: row `i` holds the contribution of
/// input `i` to every output.
#[derive(Debug, Clone)]
pub struct MultivariateLinearRegression {
    /// Weight matrix B (p x q).
    weights: Mat<f64>,
    /// Intercept vector a (q).
    intercepts: Col<f64>,
}

impl MultivariateLinearRegression {
    /// Create a model from a (p x q) weight matrix and a length-q intercept vector.
    pub fn new(weights: Mat<f64>, intercepts: Col<f64>) -> Result<Self, PlsError> {
        if weights.ncols() != intercepts.nrows() {
            return Err(PlsError::ColumnMismatch {
                expected: weights.ncols(),
                got: intercepts.nrows(),
            });
        }
        Ok(Self {
            weights,
            intercepts,
        })
    }

    /// Weight matrix B (p x q).
    pub fn weights(&self) -> &Mat<f64> {
        &self.weights
    }

    /// Intercept vector a (q).
    pub fn intercepts(&self) -> &Col<f64> {
        &self.intercepts
    }

    /// Number of input variables.
    pub fn n_inputs(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of output variables.
    pub fn n_outputs(&self) -> usize {
        self.weights.ncols()
    }

    /// Evaluate the model for a single observation.
    pub fn predict_row(&self, x: &[f64]) -> Result<Col<f64>, PlsError> {
        if x.len() != self.n_inputs() {
            return Err(PlsError::ColumnMismatch {
                expected: self.n_inputs(),
                got: x.len(),
            });
        }
        Ok(Col::from_fn(self.n_outputs(), |j| {
            let mut value = self.intercepts[j];
            for (i, &xi) in x.iter().enumerate() {
                value += xi * self.weights[(i, j)];
            }
            value
        }))
    }
}

impl FittedRegressor for MultivariateLinearRegression {
    fn predict(&self, x: &Mat<f64>) -> Result<Mat<f64>, PlsError> {
        if x.ncols() != self.n_inputs() {
            return Err(PlsError::ColumnMismatch {
                expected: self.n_inputs(),
                got: x.ncols(),
            });
        }

        let n_samples = x.nrows();
        let mut predictions = Mat::zeros(n_samples, self.n_outputs());

        for j in 0..self.n_outputs() {
            for i in 0..n_samples {
                let mut pred = self.intercepts[j];
                for k in 0..self.n_inputs() {
                    pred += x[(i, k)] * self.weights[(k, j)];
                }
                predictions[(i, j)] = pred;
            }
        }

        Ok(predictions)
    }
}
