//! Matrix utility functions and column preprocessing.

use crate::solvers::PlsError;
use faer::{Col, Mat};

/// Per-column centering (and optionally scaling) statistics.
///
/// Computed once from training data and reused unchanged for every later
/// projection, so new data is always adjusted with the training means and
/// standard deviations.
#[derive(Debug, Clone)]
pub struct ColumnStatistics {
    means: Col<f64>,
    std_devs: Option<Col<f64>>,
}

impl ColumnStatistics {
    /// Build statistics from precomputed column means and optional standard deviations.
    ///
    /// Fails if the vectors differ in length or any standard deviation is zero
    /// (or non-finite); a constant column cannot be standardized.
    pub fn new(
        means: Col<f64>,
        std_devs: Option<Col<f64>>,
        matrix: &'static str,
    ) -> Result<Self, PlsError> {
        if let Some(ref sd) = std_devs {
            if sd.nrows() != means.nrows() {
                return Err(PlsError::ColumnMismatch {
                    expected: means.nrows(),
                    got: sd.nrows(),
                });
            }
            for j in 0..sd.nrows() {
                if sd[j] == 0.0 || !sd[j].is_finite() {
                    return Err(PlsError::ZeroStandardDeviation { matrix, column: j });
                }
            }
        }
        Ok(Self { means, std_devs })
    }

    /// Compute means (and sample standard deviations if `standardize`) from data.
    pub fn from_data(x: &Mat<f64>, standardize: bool, matrix: &'static str) -> Result<Self, PlsError> {
        let means = column_means(x);
        let std_devs = if standardize {
            let constant = detect_constant_columns(x, 0.0);
            if let Some(column) = constant.iter().position(|&c| c) {
                return Err(PlsError::ZeroStandardDeviation { matrix, column });
            }
            Some(column_std_devs(x, &means))
        } else {
            None
        };
        Self::new(means, std_devs, matrix)
    }

    /// Column means.
    pub fn means(&self) -> &Col<f64> {
        &self.means
    }

    /// Column standard deviations, if the data is standardized.
    pub fn std_devs(&self) -> Option<&Col<f64>> {
        self.std_devs.as_ref()
    }

    /// Number of columns these statistics describe.
    pub fn n_columns(&self) -> usize {
        self.means.nrows()
    }

    /// Return a centered (and scaled) copy of `x`.
    pub fn adjust(&self, x: &Mat<f64>) -> Result<Mat<f64>, PlsError> {
        let mut adjusted = x.clone();
        self.adjust_in_place(&mut adjusted)?;
        Ok(adjusted)
    }

    /// Center (and scale) `x` in place, overwriting the caller's buffer.
    pub fn adjust_in_place(&self, x: &mut Mat<f64>) -> Result<(), PlsError> {
        if x.ncols() != self.n_columns() {
            return Err(PlsError::ColumnMismatch {
                expected: self.n_columns(),
                got: x.ncols(),
            });
        }

        for j in 0..x.ncols() {
            let mean = self.means[j];
            match self.std_devs {
                Some(ref sd) => {
                    let s = sd[j];
                    for i in 0..x.nrows() {
                        x[(i, j)] = (x[(i, j)] - mean) / s;
                    }
                }
                None => {
                    for i in 0..x.nrows() {
                        x[(i, j)] -= mean;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Detect columns that are constant, i.e. every entry is within `tolerance` of the first.
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_cols = x.ncols();
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    let mut constant = vec![false; n_cols];

    for j in 0..n_cols {
        let first = x[(0, j)];
        let all_same = (1..n_rows).all(|i| (x[(i, j)] - first).abs() <= tolerance);
        constant[j] = all_same;
    }

    constant
}

/// Column means of a matrix.
pub fn column_means(x: &Mat<f64>) -> Col<f64> {
    let n_rows = x.nrows();
    Col::from_fn(x.ncols(), |j| {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        sum / n_rows as f64
    })
}

/// Sample (n - 1) standard deviations of each column around the given means.
pub fn column_std_devs(x: &Mat<f64>, means: &Col<f64>) -> Col<f64> {
    let n_rows = x.nrows();
    let denom = n_rows.saturating_sub(1).max(1) as f64;
    Col::from_fn(x.ncols(), |j| {
        let ss: f64 = (0..n_rows).map(|i| (x[(i, j)] - means[j]).powi(2)).sum();
        (ss / denom).sqrt()
    })
}

/// Fail on the first NaN or infinite entry.
pub fn ensure_finite(x: &Mat<f64>, matrix: &'static str) -> Result<(), PlsError> {
    for j in 0..x.ncols() {
        for i in 0..x.nrows() {
            if !x[(i, j)].is_finite() {
                return Err(PlsError::NonFiniteValue {
                    matrix,
                    row: i,
                    column: j,
                });
            }
        }
    }
    Ok(())
}

/// Sum of squares of column `j`.
pub fn column_sum_of_squares(x: &Mat<f64>, j: usize) -> f64 {
    (0..x.nrows()).map(|i| x[(i, j)].powi(2)).sum()
}

/// Total sum of squares over all entries (squared Frobenius norm).
pub fn sum_of_squares(x: &Mat<f64>) -> f64 {
    (0..x.ncols()).map(|j| column_sum_of_squares(x, j)).sum()
}

/// Euclidean norm of a vector.
pub fn norm(v: &Col<f64>) -> f64 {
    v.iter().map(|&a| a * a).sum::<f64>().sqrt()
}

/// Inner product of two vectors of equal length.
pub fn dot(a: &Col<f64>, b: &Col<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// Scale `v` to unit length and return its previous norm.
///
/// A zero vector is left untouched.
pub fn normalize(v: &mut Col<f64>) -> f64 {
    let length = norm(v);
    if length > 0.0 {
        for i in 0..v.nrows() {
            v[i] /= length;
        }
    }
    length
}

/// Copy of column `j`.
pub fn column(x: &Mat<f64>, j: usize) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| x[(i, j)])
}

/// Write `v` into column `j`.
pub fn set_column(x: &mut Mat<f64>, j: usize, v: &Col<f64>) {
    for i in 0..x.nrows() {
        x[(i, j)] = v[i];
    }
}

/// Copy of the first `k` columns.
pub fn leading_columns(x: &Mat<f64>, k: usize) -> Mat<f64> {
    Mat::from_fn(x.nrows(), k, |i, j| x[(i, j)])
}

/// `Aᵀv` for a matrix `A` (n x m) and vector `v` of length n.
pub fn transpose_times(a: &Mat<f64>, v: &Col<f64>) -> Col<f64> {
    Col::from_fn(a.ncols(), |j| (0..a.nrows()).map(|i| a[(i, j)] * v[i]).sum::<f64>())
}

/// `Av` for a matrix `A` (n x m) and vector `v` of length m.
pub fn times(a: &Mat<f64>, v: &Col<f64>) -> Col<f64> {
    Col::from_fn(a.nrows(), |i| (0..a.ncols()).map(|j| a[(i, j)] * v[j]).sum::<f64>())
}
