//! Factor extraction results and fit statistics.

use super::options::Algorithm;
use crate::utils::leading_columns;
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Latent factors extracted by one run of a PLS engine.
///
/// All factor-indexed matrices have one column per factor actually extracted,
/// which may be fewer than requested when the data is exhausted early.
///
/// With centered (or standardized) training data `X₀`, `Y₀`:
/// - `X₀ ≈ T Pᵀ`
/// - `Y₀ ≈ T diag(b) Cᵀ`
/// - `T = X₀ R`
#[derive(Debug, Clone)]
pub struct FactorDecomposition {
    /// Engine that produced the factors.
    pub algorithm: Algorithm,

    /// Number of factors the caller asked for.
    pub requested_factors: usize,

    // ========== Scores ==========
    /// X scores T (n x k), unit-norm columns.
    pub x_scores: Mat<f64>,

    /// Y scores U (n x k).
    pub y_scores: Mat<f64>,

    // ========== Loadings and Weights ==========
    /// X loadings P (p x k).
    pub x_loadings: Mat<f64>,

    /// Y loadings C (q x k).
    pub y_loadings: Mat<f64>,

    /// Weights W (p x k).
    pub weights: Mat<f64>,

    /// Projection weights R (p x k) mapping adjusted inputs onto the X scores.
    pub rotations: Mat<f64>,

    /// Inner regression coefficient of Y on each score (NIPALS `b`; ones for SIMPLS,
    /// whose Y loadings already carry the scale).
    pub inner_coefficients: Col<f64>,

    /// Orthonormal basis V of the X loadings (SIMPLS only).
    pub orthogonal_loadings: Option<Mat<f64>>,

    // ========== Explained Variance ==========
    /// Fraction of the total X sum of squares explained by each factor.
    pub x_explained: Col<f64>,

    /// Fraction of the total Y sum of squares explained by each factor.
    pub y_explained: Col<f64>,

    /// Total sum of squares of the adjusted X.
    pub x_total_ss: f64,

    /// Total sum of squares of the adjusted Y.
    pub y_total_ss: f64,

    /// Per-response sum of squares of the adjusted Y.
    pub y_column_ss: Col<f64>,

    /// Per-response residual sum of squares after all extracted factors.
    pub y_residual_ss: Col<f64>,
}

impl FactorDecomposition {
    /// Number of factors actually extracted.
    pub fn n_factors(&self) -> usize {
        self.x_scores.ncols()
    }

    /// Whether extraction stopped before the requested factor count.
    pub fn stopped_early(&self) -> bool {
        self.n_factors() < self.requested_factors
    }

    /// Coefficient basis `R diag(b)` (p x k).
    ///
    /// Column `k` multiplied by the Y loadings of factor `k` gives that factor's
    /// contribution to the regression weights.
    pub fn coefficient_basis(&self) -> Mat<f64> {
        Mat::from_fn(self.rotations.nrows(), self.n_factors(), |i, k| {
            self.rotations[(i, k)] * self.inner_coefficients[k]
        })
    }

    /// Sum of squares of the adjusted Y explained by each factor.
    pub fn y_explained_ss(&self) -> Col<f64> {
        Col::from_fn(self.n_factors(), |k| self.y_explained[k] * self.y_total_ss)
    }

    /// Cumulative fraction of X variance explained by the first `k + 1` factors.
    pub fn cumulative_x_explained(&self) -> Col<f64> {
        cumulative(&self.x_explained)
    }

    /// Cumulative fraction of Y variance explained by the first `k + 1` factors.
    pub fn cumulative_y_explained(&self) -> Col<f64> {
        cumulative(&self.y_explained)
    }

    /// One summary row per extracted factor.
    pub fn summaries(&self) -> Vec<FactorSummary> {
        let cum_x = self.cumulative_x_explained();
        let cum_y = self.cumulative_y_explained();
        (0..self.n_factors())
            .map(|k| FactorSummary {
                index: k,
                x_explained: self.x_explained[k],
                y_explained: self.y_explained[k],
                cumulative_x_explained: cum_x[k],
                cumulative_y_explained: cum_y[k],
            })
            .collect()
    }

    /// Keep only the first `k` factors.
    pub(crate) fn truncated(self, k: usize) -> Self {
        if k == self.n_factors() {
            return self;
        }
        Self {
            algorithm: self.algorithm,
            requested_factors: self.requested_factors,
            x_scores: leading_columns(&self.x_scores, k),
            y_scores: leading_columns(&self.y_scores, k),
            x_loadings: leading_columns(&self.x_loadings, k),
            y_loadings: leading_columns(&self.y_loadings, k),
            weights: leading_columns(&self.weights, k),
            rotations: leading_columns(&self.rotations, k),
            inner_coefficients: Col::from_fn(k, |i| self.inner_coefficients[i]),
            orthogonal_loadings: self.orthogonal_loadings.map(|v| leading_columns(&v, k)),
            x_explained: Col::from_fn(k, |i| self.x_explained[i]),
            y_explained: Col::from_fn(k, |i| self.y_explained[i]),
            x_total_ss: self.x_total_ss,
            y_total_ss: self.y_total_ss,
            y_column_ss: self.y_column_ss,
            y_residual_ss: self.y_residual_ss,
        }
    }
}

fn cumulative(values: &Col<f64>) -> Col<f64> {
    let mut result = Col::zeros(values.nrows());
    let mut total = 0.0;
    for k in 0..values.nrows() {
        total += values[k];
        result[k] = total;
    }
    result
}

/// Explained variance of a single factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorSummary {
    /// Zero-based factor index.
    pub index: usize,
    /// Fraction of X variance explained by this factor.
    pub x_explained: f64,
    /// Fraction of Y variance explained by this factor.
    pub y_explained: f64,
    /// Fraction of X variance explained by factors `0..=index`.
    pub cumulative_x_explained: f64,
    /// Fraction of Y variance explained by factors `0..=index`.
    pub cumulative_y_explained: f64,
}

/// In-sample fit statistics for one response variable.
#[derive(Debug, Clone, Copy)]
pub struct ResponseStatistics {
    /// Coefficient of determination (R²).
    pub r_squared: f64,
    /// Adjusted R², treating each factor as one model degree of freedom.
    pub adj_r_squared: f64,
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// F-statistic for overall model significance.
    pub f_statistic: f64,
    /// P-value for the F-statistic.
    pub f_pvalue: f64,
}

impl ResponseStatistics {
    /// Compute statistics from total and residual sums of squares.
    ///
    /// The model has `n_factors` latent variables plus an intercept.
    pub fn compute(n_observations: usize, n_factors: usize, tss: f64, rss: f64) -> Self {
        let n = n_observations;
        let n_params = n_factors + 1;

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = (n - 1) as f64;
        let df_resid = n.saturating_sub(n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };
        let rmse = mse.sqrt();

        let ess = tss - rss;
        let df_model = n_factors as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            (ess / df_model) / mse
        } else {
            f64::NAN
        };

        let f_pvalue = if f_statistic.is_finite() && df_model > 0.0 && df_resid > 0.0 {
            let f_dist = FisherSnedecor::new(df_model, df_resid).ok();
            f_dist.map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
        } else {
            f64::NAN
        };

        Self {
            r_squared,
            adj_r_squared,
            mse,
            rmse,
            f_statistic,
            f_pvalue,
        }
    }
}
