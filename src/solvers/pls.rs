//! Partial Least Squares (PLS) regression.
//!
//! PLS projects the inputs X and outputs Y onto a small number of latent
//! factors chosen to maximize their covariance, then regresses Y on those
//! factors. It is particularly useful when predictors are highly collinear or
//! when there are more predictors than observations.
//!
//! Two extraction strategies share one output contract:
//!
//! - [`Algorithm::Nipals`]: power iteration with deflation of X and Y
//! - [`Algorithm::Simpls`]: closed-form factors from the cross-covariance matrix
//!
//! For a single response both yield the same regression coefficients.
//!
//! # References
//!
//! - Abdi, H. (2010). Partial least squares regression and projection on latent
//!   structure regression. WIREs Computational Statistics, 2, 97-106.
//! - Mevik, B.-H., Wehrens, R. (2007). The pls package: principal component and
//!   partial least squares regression in R. Journal of Statistical Software, 18(2).

use crate::core::{
    Algorithm, FactorDecomposition, FactorSummary, MultivariateLinearRegression, PlsOptions,
    ResponseStatistics,
};
use crate::diagnostics::variable_importance;
use crate::solvers::nipals::nipals;
use crate::solvers::simpls::simpls;
use crate::solvers::traits::{FittedRegressor, PlsError, Regressor};
use crate::utils::{ensure_finite, ColumnStatistics};
use faer::{Col, Mat};

/// Partial Least Squares regression estimator.
///
/// # Example
///
/// ```rust,ignore
/// use anofox_pls::prelude::*;
/// use faer::Mat;
///
/// let x = Mat::from_fn(100, 10, |i, j| ((i * j) as f64).sin());
/// let y = Mat::from_fn(100, 2, |i, j| (i + j) as f64);
///
/// let fitted = PlsRegressor::builder()
///     .n_factors(3)
///     .algorithm(Algorithm::Simpls)
///     .build()
///     .fit(&x, &y)?;
///
/// let scores = fitted.transform_inputs(&x, 2)?;
/// let model = fitted.build_regression(3)?;
/// let vip = fitted.variable_importance();
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlsRegressor {
    options: PlsOptions,
}

impl PlsRegressor {
    /// Create a new PLS regressor with the given options.
    pub fn new(options: PlsOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> PlsRegressorBuilder {
        PlsRegressorBuilder::default()
    }

    /// The options this regressor trains with.
    pub fn options(&self) -> &PlsOptions {
        &self.options
    }

    /// Fit the model, taking ownership of the data buffers.
    ///
    /// The buffers are centered (and scaled) in place and then reused as the
    /// engine's working storage, so no copy of the training data is made.
    pub fn fit_owned(&self, mut x: Mat<f64>, mut y: Mat<f64>) -> Result<FittedPls, PlsError> {
        let n_factors = self.validate(&x, &y)?;

        log::debug!(
            "fitting PLS ({:?}) with {} factors: {} observations, {} inputs, {} outputs",
            self.options.algorithm,
            n_factors,
            x.nrows(),
            x.ncols(),
            y.ncols()
        );

        let x_stats = ColumnStatistics::from_data(&x, self.options.standardize, "X")?;
        let y_stats = ColumnStatistics::from_data(&y, self.options.standardize, "Y")?;
        x_stats.adjust_in_place(&mut x)?;
        y_stats.adjust_in_place(&mut y)?;

        let factors = match self.options.algorithm {
            Algorithm::Nipals => nipals(
                x,
                y,
                n_factors,
                self.options.tolerance,
                self.options.max_iterations,
            )?,
            Algorithm::Simpls => simpls(&x, &y, n_factors, self.options.tolerance)?,
        };

        if factors.stopped_early() {
            log::warn!(
                "extracted {} of {} requested factors",
                factors.n_factors(),
                factors.requested_factors
            );
        }

        FittedPls::new(x_stats, y_stats, factors)
    }

    /// Check inputs and resolve the number of factors to extract.
    fn validate(&self, x: &Mat<f64>, y: &Mat<f64>) -> Result<usize, PlsError> {
        self.options.validate()?;

        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(PlsError::EmptyInput("X"));
        }
        if y.nrows() == 0 || y.ncols() == 0 {
            return Err(PlsError::EmptyInput("Y"));
        }
        if x.nrows() != y.nrows() {
            return Err(PlsError::RowCountMismatch {
                x_rows: x.nrows(),
                y_rows: y.nrows(),
            });
        }

        let n_samples = x.nrows();
        if n_samples < 2 {
            return Err(PlsError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let max_factors = (n_samples - 1).min(x.ncols());
        let n_factors = self.options.n_factors.unwrap_or(max_factors);
        if n_factors < 1 || n_factors > max_factors {
            return Err(PlsError::InvalidFactorCount {
                requested: n_factors,
                max: max_factors,
            });
        }

        ensure_finite(x, "X")?;
        ensure_finite(y, "Y")?;

        Ok(n_factors)
    }
}

impl Regressor for PlsRegressor {
    type Fitted = FittedPls;

    fn fit(&self, x: &Mat<f64>, y: &Mat<f64>) -> Result<Self::Fitted, PlsError> {
        self.fit_owned(x.clone(), y.clone())
    }
}

/// A trained PLS model.
///
/// Immutable: every derived view (projections, VIP, regressions) is computed
/// from the stored factors without modifying them.
#[derive(Debug, Clone)]
pub struct FittedPls {
    /// Centering/scaling statistics of the training inputs
    x_stats: ColumnStatistics,
    /// Centering/scaling statistics of the training outputs
    y_stats: ColumnStatistics,
    /// Extracted factors
    factors: FactorDecomposition,
    /// Regression using every extracted factor
    regression: MultivariateLinearRegression,
    /// In-sample statistics per response
    statistics: Vec<ResponseStatistics>,
}

impl FittedPls {
    fn new(
        x_stats: ColumnStatistics,
        y_stats: ColumnStatistics,
        factors: FactorDecomposition,
    ) -> Result<Self, PlsError> {
        let n_factors = factors.n_factors();
        let regression = regression_from_factors(&x_stats, &y_stats, &factors, n_factors)?;

        let n_observations = factors.x_scores.nrows();
        let statistics = (0..y_stats.n_columns())
            .map(|j| {
                // Back to the original units of response j
                let scale = y_stats.std_devs().map_or(1.0, |sd| sd[j] * sd[j]);
                ResponseStatistics::compute(
                    n_observations,
                    n_factors,
                    factors.y_column_ss[j] * scale,
                    factors.y_residual_ss[j] * scale,
                )
            })
            .collect();

        Ok(Self {
            x_stats,
            y_stats,
            factors,
            regression,
            statistics,
        })
    }

    /// Algorithm that produced the factors.
    pub fn algorithm(&self) -> Algorithm {
        self.factors.algorithm
    }

    /// Whether inputs and outputs were standardized.
    pub fn standardized(&self) -> bool {
        self.x_stats.std_devs().is_some()
    }

    /// Number of factors actually extracted.
    pub fn n_factors(&self) -> usize {
        self.factors.n_factors()
    }

    /// Number of factors requested at training time.
    pub fn requested_factors(&self) -> usize {
        self.factors.requested_factors
    }

    /// Number of input variables.
    pub fn n_features(&self) -> usize {
        self.x_stats.n_columns()
    }

    /// Number of output variables.
    pub fn n_responses(&self) -> usize {
        self.y_stats.n_columns()
    }

    /// Number of training observations.
    pub fn n_observations(&self) -> usize {
        self.factors.x_scores.nrows()
    }

    /// The full factor decomposition.
    pub fn factors(&self) -> &FactorDecomposition {
        &self.factors
    }

    /// X scores T (n x k) of the training data.
    pub fn x_scores(&self) -> &Mat<f64> {
        &self.factors.x_scores
    }

    /// Y scores U (n x k) of the training data.
    pub fn y_scores(&self) -> &Mat<f64> {
        &self.factors.y_scores
    }

    /// X loadings P (p x k).
    pub fn x_loadings(&self) -> &Mat<f64> {
        &self.factors.x_loadings
    }

    /// Y loadings C (q x k).
    pub fn y_loadings(&self) -> &Mat<f64> {
        &self.factors.y_loadings
    }

    /// Weights W (p x k).
    pub fn weights(&self) -> &Mat<f64> {
        &self.factors.weights
    }

    /// Projection weights R (p x k), with `T = X₀R`.
    pub fn rotations(&self) -> &Mat<f64> {
        &self.factors.rotations
    }

    /// Training input statistics.
    pub fn x_statistics(&self) -> &ColumnStatistics {
        &self.x_stats
    }

    /// Training output statistics.
    pub fn y_statistics(&self) -> &ColumnStatistics {
        &self.y_stats
    }

    /// Fraction of X variance explained by each factor.
    pub fn x_explained(&self) -> &Col<f64> {
        &self.factors.x_explained
    }

    /// Fraction of Y variance explained by each factor.
    pub fn y_explained(&self) -> &Col<f64> {
        &self.factors.y_explained
    }

    /// Cumulative fraction of X variance explained.
    pub fn cumulative_x_explained(&self) -> Col<f64> {
        self.factors.cumulative_x_explained()
    }

    /// Cumulative fraction of Y variance explained.
    pub fn cumulative_y_explained(&self) -> Col<f64> {
        self.factors.cumulative_y_explained()
    }

    /// Explained variance per factor.
    pub fn factor_summaries(&self) -> Vec<FactorSummary> {
        self.factors.summaries()
    }

    /// In-sample fit statistics, one entry per response.
    pub fn response_statistics(&self) -> &[ResponseStatistics] {
        &self.statistics
    }

    /// Regression using every extracted factor.
    pub fn regression(&self) -> &MultivariateLinearRegression {
        &self.regression
    }

    /// Project inputs onto the first `dimensions` X loadings.
    ///
    /// `data` is adjusted with the training means (and standard deviations) and
    /// multiplied by the leading columns of P. Use [`FittedPls::scores_for`] to
    /// obtain X scores instead.
    pub fn transform_inputs(&self, data: &Mat<f64>, dimensions: usize) -> Result<Mat<f64>, PlsError> {
        project(&self.x_stats, &self.factors.x_loadings, data, dimensions)
    }

    /// X scores of new inputs on the first `dimensions` factors.
    ///
    /// Multiplies the adjusted data by the projection weights R, so the training
    /// inputs reproduce [`FittedPls::x_scores`].
    pub fn scores_for(&self, data: &Mat<f64>, dimensions: usize) -> Result<Mat<f64>, PlsError> {
        project(&self.x_stats, &self.factors.rotations, data, dimensions)
    }

    /// Project outputs onto the first `dimensions` Y loadings.
    pub fn transform_outputs(
        &self,
        data: &Mat<f64>,
        dimensions: usize,
    ) -> Result<Mat<f64>, PlsError> {
        project(&self.y_stats, &self.factors.y_loadings, data, dimensions)
    }

    /// Variable Importance in Projection, shape (p, k).
    ///
    /// Column `k` uses the first `k + 1` factors.
    pub fn variable_importance(&self) -> Mat<f64> {
        variable_importance(&self.factors)
    }

    /// Build a linear regression in the original variables from the first `factors` factors.
    pub fn build_regression(&self, factors: usize) -> Result<MultivariateLinearRegression, PlsError> {
        if factors < 1 || factors > self.n_factors() {
            return Err(PlsError::InvalidFactorCount {
                requested: factors,
                max: self.n_factors(),
            });
        }
        regression_from_factors(&self.x_stats, &self.y_stats, &self.factors, factors)
    }
}

impl FittedRegressor for FittedPls {
    fn predict(&self, x: &Mat<f64>) -> Result<Mat<f64>, PlsError> {
        self.regression.predict(x)
    }
}

/// Adjust `data` with `stats` and multiply by the first `dimensions` columns of `basis`.
fn project(
    stats: &ColumnStatistics,
    basis: &Mat<f64>,
    data: &Mat<f64>,
    dimensions: usize,
) -> Result<Mat<f64>, PlsError> {
    if data.ncols() != stats.n_columns() {
        return Err(PlsError::ColumnMismatch {
            expected: stats.n_columns(),
            got: data.ncols(),
        });
    }
    if dimensions > basis.ncols() {
        return Err(PlsError::DimensionsExceedFactors {
            requested: dimensions,
            available: basis.ncols(),
        });
    }

    let adjusted = stats.adjust(data)?;
    let m = adjusted.nrows();
    let p = adjusted.ncols();

    let mut result = Mat::zeros(m, dimensions);
    for k in 0..dimensions {
        for i in 0..m {
            let mut sum = 0.0;
            for j in 0..p {
                sum += adjusted[(i, j)] * basis[(j, k)];
            }
            result[(i, k)] = sum;
        }
    }

    Ok(result)
}

/// Back-transform the first `factors` factors into weights and intercepts on the
/// original scale.
///
/// `B = R diag(b) Cᵀ`, rescaled by `σ_y[j] / σ_x[i]` when standardized, and
/// `a[j] = ȳ[j] − Σ_i x̄[i] B[i, j]`.
fn regression_from_factors(
    x_stats: &ColumnStatistics,
    y_stats: &ColumnStatistics,
    decomposition: &FactorDecomposition,
    factors: usize,
) -> Result<MultivariateLinearRegression, PlsError> {
    let basis = decomposition.coefficient_basis();
    let y_loadings = &decomposition.y_loadings;
    let p = basis.nrows();
    let q = y_loadings.nrows();

    let mut weights = Mat::zeros(p, q);
    for j in 0..q {
        for i in 0..p {
            let mut sum = 0.0;
            for k in 0..factors {
                sum += basis[(i, k)] * y_loadings[(j, k)];
            }
            weights[(i, j)] = sum;
        }
    }

    if let Some(sd_x) = x_stats.std_devs() {
        for i in 0..p {
            for j in 0..q {
                weights[(i, j)] /= sd_x[i];
            }
        }
    }
    if let Some(sd_y) = y_stats.std_devs() {
        for j in 0..q {
            for i in 0..p {
                weights[(i, j)] *= sd_y[j];
            }
        }
    }

    let x_means = x_stats.means();
    let y_means = y_stats.means();
    let intercepts = Col::from_fn(q, |j| {
        let mut a = y_means[j];
        for i in 0..p {
            a -= x_means[i] * weights[(i, j)];
        }
        a
    });

    MultivariateLinearRegression::new(weights, intercepts)
}

/// Builder for `PlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct PlsRegressorBuilder {
    options: PlsOptions,
}

impl PlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of latent factors to extract.
    ///
    /// Must lie in `1..=min(n_samples - 1, n_features)`. Defaults to the maximum.
    pub fn n_factors(mut self, n: usize) -> Self {
        self.options.n_factors = Some(n);
        self
    }

    /// Set the factor extraction algorithm.
    ///
    /// Default is NIPALS.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.options.algorithm = algorithm;
        self
    }

    /// Set whether to scale X and Y columns to unit variance before fitting.
    ///
    /// Default is false. Standardizing fails on constant columns.
    pub fn standardize(mut self, standardize: bool) -> Self {
        self.options.standardize = standardize;
        self
    }

    /// Set the tolerance for convergence and rank detection.
    ///
    /// Default is 1e-10.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set the maximum number of NIPALS iterations per factor.
    ///
    /// Default is 10 000. Exceeding it is an error rather than a silently
    /// unconverged factor.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Build the PLS regressor.
    pub fn build(self) -> PlsRegressor {
        PlsRegressor {
            options: self.options,
        }
    }
}
