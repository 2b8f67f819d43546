//! NIPALS factor extraction.
//!
//! Extracts latent factors one at a time by power iteration on the residual
//! matrices `E` (initially the adjusted X) and `F` (initially the adjusted Y),
//! deflating both after every factor.
//!
//! # Algorithm
//!
//! For each factor, starting from the highest-variance columns of `E` and `F`:
//!
//! 1. `w = Eᵀu / ‖Eᵀu‖`
//! 2. `t = Ew / ‖Ew‖`
//! 3. `c = Fᵀt / ‖Fᵀt‖`
//! 4. `u = Fc`
//!
//! until `‖t_prev − t‖ ≤ tolerance`. Then `b = tᵀu`, `p = Eᵀt` and
//! `E ← E − tpᵀ`, `F ← F − b·tcᵀ`.
//!
//! # References
//!
//! - Wold, H. (1966). Estimation of principal components and related models by
//!   iterative least squares. Multivariate Analysis, 391-420.
//! - Abdi, H. (2010). Partial least squares regression and projection on latent
//!   structure regression. WIREs Computational Statistics, 2, 97-106.

use crate::core::{Algorithm, FactorDecomposition};
use crate::solvers::traits::PlsError;
use crate::utils::{
    column, column_sum_of_squares, dot, norm, normalize, set_column, sum_of_squares, times,
    transpose_times,
};
use faer::linalg::solvers::Solve;
use faer::{Col, Mat};

/// One converged NIPALS factor.
struct Factor {
    t: Col<f64>,
    u: Col<f64>,
    w: Col<f64>,
    c: Col<f64>,
    iterations: usize,
}

/// Extract up to `n_factors` factors from adjusted data with NIPALS.
///
/// `x` and `y` are consumed as the residual buffers, so callers that no longer
/// need the adjusted data avoid a copy.
///
/// Extraction stops early, returning fewer factors, once either residual
/// matrix is exhausted (every column norm within `tolerance` of zero relative
/// to the norm of the original data).
///
/// # Errors
///
/// - [`PlsError::DegenerateData`] if X or Y has no variation or no factor can be extracted
/// - [`PlsError::ConvergenceFailed`] if a factor does not converge within `max_iterations`
/// - [`PlsError::SingularMatrix`] if the projection weights cannot be computed
pub fn nipals(
    x: Mat<f64>,
    y: Mat<f64>,
    n_factors: usize,
    tolerance: f64,
    max_iterations: usize,
) -> Result<FactorDecomposition, PlsError> {
    let n = x.nrows();
    let p = x.ncols();
    let q = y.ncols();

    let x_total_ss = sum_of_squares(&x);
    let y_column_ss = Col::from_fn(q, |j| column_sum_of_squares(&y, j));
    let y_total_ss = sum_of_squares(&y);

    if x_total_ss == 0.0 || y_total_ss == 0.0 {
        return Err(PlsError::DegenerateData);
    }

    let x_threshold = tolerance * x_total_ss.sqrt();
    let y_threshold = tolerance * y_total_ss.sqrt();

    let mut e = x;
    let mut f = y;

    let mut x_scores = Mat::zeros(n, n_factors);
    let mut y_scores = Mat::zeros(n, n_factors);
    let mut x_loadings = Mat::zeros(p, n_factors);
    let mut y_loadings = Mat::zeros(q, n_factors);
    let mut weights = Mat::zeros(p, n_factors);
    let mut inner = Col::zeros(n_factors);
    let mut x_explained = Col::zeros(n_factors);
    let mut y_explained = Col::zeros(n_factors);

    let mut extracted = 0;

    for factor in 0..n_factors {
        if is_exhausted(&e, x_threshold) || is_exhausted(&f, y_threshold) {
            log::warn!(
                "NIPALS residuals exhausted after {} of {} factors",
                factor,
                n_factors
            );
            break;
        }

        let Some(Factor {
            t,
            u,
            w,
            c,
            iterations,
        }) = extract_factor(&e, &f, factor, tolerance, max_iterations)?
        else {
            log::warn!(
                "NIPALS factor {} is degenerate; stopping after {} factors",
                factor,
                factor
            );
            break;
        };

        // Inner regression of u on t (t has unit norm)
        let b = dot(&t, &u);
        let p_vec = transpose_times(&e, &t);

        // Deflate: E ← E − t pᵀ, F ← F − b t cᵀ
        for j in 0..p {
            for i in 0..n {
                e[(i, j)] -= t[i] * p_vec[j];
            }
        }
        for j in 0..q {
            for i in 0..n {
                f[(i, j)] -= b * t[i] * c[j];
            }
        }

        set_column(&mut x_scores, factor, &t);
        set_column(&mut y_scores, factor, &u);
        set_column(&mut x_loadings, factor, &p_vec);
        set_column(&mut y_loadings, factor, &c);
        set_column(&mut weights, factor, &w);
        inner[factor] = b;

        // Fractions of the original totals, not of the residual at this step
        x_explained[factor] = dot(&p_vec, &p_vec) / x_total_ss;
        y_explained[factor] = b * b / y_total_ss;

        log::debug!(
            "NIPALS factor {} converged after {} iterations (X: {:.4}, Y: {:.4})",
            factor,
            iterations,
            x_explained[factor],
            y_explained[factor]
        );

        extracted += 1;
    }

    if extracted == 0 {
        return Err(PlsError::DegenerateData);
    }

    let y_residual_ss = Col::from_fn(q, |j| column_sum_of_squares(&f, j));

    let mut decomposition = FactorDecomposition {
        algorithm: Algorithm::Nipals,
        requested_factors: n_factors,
        x_scores,
        y_scores,
        x_loadings,
        y_loadings,
        weights,
        rotations: Mat::zeros(p, n_factors),
        inner_coefficients: inner,
        orthogonal_loadings: None,
        x_explained,
        y_explained,
        x_total_ss,
        y_total_ss,
        y_column_ss,
        y_residual_ss,
    }
    .truncated(extracted);

    decomposition.rotations =
        compute_rotations(&decomposition.weights, &decomposition.x_loadings, tolerance)?;

    Ok(decomposition)
}

/// Run the inner power iteration for one factor.
///
/// Returns `None` when the residuals carry no covariance to extract, i.e. a
/// product falls to `tolerance` relative to the norms it is built from.
fn extract_factor(
    e: &Mat<f64>,
    f: &Mat<f64>,
    factor: usize,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Option<Factor>, PlsError> {
    let e_norm = sum_of_squares(e).sqrt();
    let f_norm = sum_of_squares(f).sqrt();

    let mut t = column(e, largest_column(e));
    let mut u = column(f, largest_column(f));

    for iteration in 1..=max_iterations {
        // Each product is compared against the largest value it could take
        let u_norm = norm(&u);
        let mut w = transpose_times(e, &u);
        if normalize(&mut w) <= tolerance * e_norm * u_norm {
            return Ok(None);
        }

        let mut t_new = times(e, &w);
        if normalize(&mut t_new) <= tolerance * e_norm {
            return Ok(None);
        }

        let mut c = transpose_times(f, &t_new);
        if normalize(&mut c) <= tolerance * f_norm {
            return Ok(None);
        }

        u = times(f, &c);

        let change = norm(&Col::from_fn(t.nrows(), |i| t[i] - t_new[i]));
        t = t_new;

        if change <= tolerance {
            return Ok(Some(Factor {
                t,
                u,
                w,
                c,
                iterations: iteration,
            }));
        }
    }

    Err(PlsError::ConvergenceFailed {
        factor,
        iterations: max_iterations,
    })
}

/// Index of the column with the largest sum of squares; ties go to the first.
fn largest_column(m: &Mat<f64>) -> usize {
    let mut best = 0;
    let mut best_ss = f64::NEG_INFINITY;
    for j in 0..m.ncols() {
        let ss = column_sum_of_squares(m, j);
        if ss > best_ss {
            best_ss = ss;
            best = j;
        }
    }
    best
}

/// Whether every column norm is at or below `threshold`.
fn is_exhausted(m: &Mat<f64>, threshold: f64) -> bool {
    (0..m.ncols()).all(|j| column_sum_of_squares(m, j).sqrt() <= threshold)
}

/// Projection weights `R = W(PᵀW)⁻¹`, so that `T = X₀R` on the original adjusted data.
///
/// `PᵀW` is upper triangular with `‖E_{k-1} w_k‖` on its diagonal. A diagonal
/// entry at or below `tolerance` times the largest one makes the system singular.
/// Otherwise `(WᵀP) Rᵀ = Wᵀ` is solved by LU with partial pivoting.
fn compute_rotations(
    weights: &Mat<f64>,
    x_loadings: &Mat<f64>,
    tolerance: f64,
) -> Result<Mat<f64>, PlsError> {
    let p = weights.nrows();
    let k = weights.ncols();

    let mut wtp = Mat::zeros(k, k);
    for a in 0..k {
        for b in 0..k {
            let mut sum = 0.0;
            for i in 0..p {
                sum += weights[(i, a)] * x_loadings[(i, b)];
            }
            wtp[(a, b)] = sum;
        }
    }

    let largest = (0..k).map(|a| wtp[(a, a)].abs()).fold(0.0, f64::max);
    if (0..k).any(|a| wtp[(a, a)].abs() <= tolerance * largest) {
        return Err(PlsError::SingularMatrix);
    }

    let wt = Mat::from_fn(k, p, |a, i| weights[(i, a)]);
    let rt = wtp.partial_piv_lu().solve(wt.as_ref());

    if (0..k).any(|a| (0..p).any(|i| !rt[(a, i)].is_finite())) {
        return Err(PlsError::SingularMatrix);
    }

    Ok(Mat::from_fn(p, k, |i, a| rt[(a, i)]))
}
