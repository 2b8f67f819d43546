//! SIMPLS factor extraction.
//!
//! SIMPLS (Straightforward Implementation of a statistically inspired
//! Modification of the Partial Least Squares method) maximizes the covariance
//! between X scores and Y directly. Neither X nor Y is deflated; instead the
//! cross-covariance matrix `S = XᵀY` is projected away from the span of the
//! loadings already extracted.
//!
//! # Algorithm
//!
//! For each factor:
//!
//! 1. `w` = dominant left singular vector of `S`
//! 2. `c = Sᵀw`, `t = Xw`; scale `t` to unit norm and `w`, `c` by the same factor
//! 3. `p = Xᵀt`, `u = Yc`
//! 4. `v` = `p` orthogonalized against previous loadings `V`, normalized;
//!    `u` orthogonalized against previous scores `T`
//! 5. `S ← S − v(vᵀS)`
//!
//! # References
//!
//! - de Jong, S. (1993). SIMPLS: an alternative approach to partial least squares regression.
//!   Chemometrics and Intelligent Laboratory Systems, 18, 251-263.
//! - Validated against R's `pls` package: <https://cran.r-project.org/package=pls>

use crate::core::{Algorithm, FactorDecomposition};
use crate::solvers::traits::PlsError;
use crate::utils::{
    column, column_sum_of_squares, dot, normalize, set_column, sum_of_squares, times,
    transpose_times,
};
use faer::{Col, Mat, Side};

/// Extract up to `n_factors` factors from adjusted data with SIMPLS.
///
/// Extraction stops early, returning fewer factors, once the leading singular
/// value of the deflated cross-covariance falls to `tolerance` times its
/// initial value (the covariance is exhausted) or the next score vanishes.
///
/// # Errors
///
/// - [`PlsError::DegenerateData`] if `‖XᵀY‖` is within `tolerance` of zero relative to `‖X‖_F ‖Y‖_F`
/// - [`PlsError::DecompositionFailed`] if the eigendecomposition fails
pub fn simpls(
    x: &Mat<f64>,
    y: &Mat<f64>,
    n_factors: usize,
    tolerance: f64,
) -> Result<FactorDecomposition, PlsError> {
    let n = x.nrows();
    let p = x.ncols();
    let q = y.ncols();

    let x_total_ss = sum_of_squares(x);
    let y_column_ss = Col::from_fn(q, |j| column_sum_of_squares(y, j));
    let y_total_ss = sum_of_squares(y);

    if x_total_ss == 0.0 || y_total_ss == 0.0 {
        return Err(PlsError::DegenerateData);
    }
    let x_threshold = tolerance * x_total_ss.sqrt();

    let mut x_scores = Mat::zeros(n, n_factors);
    let mut y_scores = Mat::zeros(n, n_factors);
    let mut x_loadings = Mat::zeros(p, n_factors);
    let mut y_loadings = Mat::zeros(q, n_factors);
    let mut weights = Mat::zeros(p, n_factors);
    let mut v_mat = Mat::zeros(p, n_factors);
    let mut x_explained = Col::zeros(n_factors);
    let mut y_explained = Col::zeros(n_factors);

    // Cross-product S = X'Y
    let mut s = Mat::zeros(p, q);
    for j in 0..q {
        for k in 0..p {
            let mut sum = 0.0;
            for i in 0..n {
                sum += x[(i, k)] * y[(i, j)];
            }
            s[(k, j)] = sum;
        }
    }

    let mut initial_singular_value = 0.0;
    let mut extracted = 0;

    for a in 0..n_factors {
        let (mut w, singular_value) = dominant_left_singular_vector(&s)?;

        if a == 0 {
            if singular_value <= tolerance * x_total_ss.sqrt() * y_total_ss.sqrt() {
                return Err(PlsError::DegenerateData);
            }
            initial_singular_value = singular_value;
        } else if singular_value <= tolerance * initial_singular_value {
            log::warn!(
                "SIMPLS cross-covariance exhausted after {} of {} factors",
                a,
                n_factors
            );
            break;
        }

        let mut c = transpose_times(&s, &w);

        // Score t = X w, normalized; w and c share the scale so t = X w still holds
        let mut t = times(x, &w);
        let t_norm = normalize(&mut t);
        if t_norm <= x_threshold {
            log::warn!("SIMPLS factor {} has a vanishing score; stopping", a);
            break;
        }
        for j in 0..p {
            w[j] /= t_norm;
        }
        for j in 0..q {
            c[j] /= t_norm;
        }

        let p_vec = transpose_times(x, &t);
        let mut u = times(y, &c);

        // Orthogonalize v against previous v's and u against previous t's
        let mut v = p_vec.clone();
        for k in 0..a {
            let v_k = column(&v_mat, k);
            let vtv = dot(&v_k, &v);
            for j in 0..p {
                v[j] -= v_k[j] * vtv;
            }

            let t_k = column(&x_scores, k);
            let ttu = dot(&t_k, &u);
            for i in 0..n {
                u[i] -= t_k[i] * ttu;
            }
        }
        normalize(&mut v);

        // Deflate S: S = S - v (v' S)
        for j in 0..q {
            let mut vts = 0.0;
            for k in 0..p {
                vts += v[k] * s[(k, j)];
            }
            for k in 0..p {
                s[(k, j)] -= v[k] * vts;
            }
        }

        set_column(&mut x_scores, a, &t);
        set_column(&mut y_scores, a, &u);
        set_column(&mut x_loadings, a, &p_vec);
        set_column(&mut y_loadings, a, &c);
        set_column(&mut weights, a, &w);
        set_column(&mut v_mat, a, &v);

        x_explained[a] = dot(&p_vec, &p_vec) / x_total_ss;
        y_explained[a] = dot(&c, &c) / y_total_ss;

        log::debug!(
            "SIMPLS factor {} (singular value {:.4e}, X: {:.4}, Y: {:.4})",
            a,
            singular_value,
            x_explained[a],
            y_explained[a]
        );

        extracted += 1;
    }

    if extracted == 0 {
        return Err(PlsError::DegenerateData);
    }

    // Residual Y after the extracted factors: Y - T C'
    let y_residual_ss = Col::from_fn(q, |j| {
        (0..n)
            .map(|i| {
                let mut fitted = 0.0;
                for k in 0..extracted {
                    fitted += x_scores[(i, k)] * y_loadings[(j, k)];
                }
                (y[(i, j)] - fitted).powi(2)
            })
            .sum::<f64>()
    });

    let rotations = weights.clone();

    Ok(FactorDecomposition {
        algorithm: Algorithm::Simpls,
        requested_factors: n_factors,
        x_scores,
        y_scores,
        x_loadings,
        y_loadings,
        weights,
        rotations,
        inner_coefficients: Col::from_fn(n_factors, |_| 1.0),
        orthogonal_loadings: Some(v_mat),
        x_explained,
        y_explained,
        x_total_ss,
        y_total_ss,
        y_column_ss,
        y_residual_ss,
    }
    .truncated(extracted))
}

/// Leading left singular vector and singular value of `s` (p x q).
///
/// Computed from the eigendecomposition of the smaller Gram matrix:
/// `SᵀS` when `q ≤ p` (then `w = Sv / ‖Sv‖`), otherwise `SSᵀ` directly.
fn dominant_left_singular_vector(s: &Mat<f64>) -> Result<(Col<f64>, f64), PlsError> {
    let p = s.nrows();
    let q = s.ncols();

    if q <= p {
        let gram = Mat::from_fn(q, q, |a, b| (0..p).map(|k| s[(k, a)] * s[(k, b)]).sum::<f64>());
        let (v, _) = leading_eigenvector(&gram)?;
        let mut w = times(s, &v);
        let sigma = normalize(&mut w);
        Ok((w, sigma))
    } else {
        let gram = Mat::from_fn(p, p, |a, b| (0..q).map(|k| s[(a, k)] * s[(b, k)]).sum::<f64>());
        let (w, lambda) = leading_eigenvector(&gram)?;
        Ok((w, lambda.max(0.0).sqrt()))
    }
}

/// Eigenvector of the largest eigenvalue of a symmetric matrix.
fn leading_eigenvector(gram: &Mat<f64>) -> Result<(Col<f64>, f64), PlsError> {
    let eig = gram
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|err| PlsError::DecompositionFailed(format!("{:?}", err)))?;

    let values = eig.S();
    let mut best = 0;
    for idx in 1..values.dim() {
        if values[idx] > values[best] {
            best = idx;
        }
    }

    let vectors = eig.U();
    let v = Col::from_fn(vectors.nrows(), |i| vectors[(i, best)]);
    Ok((v, values[best]))
}
