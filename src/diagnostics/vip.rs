//! Variable Importance in Projection (VIP).

use crate::core::FactorDecomposition;
use faer::Mat;

/// Compute Variable Importance in Projection for every predictor and factor prefix.
///
/// For predictor j using factors 0..=k:
///
/// VIP(j, k) = sqrt( p · Σ_f SSY_f · w²(j, f) / ‖w_f‖² / Σ_f SSY_f )
///
/// where SSY_f is the sum of squares of Y explained by factor f and w_f its
/// weight vector. For a single response this is `C[0, f]² · (t_f·t_f)` for
/// SIMPLS and `b_f²` for NIPALS.
///
/// # Interpretation
/// - The mean of VIP² over all predictors is 1 for every k
/// - VIP > 1: predictor matters more than average ("greater than one" rule)
/// - VIP < 0.8: candidate for removal
///
/// # Returns
/// Matrix of shape (p, n_factors); column k uses the first k + 1 factors.
pub fn variable_importance(factors: &FactorDecomposition) -> Mat<f64> {
    let weights = &factors.weights;
    let p = weights.nrows();
    let k = factors.n_factors();
    let ss = factors.y_explained_ss();

    let w_norms: Vec<f64> = (0..k)
        .map(|f| (0..p).map(|j| weights[(j, f)].powi(2)).sum::<f64>())
        .collect();

    let mut vip = Mat::zeros(p, k);

    for j in 0..p {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for f in 0..k {
            let wn = if w_norms[f] > 0.0 {
                weights[(j, f)].powi(2) / w_norms[f]
            } else {
                0.0
            };
            numerator += ss[f] * wn;
            denominator += ss[f];

            vip[(j, f)] = if denominator > 0.0 {
                (p as f64 * numerator / denominator).sqrt()
            } else {
                0.0
            };
        }
    }

    vip
}

/// Identify predictors whose VIP exceeds `threshold` using the first `n_factors` factors.
///
/// Common threshold: 1.0
pub fn important_predictors(vip: &Mat<f64>, n_factors: usize, threshold: f64) -> Vec<usize> {
    if n_factors == 0 || n_factors > vip.ncols() {
        return Vec::new();
    }
    (0..vip.nrows())
        .filter(|&j| vip[(j, n_factors - 1)] > threshold)
        .collect()
}
