//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::Mat;

/// The five-wine tasting data: price, sugar, alcohol and acidity for each wine.
pub fn wine_inputs() -> Mat<f64> {
    let rows = [
        [7.0, 7.0, 13.0, 7.0],
        [4.0, 3.0, 14.0, 7.0],
        [10.0, 5.0, 12.0, 5.0],
        [16.0, 7.0, 11.0, 3.0],
        [13.0, 3.0, 10.0, 3.0],
    ];
    Mat::from_fn(5, 4, |i, j| rows[i][j])
}

/// Hedonic score, goes-with-meat and goes-with-dessert ratings for each wine.
pub fn wine_outputs() -> Mat<f64> {
    let rows = [
        [14.0, 7.0, 8.0],
        [10.0, 7.0, 6.0],
        [8.0, 5.0, 5.0],
        [2.0, 4.0, 7.0],
        [6.0, 2.0, 4.0],
    ];
    Mat::from_fn(5, 3, |i, j| rows[i][j])
}

/// Generate multi-response linear data: Y = X B + A + noise.
///
/// Returns (X, Y, B, A) with B of shape (n_features, n_responses).
pub fn generate_multivariate_data(
    n_samples: usize,
    n_features: usize,
    n_responses: usize,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Mat<f64>, Mat<f64>, Vec<f64>) {
    // Simple deterministic "random" for reproducibility
    let mut rng_state = seed;
    let next_rand = |state: &mut u64| -> f64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let coefficients = Mat::from_fn(n_features, n_responses, |i, j| {
        ((i + 1) as f64) * if (i + j) % 2 == 0 { 1.0 } else { -0.5 }
    });
    let intercepts: Vec<f64> = (0..n_responses).map(|j| j as f64 - 1.0).collect();

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Mat::zeros(n_samples, n_responses);

    for i in 0..n_samples {
        for k in 0..n_features {
            x[(i, k)] = next_rand(&mut rng_state);
        }
        for j in 0..n_responses {
            let mut yij = intercepts[j];
            for k in 0..n_features {
                yij += x[(i, k)] * coefficients[(k, j)];
            }
            yij += noise_std * next_rand(&mut rng_state);
            y[(i, j)] = yij;
        }
    }

    (x, y, coefficients, intercepts)
}

/// Generate data whose third column is a linear combination of the first two.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Mat<f64>) {
    let x = Mat::from_fn(n_samples, 3, |i, j| {
        let a = (i as f64 * 0.37).sin();
        let b = (i as f64 * 0.11).cos() * 3.0;
        match j {
            0 => a,
            1 => b,
            _ => 2.0 * a - b,
        }
    });
    let y = Mat::from_fn(n_samples, 1, |i, _| 1.0 + 2.0 * x[(i, 0)] + 0.5 * x[(i, 1)]);
    (x, y)
}

/// Generate data with a constant column.
pub fn generate_constant_column_data(n_samples: usize) -> (Mat<f64>, Mat<f64>) {
    let x = Mat::from_fn(n_samples, 3, |i, j| match j {
        0 => i as f64,
        1 => 5.0, // Constant column
        _ => ((i * i) % 11) as f64,
    });
    let y = Mat::from_fn(n_samples, 1, |i, _| 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)]);
    (x, y)
}

/// Inner product of two columns of the same matrix.
pub fn column_dot(m: &Mat<f64>, a: usize, b: usize) -> f64 {
    (0..m.nrows()).map(|i| m[(i, a)] * m[(i, b)]).sum::<f64>()
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
