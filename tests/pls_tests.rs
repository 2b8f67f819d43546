//! PLS regression tests.

mod common;

use anofox_pls::core::OptionsError;
use anofox_pls::prelude::*;
use approx::assert_relative_eq;
use faer::Mat;

// ============================================================================
// Structural properties of the factors
// ============================================================================

#[test]
fn test_scores_are_orthonormal() {
    let (x, y, _, _) = common::generate_multivariate_data(40, 5, 3, 0.1, 42);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .n_factors(4)
            .algorithm(algorithm)
            .build()
            .fit(&x, &y)
            .expect("fit should succeed");

        let t = fitted.x_scores();
        for a in 0..4 {
            for b in 0..4 {
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_relative_eq!(common::column_dot(t, a, b), expected, epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn test_nipals_weights_are_orthonormal() {
    let (x, y, _, _) = common::generate_multivariate_data(40, 5, 2, 0.1, 7);
    let fitted = PlsRegressor::builder().build().fit(&x, &y).unwrap();

    let w = fitted.weights();
    for a in 0..fitted.n_factors() {
        for b in 0..fitted.n_factors() {
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_relative_eq!(common::column_dot(w, a, b), expected, epsilon = 1e-8);
        }
    }
}

#[test]
fn test_full_rank_reconstruction_of_inputs() {
    let (x, y, _, _) = common::generate_multivariate_data(30, 4, 2, 0.2, 3);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .algorithm(algorithm)
            .standardize(true)
            .build()
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.n_factors(), 4);

        // X₀ = T Pᵀ once every factor is extracted
        let x0 = fitted.x_statistics().adjust(&x).unwrap();
        let t = fitted.x_scores();
        let p = fitted.x_loadings();
        for i in 0..30 {
            for j in 0..4 {
                let reconstructed: f64 = (0..4).map(|k| t[(i, k)] * p[(j, k)]).sum();
                assert_relative_eq!(reconstructed, x0[(i, j)], epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn test_output_residual_matches_factor_model() {
    let (x, y, _, _) = common::generate_multivariate_data(30, 4, 2, 0.5, 11);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .n_factors(2)
            .algorithm(algorithm)
            .build()
            .fit(&x, &y)
            .unwrap();

        // Y₀ − T diag(b) Cᵀ leaves exactly the recorded residual
        let factors = fitted.factors();
        let y0 = fitted.y_statistics().adjust(&y).unwrap();
        for j in 0..2 {
            let residual_ss: f64 = (0..30)
                .map(|i| {
                    let fitted_value: f64 = (0..2)
                        .map(|k| {
                            factors.x_scores[(i, k)]
                                * factors.inner_coefficients[k]
                                * factors.y_loadings[(j, k)]
                        })
                        .sum();
                    (y0[(i, j)] - fitted_value).powi(2)
                })
                .sum();
            assert_relative_eq!(residual_ss, factors.y_residual_ss[j], epsilon = 1e-8);
        }
    }
}

#[test]
fn test_explained_variance_is_monotone() {
    let (x, y, _, _) = common::generate_multivariate_data(50, 6, 2, 0.3, 5);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .algorithm(algorithm)
            .build()
            .fit(&x, &y)
            .unwrap();

        let cum_x = fitted.cumulative_x_explained();
        let cum_y = fitted.cumulative_y_explained();
        for k in 0..fitted.n_factors() {
            assert!(fitted.x_explained()[k] >= 0.0);
            assert!(fitted.y_explained()[k] >= 0.0);
            if k > 0 {
                assert!(cum_x[k] >= cum_x[k - 1]);
                assert!(cum_y[k] >= cum_y[k - 1]);
            }
        }
        assert!(cum_y[fitted.n_factors() - 1] <= 1.0 + 1e-10);
        assert_relative_eq!(cum_x[fitted.n_factors() - 1], 1.0, epsilon = 1e-8);
    }
}

// ============================================================================
// Algorithm agreement
// ============================================================================

#[test]
fn test_single_response_algorithms_agree() {
    let (x, y, _, _) = common::generate_multivariate_data(40, 5, 1, 0.3, 99);

    let nipals = PlsRegressor::builder().build().fit(&x, &y).unwrap();
    let simpls = PlsRegressor::builder()
        .algorithm(Algorithm::Simpls)
        .build()
        .fit(&x, &y)
        .unwrap();

    for k in 1..=5 {
        let a = nipals.build_regression(k).unwrap();
        let b = simpls.build_regression(k).unwrap();
        for i in 0..5 {
            assert_relative_eq!(a.weights()[(i, 0)], b.weights()[(i, 0)], epsilon = 1e-6);
        }
        assert_relative_eq!(a.intercepts()[0], b.intercepts()[0], epsilon = 1e-6);
    }
}

// ============================================================================
// Projection and regression
// ============================================================================

#[test]
fn test_noiseless_data_recovers_coefficients() {
    let (x, y, coefficients, intercepts) = common::generate_multivariate_data(30, 4, 3, 0.0, 17);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        for standardize in [false, true] {
            let fitted = PlsRegressor::builder()
                .algorithm(algorithm)
                .standardize(standardize)
                .build()
                .fit(&x, &y)
                .unwrap();

            let model = fitted.regression();
            for i in 0..4 {
                for j in 0..3 {
                    assert_relative_eq!(
                        model.weights()[(i, j)],
                        coefficients[(i, j)],
                        epsilon = 1e-8
                    );
                }
            }
            for j in 0..3 {
                assert_relative_eq!(model.intercepts()[j], intercepts[j], epsilon = 1e-8);
            }

            let scores = fitted.score(&x, &y).unwrap();
            for j in 0..3 {
                assert_relative_eq!(scores[j], 1.0, epsilon = 1e-10);
            }
        }
    }
}

#[test]
fn test_transform_inputs_projects_onto_x_loadings() {
    let (x, y, _, _) = common::generate_multivariate_data(25, 4, 2, 0.2, 8);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .n_factors(3)
            .algorithm(algorithm)
            .standardize(true)
            .build()
            .fit(&x, &y)
            .unwrap();

        let projected = fitted.transform_inputs(&x, 3).unwrap();
        let x0 = fitted.x_statistics().adjust(&x).unwrap();
        let p = fitted.x_loadings();
        for i in 0..25 {
            for a in 0..3 {
                let expected: f64 = (0..4).map(|j| x0[(i, j)] * p[(j, a)]).sum();
                assert_relative_eq!(projected[(i, a)], expected, epsilon = 1e-10);
            }
        }

        // Leading columns do not depend on how many dimensions are requested
        let first = fitted.transform_inputs(&x, 1).unwrap();
        for i in 0..25 {
            assert_relative_eq!(first[(i, 0)], projected[(i, 0)], epsilon = 1e-12);
        }

        let empty = fitted.transform_inputs(&x, 0).unwrap();
        assert_eq!(empty.nrows(), 25);
        assert_eq!(empty.ncols(), 0);
    }
}

#[test]
fn test_scores_for_matches_training_scores() {
    let (x, y, _, _) = common::generate_multivariate_data(25, 4, 2, 0.2, 8);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .n_factors(3)
            .algorithm(algorithm)
            .standardize(true)
            .build()
            .fit(&x, &y)
            .unwrap();

        let scores = fitted.scores_for(&x, 3).unwrap();
        for i in 0..25 {
            for k in 0..3 {
                assert_relative_eq!(scores[(i, k)], fitted.x_scores()[(i, k)], epsilon = 1e-8);
            }
        }
    }
}

#[test]
fn test_transform_outputs_uses_training_statistics() {
    let (x, y, _, _) = common::generate_multivariate_data(25, 4, 2, 0.2, 8);
    let fitted = PlsRegressor::builder().n_factors(2).build().fit(&x, &y).unwrap();

    let projected = fitted.transform_outputs(&y, 2).unwrap();
    let y0 = fitted.y_statistics().adjust(&y).unwrap();
    let c = fitted.y_loadings();
    for i in 0..25 {
        for k in 0..2 {
            let expected = y0[(i, 0)] * c[(0, k)] + y0[(i, 1)] * c[(1, k)];
            assert_relative_eq!(projected[(i, k)], expected, epsilon = 1e-12);
        }
    }

    // A single new row is centered with the training means, not its own
    let row = Mat::from_fn(1, 2, |_, j| fitted.y_statistics().means()[j]);
    let centered = fitted.transform_outputs(&row, 2).unwrap();
    assert_relative_eq!(centered[(0, 0)], 0.0, epsilon = 1e-12);
    assert_relative_eq!(centered[(0, 1)], 0.0, epsilon = 1e-12);
}

#[test]
fn test_prediction_on_new_data() {
    let (x, y, _, _) = common::generate_multivariate_data(60, 4, 2, 0.05, 21);
    let (x_new, y_new, _, _) = common::generate_multivariate_data(10, 4, 2, 0.0, 22);

    let fitted = PlsRegressor::builder().build().fit(&x, &y).unwrap();
    let predictions = fitted.predict(&x_new).unwrap();
    assert_eq!(predictions.nrows(), 10);
    assert_eq!(predictions.ncols(), 2);

    for i in 0..10 {
        for j in 0..2 {
            assert!((predictions[(i, j)] - y_new[(i, j)]).abs() < 0.2);
        }
    }
}

// ============================================================================
// Rank deficiency
// ============================================================================

#[test]
fn test_collinear_inputs_stop_early() {
    let (x, y) = common::generate_collinear_data(30);

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .algorithm(algorithm)
            .build()
            .fit(&x, &y)
            .expect("rank-deficient inputs should still fit");

        assert_eq!(fitted.requested_factors(), 3);
        assert_eq!(fitted.n_factors(), 2);

        let predictions = fitted.predict(&x).unwrap();
        for i in 0..30 {
            assert_relative_eq!(predictions[(i, 0)], y[(i, 0)], epsilon = 1e-8);
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_response_statistics() {
    let (x, y, _, _) = common::generate_multivariate_data(50, 3, 2, 0.5, 13);
    let fitted = PlsRegressor::builder().n_factors(2).build().fit(&x, &y).unwrap();

    let stats = fitted.response_statistics();
    assert_eq!(stats.len(), 2);

    let scores = fitted.score(&x, &y).unwrap();
    for j in 0..2 {
        assert!(stats[j].r_squared > 0.5 && stats[j].r_squared < 1.0);
        assert_relative_eq!(stats[j].r_squared, scores[j], epsilon = 1e-8);
        assert!(stats[j].adj_r_squared < stats[j].r_squared);
        assert!(stats[j].f_pvalue < 0.01);
        assert_relative_eq!(stats[j].rmse, stats[j].mse.sqrt(), epsilon = 1e-12);
    }
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_standardize_rejects_constant_column() {
    let (x, y) = common::generate_constant_column_data(20);

    let result = PlsRegressor::builder().standardize(true).build().fit(&x, &y);
    assert!(matches!(
        result,
        Err(PlsError::ZeroStandardDeviation {
            matrix: "X",
            column: 1
        })
    ));

    // Centering alone is fine; the constant column simply carries no weight
    let fitted = PlsRegressor::builder()
        .n_factors(2)
        .build()
        .fit(&x, &y)
        .expect("centered fit should succeed");
    assert_eq!(fitted.n_factors(), 2);
}

#[test]
fn test_factor_count_boundary() {
    // n - 1 = 5 is smaller than p = 8
    let (x, y, _, _) = common::generate_multivariate_data(6, 8, 1, 0.1, 4);

    assert!(PlsRegressor::builder().n_factors(5).build().fit(&x, &y).is_ok());
    assert!(matches!(
        PlsRegressor::builder().n_factors(6).build().fit(&x, &y),
        Err(PlsError::InvalidFactorCount {
            requested: 6,
            max: 5
        })
    ));
    assert!(matches!(
        PlsRegressor::builder().n_factors(0).build().fit(&x, &y),
        Err(PlsError::InvalidOptions(OptionsError::ZeroFactors))
    ));
}

#[test]
fn test_build_regression_factor_bounds() {
    let (x, y, _, _) = common::generate_multivariate_data(20, 4, 2, 0.1, 2);
    let fitted = PlsRegressor::builder().n_factors(3).build().fit(&x, &y).unwrap();

    assert!(matches!(
        fitted.build_regression(0),
        Err(PlsError::InvalidFactorCount { requested: 0, max: 3 })
    ));
    assert!(matches!(
        fitted.build_regression(4),
        Err(PlsError::InvalidFactorCount { requested: 4, max: 3 })
    ));

    let model = fitted.build_regression(3).unwrap();
    assert_eq!(model.n_inputs(), 4);
    assert_eq!(model.n_outputs(), 2);
}

#[test]
fn test_prediction_dimension_mismatch() {
    let (x, y, _, _) = common::generate_multivariate_data(20, 4, 2, 0.1, 2);
    let fitted = PlsRegressor::builder().n_factors(2).build().fit(&x, &y).unwrap();

    let wrong = Mat::<f64>::zeros(3, 5);
    assert!(matches!(
        fitted.predict(&wrong),
        Err(PlsError::ColumnMismatch { expected: 4, got: 5 })
    ));
    assert!(matches!(
        fitted.transform_inputs(&x, 3),
        Err(PlsError::DimensionsExceedFactors {
            requested: 3,
            available: 2
        })
    ));
}

#[test]
fn test_options_round_trip_through_regressor() {
    let options = PlsOptions::builder()
        .n_factors(2)
        .algorithm(Algorithm::Simpls)
        .tolerance(1e-8)
        .build()
        .unwrap();
    let regressor = PlsRegressor::new(options);
    assert_eq!(regressor.options().n_factors, Some(2));
    assert_eq!(regressor.options().algorithm, Algorithm::Simpls);

    let (x, y, _, _) = common::generate_multivariate_data(20, 4, 2, 0.1, 6);
    let borrowed = regressor.fit(&x, &y).unwrap();
    let owned = regressor.fit_owned(x.clone(), y.clone()).unwrap();
    for i in 0..20 {
        for k in 0..2 {
            assert_eq!(borrowed.x_scores()[(i, k)], owned.x_scores()[(i, k)]);
        }
    }
}
