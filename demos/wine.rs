//! # Partial Least Squares on the Wine Tasting Data
//!
//! Five wines are described by four chemical/market variables (price, sugar,
//! alcohol, acidity) and rated on three sensory scales (hedonic score, goes
//! with meat, goes with dessert). PLS finds the latent factors of the inputs
//! that best explain the ratings.
//!
//! ## Key Features
//! - NIPALS and SIMPLS factor extraction
//! - Explained variance per factor
//! - Variable Importance in Projection
//! - Regressions in the original units for any number of factors
//!
//! Run with: `cargo run --example wine`

use anofox_pls::prelude::*;
use faer::Mat;

fn main() {
    println!("=== Partial Least Squares: Wine Tasting ===\n");

    let (x, y) = wine_data();

    explained_variance(&x, &y);
    variable_importance_table(&x, &y);
    regression_by_factor_count(&x, &y);
    compare_algorithms(&x, &y);
}

fn wine_data() -> (Mat<f64>, Mat<f64>) {
    let inputs = [
        [7.0, 7.0, 13.0, 7.0],
        [4.0, 3.0, 14.0, 7.0],
        [10.0, 5.0, 12.0, 5.0],
        [16.0, 7.0, 11.0, 3.0],
        [13.0, 3.0, 10.0, 3.0],
    ];
    let outputs = [
        [14.0, 7.0, 8.0],
        [10.0, 7.0, 6.0],
        [8.0, 5.0, 5.0],
        [2.0, 4.0, 7.0],
        [6.0, 2.0, 4.0],
    ];
    (
        Mat::from_fn(5, 4, |i, j| inputs[i][j]),
        Mat::from_fn(5, 3, |i, j| outputs[i][j]),
    )
}

/// Variance of inputs and ratings captured by each factor
fn explained_variance(x: &Mat<f64>, y: &Mat<f64>) {
    println!("--- Explained Variance ---\n");

    let fitted = PlsRegressor::builder()
        .build()
        .fit(x, y)
        .expect("fit should succeed");

    println!(
        "Requested {} factors, extracted {}\n",
        fitted.requested_factors(),
        fitted.n_factors()
    );
    println!("Factor   X (%)   cum X (%)   Y (%)   cum Y (%)");
    for summary in fitted.factor_summaries() {
        println!(
            "{:>6}  {:>6.2}  {:>10.2}  {:>6.2}  {:>10.2}",
            summary.index + 1,
            100.0 * summary.x_explained,
            100.0 * summary.cumulative_x_explained,
            100.0 * summary.y_explained,
            100.0 * summary.cumulative_y_explained
        );
    }
    println!();
}

/// VIP of each input with an increasing number of factors
fn variable_importance_table(x: &Mat<f64>, y: &Mat<f64>) {
    println!("--- Variable Importance in Projection ---\n");

    let names = ["price", "sugar", "alcohol", "acidity"];
    let fitted = PlsRegressor::builder()
        .standardize(true)
        .build()
        .fit(x, y)
        .expect("fit should succeed");
    let vip = fitted.variable_importance();

    for (j, name) in names.iter().enumerate() {
        print!("{:<8}", name);
        for k in 0..vip.ncols() {
            print!("  {:>6.3}", vip[(j, k)]);
        }
        println!();
    }

    let important = important_predictors(&vip, fitted.n_factors(), 1.0);
    let important: Vec<&str> = important.iter().map(|&j| names[j]).collect();
    println!("\nVIP > 1 with all factors: {:?}\n", important);
}

/// Predictions for the first wine as factors are added
fn regression_by_factor_count(x: &Mat<f64>, y: &Mat<f64>) {
    println!("--- Regression by Number of Factors ---\n");

    let fitted = PlsRegressor::builder()
        .build()
        .fit(x, y)
        .expect("fit should succeed");
    let first = [x[(0, 0)], x[(0, 1)], x[(0, 2)], x[(0, 3)]];

    println!(
        "Recorded ratings: [{:.2}, {:.2}, {:.2}]",
        y[(0, 0)],
        y[(0, 1)],
        y[(0, 2)]
    );
    for k in 1..=fitted.n_factors() {
        let model = fitted.build_regression(k).expect("factor count is valid");
        let output = model.predict_row(&first).expect("row has four inputs");
        println!(
            "{} factor(s):      [{:.2}, {:.2}, {:.2}]",
            k, output[0], output[1], output[2]
        );
    }
    println!();
}

/// NIPALS and SIMPLS side by side
fn compare_algorithms(x: &Mat<f64>, y: &Mat<f64>) {
    println!("--- NIPALS vs SIMPLS ---\n");

    for algorithm in [Algorithm::Nipals, Algorithm::Simpls] {
        let fitted = PlsRegressor::builder()
            .n_factors(2)
            .algorithm(algorithm)
            .build()
            .fit(x, y)
            .expect("fit should succeed");

        let scores = fitted.score(x, y).expect("shapes match");
        println!(
            "{:?}: R² per rating = [{:.4}, {:.4}, {:.4}]",
            algorithm, scores[0], scores[1], scores[2]
        );

        let projected = fitted
            .scores_for(x, 2)
            .expect("two factors were extracted");
        println!("  first wine in factor space: ({:.4}, {:.4})", projected[(0, 0)], projected[(0, 1)]);
    }
}
