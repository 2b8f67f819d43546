//! Utility functions.

mod matrix;

pub use matrix::{
    column, column_means, column_std_devs, column_sum_of_squares, detect_constant_columns, dot,
    ensure_finite, leading_columns, norm, normalize, set_column, sum_of_squares, times,
    transpose_times, ColumnStatistics,
};
