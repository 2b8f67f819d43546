//! Factor extraction engines and the PLS estimator built on them.

mod nipals;
mod pls;
mod simpls;
mod traits;

pub use nipals::nipals;
pub use pls::{FittedPls, PlsRegressor, PlsRegressorBuilder};
pub use simpls::simpls;
pub use traits::{FittedRegressor, PlsError, Regressor};
