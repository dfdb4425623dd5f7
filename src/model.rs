//! Pre-trained regression model the service predicts with.

pub use self::features::*;
pub use self::regression::*;

mod features;
mod regression;

#[cfg(test)]
pub use self::regression::tests::california;

use crate::prelude::*;

/// Trained model, shared read-only between requests.
pub trait Model: Send + Sync {
    /// Predicts the median house value, in `$100,000s`.
    ///
    /// The features are passed to the model as is.
    fn predict(&self, features: &Features) -> Result<f64>;
}
