use crate::model::InvalidFeatures;
use crate::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidFeatures),

    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("inference timed out after {0:?}")]
    Timeout(StdDuration),

    /// The model did predict, but the prediction could not be logged.
    #[error("failed to store the prediction: {0:#}")]
    Storage(anyhow::Error),
}
