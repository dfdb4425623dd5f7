//! Prediction service shared by the web application and the command-line interface.

use tokio::task::spawn_blocking;

pub use self::error::*;
use crate::history::{HistoryStore, PredictionRecord};
use crate::model::{Features, Model};
use crate::prelude::*;
use crate::statistics::Statistics;

mod error;

#[derive(Clone)]
pub struct PredictionService {
    model: Arc<dyn Model>,
    history: Arc<HistoryStore>,
    inference_timeout: Option<StdDuration>,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Model>, history: Arc<HistoryStore>) -> Self {
        Self {
            model,
            history,
            inference_timeout: None,
        }
    }

    #[must_use]
    pub fn with_inference_timeout(mut self, inference_timeout: Option<StdDuration>) -> Self {
        self.inference_timeout = inference_timeout;
        self
    }

    /// Predicts the house price and logs the prediction.
    ///
    /// Missing data falls back to [`Features::EXAMPLE`].
    #[instrument(level = "info", skip_all)]
    pub async fn predict(
        &self,
        data: Option<Vec<f64>>,
    ) -> StdResult<PredictionRecord, PredictError> {
        let features = match data {
            Some(values) => Features::try_from(values.as_slice())?,
            None => Features::default(),
        };
        let prediction = self.infer(features).await?;

        let history = Arc::clone(&self.history);
        let record = run_blocking(move || history.record(features, prediction))
            .await
            .map_err(PredictError::Storage)?;
        info!(prediction, "logged");
        Ok(record)
    }

    pub async fn history(&self) -> Result<Vec<PredictionRecord>> {
        let history = Arc::clone(&self.history);
        run_blocking(move || Ok(history.load_all())).await
    }

    pub async fn statistics(&self) -> Result<Option<Statistics>> {
        Ok(Statistics::compute(&self.history().await?))
    }

    pub async fn clear_history(&self) -> Result {
        let history = Arc::clone(&self.history);
        run_blocking(move || history.clear()).await
    }

    async fn infer(&self, features: Features) -> StdResult<f64, PredictError> {
        let model = Arc::clone(&self.model);
        let inference = run_blocking(move || model.predict(&features));
        let result = match self.inference_timeout {
            Some(timeout) => tokio::time::timeout(timeout, inference)
                .await
                .map_err(|_| PredictError::Timeout(timeout))?,
            None => inference.await,
        };
        result.map_err(PredictError::Inference)
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    spawn_blocking(f).await?
}
