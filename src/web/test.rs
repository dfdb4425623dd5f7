use poem::test::TestClient;
use poem::Endpoint;
use tempfile::TempDir;

use crate::history::HistoryStore;
use crate::model::california;
use crate::prelude::*;
use crate::service::PredictionService;
use crate::web::{create_app, ServiceName};

/// Creates the application backed by the California model and a temporary history.
pub fn create_test_client() -> Result<(TempDir, TestClient<impl Endpoint>)> {
    let dir = tempfile::tempdir()?;
    let history = Arc::new(HistoryStore::new(dir.path().join("prediction_history.json")));
    let service = PredictionService::new(Arc::new(california()), history);
    let app = create_app(service, ServiceName("House Price Predictor".to_string()));
    Ok((dir, TestClient::new(app)))
}
