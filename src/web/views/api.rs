use poem::http::StatusCode;
use poem::web::{Data, Json};
use poem::{handler, IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::history::PredictionRecord;
use crate::model::InvalidFeatures;
use crate::prelude::*;
use crate::service::{PredictError, PredictionService};
use crate::web::middleware::ErrorResponse;
use crate::web::ServiceName;

const CACHE_CONTROL: &str = "no-cache";

/// Prediction request, the body itself is optional.
#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct PredictRequest {
    /// Features in the [`crate::model::Features::NAMES`] order.
    #[serde(default)]
    pub data: Option<Vec<f64>>,
}

impl PredictRequest {
    pub fn parse(body: &[u8]) -> StdResult<Self, InvalidFeatures> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|error| InvalidFeatures::Malformed(error.to_string()))
    }
}

#[derive(Serialize)]
struct PredictResponse {
    prediction: f64,
    unit: &'static str,
    success: bool,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: &'static str,
    service: String,
}

#[derive(Serialize)]
struct HistoryResponse {
    predictions: Vec<PredictionRecord>,
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn post_predict(
    body: Vec<u8>,
    Data(service): Data<&PredictionService>,
) -> Result<Response> {
    let result = match PredictRequest::parse(&body) {
        Ok(request) => service.predict(request.data).await,
        Err(error) => Err(error.into()),
    };
    let response = match result {
        Ok(record) => Json(PredictResponse {
            prediction: record.prediction,
            unit: PredictionRecord::UNIT,
            success: true,
        })
        .into_response(),
        Err(error) => {
            let status = status_code(&error);
            if status.is_server_error() {
                error!("{:#}", error);
            } else {
                warn!("{:#}", error);
            }
            ErrorResponse::respond(error, status)
        }
    };
    Ok(response.with_header("Cache-Control", CACHE_CONTROL).into_response())
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get_health(Data(service_name): Data<&ServiceName>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        model: "loaded",
        service: service_name.0.clone(),
    })
    .with_header("Cache-Control", CACHE_CONTROL)
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get_history(Data(service): Data<&PredictionService>) -> Result<impl IntoResponse> {
    let predictions = service.history().await?;
    debug!(n_predictions = predictions.len());
    Ok(Json(HistoryResponse { predictions }).with_header("Cache-Control", CACHE_CONTROL))
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn get_stats(Data(service): Data<&PredictionService>) -> Result<impl IntoResponse> {
    let response = match service.statistics().await? {
        Some(statistics) => Json(statistics).into_response(),
        None => Json(MessageResponse {
            message: "No predictions yet",
        })
        .into_response(),
    };
    Ok(response.with_header("Cache-Control", CACHE_CONTROL))
}

#[handler]
#[instrument(skip_all, level = "info")]
pub async fn delete_history(
    Data(service): Data<&PredictionService>,
) -> Result<impl IntoResponse> {
    service.clear_history().await?;
    Ok(Json(MessageResponse {
        message: "History cleared",
    }))
}

fn status_code(error: &PredictError) -> StatusCode {
    match error {
        PredictError::InvalidInput(_) | PredictError::Inference(_) => StatusCode::BAD_REQUEST,
        PredictError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        PredictError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_ok() -> Result {
        assert_eq!(PredictRequest::parse(b"")?, PredictRequest::default());
        assert_eq!(PredictRequest::parse(b" \n")?, PredictRequest::default());
        assert_eq!(PredictRequest::parse(b"{}")?, PredictRequest::default());
        assert_eq!(PredictRequest::parse(br#"{"data": null}"#)?, PredictRequest::default());
        Ok(())
    }

    #[test]
    fn parse_data_ok() -> Result {
        let request = PredictRequest::parse(br#"{"data": [1, 2.5, -3]}"#)?;
        assert_eq!(request.data, Some(vec![1.0, 2.5, -3.0]));
        Ok(())
    }

    #[test]
    fn parse_malformed_fails() {
        assert!(matches!(
            PredictRequest::parse(br#"{"data": [1, "two"]}"#),
            Err(InvalidFeatures::Malformed(_)),
        ));
        assert!(matches!(PredictRequest::parse(b"[1, 2"), Err(InvalidFeatures::Malformed(_))));
    }
}
