use poem::error::{
    MethodNotAllowedError, NotFoundError, ParseFormError, ParseJsonError, ReadBodyError,
};
use poem::http::StatusCode;
use poem::web::Json;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use serde::Serialize;

use crate::prelude::*;

/// Body of every failed API call.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn respond(error: impl ToString, status: StatusCode) -> Response {
        Json(Self {
            error: error.to_string(),
        })
        .with_status(status)
        .into_response()
    }
}

/// Renders the errors that escaped the handlers as [`ErrorResponse`]s.
pub struct ErrorMiddleware;

impl<E: Endpoint<Output = Response>> Middleware<E> for ErrorMiddleware {
    type Output = ErrorMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorMiddlewareImpl { ep }
    }
}

pub struct ErrorMiddlewareImpl<E> {
    ep: E,
}

#[poem::async_trait]
impl<E: Endpoint<Output = Response>> Endpoint for ErrorMiddlewareImpl<E> {
    type Output = Response;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let error = match self.ep.call(request).await {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };
        let status = status_code(&error);
        if status.is_server_error() {
            error!(?method, ?uri, "{:#}", error);
        } else {
            info!(?method, ?uri, "{:#}", error);
        }
        Ok(ErrorResponse::respond(error, status))
    }
}

fn status_code(error: &poem::Error) -> StatusCode {
    if error.is::<NotFoundError>() {
        StatusCode::NOT_FOUND
    } else if error.is::<MethodNotAllowedError>() {
        StatusCode::METHOD_NOT_ALLOWED
    } else if error.is::<ParseFormError>()
        || error.is::<ParseJsonError>()
        || error.is::<ReadBodyError>()
    {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
