use std::net::IpAddr;
use std::str::FromStr;

use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Cors, Tracing};
use poem::{get, post, Endpoint, EndpointExt, Route, Server};

use crate::opts::WebOpts;
use crate::prelude::*;
use crate::service::PredictionService;
use crate::web::middleware::{
    ErrorMiddleware, SecurityHeadersMiddleware, SentryMiddleware, TimeItMiddleware,
};

mod middleware;
mod partials;
#[cfg(test)]
mod test;
mod views;

/// Name the health check reports.
#[derive(Clone)]
pub struct ServiceName(pub String);

pub async fn run(opts: &WebOpts, service: PredictionService) -> Result {
    let app = create_app(service, ServiceName(opts.service_name.clone()));
    info!(host = opts.host.as_str(), port = opts.port, "listening");
    Server::new(TcpListener::bind((IpAddr::from_str(&opts.host)?, opts.port)))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutting down…");
            },
            Some(StdDuration::from_secs(5)),
        )
        .await?;
    Ok(())
}

pub fn create_app(service: PredictionService, service_name: ServiceName) -> impl Endpoint {
    let sentry = SentryMiddleware::new(&service_name.0);
    Route::new()
        .at("/", get(views::index::get).post(views::index::post))
        .at("/clear", post(views::index::post_clear))
        .at("/predict", post(views::api::post_predict))
        .at("/health", get(views::api::get_health))
        .at("/history", get(views::api::get_history).delete(views::api::delete_history))
        .at("/stats", get(views::api::get_stats))
        .data(service)
        .data(service_name)
        .with(Tracing)
        .with(CatchPanic::new())
        .with(ErrorMiddleware)
        .with(TimeItMiddleware)
        .with(SecurityHeadersMiddleware)
        .with(sentry)
        .with(Cors::new())
}
