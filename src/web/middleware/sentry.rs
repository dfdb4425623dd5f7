use std::collections::BTreeMap;

use poem::{Endpoint, Middleware, Request, Result};
use sentry::{Hub, SentryFutureExt};

use crate::prelude::*;

/// Runs every request on its own Sentry hub tagged with the service and the request,
/// so that concurrent predictions never share the scope.
pub struct SentryMiddleware {
    service_name: String,
}

impl SentryMiddleware {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for SentryMiddleware {
    type Output = SentryMiddlewareImpl<E>;

    fn transform(&self, ep: E) -> Self::Output {
        SentryMiddlewareImpl {
            ep,
            service_name: self.service_name.clone(),
        }
    }
}

pub struct SentryMiddlewareImpl<E> {
    ep: E,
    service_name: String,
}

#[poem::async_trait]
impl<E: Endpoint> Endpoint for SentryMiddlewareImpl<E> {
    type Output = E::Output;

    async fn call(&self, request: Request) -> Result<Self::Output> {
        let hub = Arc::new(Hub::new_from_top(Hub::current()));
        hub.configure_scope(|scope| {
            scope.set_tag("service", &self.service_name);
            scope.set_tag("request.method", request.method().as_str());
            scope.set_tag("request.path", request.uri().path());

            let mut context = BTreeMap::new();
            context.insert("query".to_string(), request.uri().query().into());
            context.insert("content_type".to_string(), request.content_type().into());
            scope.set_context("request", sentry::protocol::Context::Other(context));
        });
        self.ep.call(request).bind_hub(hub).await
    }
}
