//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the upstream
//! HTTP client), [`build_router`] for turning the route table into the
//! Axum router with middleware layers, [`build_http_client`] for the
//! connection-pooled hyper client, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::config::model::ClientSettings;
use crate::error::WaypointError;
use crate::proxy::routing::{self, RouteTable};

pub type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Upstream client. The request body type is the inbound body type, so
/// a caller's body streams straight into the outbound request.
pub type HttpClient = Client<HttpsConnector, Body>;

pub struct AppState {
    pub http_client: HttpClient,
}

impl AppState {
    #[must_use]
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            http_client: build_http_client(settings),
        }
    }
}

#[must_use]
pub fn build_http_client(settings: &ClientSettings) -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the default.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(settings.connect_timeout());

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(settings.pool_idle_timeout())
        .build(https)
}

/// Register every rule of `table` and wrap the result in the middleware
/// stack.
///
/// Fails only when the router rejects a pattern, which is fatal at startup.
pub fn build_router(state: Arc<AppState>, table: &RouteTable) -> Result<Router, WaypointError> {
    let router = with_middleware(routing::register_routes(table)?).with_state(state);
    Ok(router)
}

/// Request tracing, plus panic recovery: a handler that panics answers
/// its own request with a 500 and the server keeps running.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn panicking_router() -> Router {
        with_middleware(
            Router::new()
                .route("/boom", get(|| async { panic!("handler failure") as () }))
                .route("/ok", get(|| async { "fine" })),
        )
    }

    fn get_request(path: &str) -> axum::extract::Request {
        axum::extract::Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn panic_becomes_500() {
        let response = panicking_router().oneshot(get_request("/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Internal Server Error");
    }

    #[tokio::test]
    async fn router_keeps_serving_after_a_panic() {
        let router = panicking_router();
        let _ = router.clone().oneshot(get_request("/boom")).await.unwrap();

        let response = router.oneshot(get_request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let response = panic_response(Box::new("static message"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = panic_response(Box::new(String::from("owned message")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
