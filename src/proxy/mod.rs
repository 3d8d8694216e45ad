//! Core HTTP forwarding.
//!
//! [`forward_handler`] is what every registered rule dispatches to: it
//! opens a per-request span, hands the request to the forwarding engine
//! ([`forward`]) and turns a failure into an error response for that
//! request only. Submodules handle the route table and registration
//! ([`routing`]), header relay ([`headers`]) and the upstream exchange
//! ([`forward`]).

pub mod forward;
pub mod headers;
pub mod routing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;

use crate::config::model::Rule;
use crate::error::ForwardError;
use crate::server::AppState;

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, status.canonical_reason().unwrap_or("error")).into_response()
    }
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward_handler(
    state: Arc<AppState>,
    client: SocketAddr,
    rule: Arc<Rule>,
    request: Request,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "forward",
        %request_id,
        method = %request.method(),
        uri = %request.uri(),
        client = %client,
        route = %rule.from,
    );

    async move {
        let start = Instant::now();
        match forward::forward(&state.http_client, request, &rule.to).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "forwarding failed"
                );
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}
