//! The forwarding engine: one inbound request in, one upstream call out.
//!
//! [`forward`] builds the outbound request (same method, every header,
//! the inbound body moved in as a stream), executes it on the shared
//! client and relays the upstream response back without buffering it.
//!
//! The upstream body is owned by the relayed response body. Whether the
//! stream completes, fails, or the caller hangs up, that body is dropped
//! and the upstream connection is released with it.

use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use http::uri::PathAndQuery;
use http::Uri;
use http_body_util::BodyExt;
use hyper::body::Incoming;

use super::headers::append_all;
use crate::error::ForwardError;
use crate::server::HttpClient;

/// Outbound URL: `base` followed by the inbound path and query, verbatim.
///
/// No prefix stripping and no slash normalization: `http://up/` with
/// `/api` yields `http://up//api`.
#[must_use]
pub fn target_url(base: &str, uri: &Uri) -> String {
    let path = uri.path_and_query().map_or(uri.path(), PathAndQuery::as_str);
    format!("{base}{path}")
}

/// Turn the inbound request into the outbound one for `target`.
///
/// The inbound body is moved, not copied; it is read exactly once, as
/// the client writes it upstream.
pub fn build_outbound(request: Request, target: &str) -> Result<Request, ForwardError> {
    let (parts, body) = request.into_parts();

    let mut outbound = http::Request::builder()
        .method(parts.method)
        .uri(target)
        .body(body)
        .map_err(|e| ForwardError::BuildRequest {
            target: target.to_string(),
            source: Box::new(e),
        })?;

    append_all(parts.headers, outbound.headers_mut());
    Ok(outbound)
}

/// Forward `request` to `base` + its path and stream the answer back.
#[allow(clippy::cast_possible_truncation)]
pub async fn forward(
    client: &HttpClient,
    request: Request,
    base: &str,
) -> Result<Response, ForwardError> {
    let target = target_url(base, request.uri());
    let outbound = build_outbound(request, &target)?;

    tracing::info!(target_url = %target, "forwarding request");
    let start = Instant::now();

    let upstream = client
        .request(outbound)
        .await
        .map_err(|e| ForwardError::Upstream {
            target: target.clone(),
            source: Box::new(e),
        })?;

    tracing::info!(
        status = upstream.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "upstream responded"
    );

    Ok(relay_response(upstream, target))
}

/// Copy status and headers from the upstream response and hand its body
/// over as a stream.
///
/// A read error on the upstream body is logged and surfaces as
/// [`ForwardError::ResponseStream`], which makes the server abort the
/// caller's response after whatever was already flushed.
pub fn relay_response(upstream: http::Response<Incoming>, target: String) -> Response {
    let (parts, incoming) = upstream.into_parts();

    let body = incoming.map_err(move |e| {
        tracing::warn!(target_url = %target, error = %e, "upstream response stream failed");
        ForwardError::ResponseStream {
            target: target.clone(),
            source: Box::new(e),
        }
    });

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    append_all(parts.headers, response.headers_mut());
    response
}
