//! The relay endpoint handler.
//!
//! One inbound exchange walks a fixed sequence of terminal states: decode
//! the JSON description, validate it, build the outbound request with an
//! injected trace header, forward it through the transport capability,
//! summarize the response, then reply and record. There are no retries; the
//! first failure of any step ends the exchange.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::error::RelayError;
use crate::http::model::{flatten_headers, RelayRequest, RelayResponse};
use crate::observability::metrics;
use crate::trace;
use crate::traffic::{TrafficLog, TrafficRecord};
use crate::transport::Transport;

/// Header attached to every outbound request so the target can observe and
/// correlate the call with the relay's reply and logs.
pub const TRACE_ID_HEADER: &str = "x-hhp-trace-id";

/// State injected into the relay handler.
#[derive(Clone)]
pub struct RelayState {
    pub transport: Arc<dyn Transport>,
    pub traffic: TrafficLog,
}

/// Handle one relay exchange.
pub async fn relay_handler(
    State(state): State<RelayState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();

    match relay(&state, body).await {
        Ok((request, response)) => {
            metrics::record_relay("ok", StatusCode::OK.as_u16(), start_time);
            tracing::info!(
                method = %request.method,
                peer = %peer,
                id = %response.id,
                "Relay OK"
            );
            let reply = (StatusCode::OK, Json(response.clone())).into_response();
            state
                .traffic
                .insert(response.id.clone(), TrafficRecord { request, response });
            reply
        }
        Err(err) => {
            metrics::record_relay(err.outcome(), err.status().as_u16(), start_time);
            tracing::warn!(
                peer = %peer,
                errors = %err.messages().join(","),
                "Relay failed"
            );
            err.into_response()
        }
    }
}

/// Run one exchange up to its terminal state.
async fn relay(
    state: &RelayState,
    body: Bytes,
) -> Result<(RelayRequest, RelayResponse), RelayError> {
    let request: RelayRequest = serde_json::from_slice(&body).map_err(|_| RelayError::Decode)?;

    let target = validate(&request)?;
    let (outbound, trace_id) = prepare(&request, target).ok_or(RelayError::Prepare)?;

    let upstream = state.transport.send(outbound).await.map_err(|err| {
        tracing::warn!(%err, id = %trace_id, "Upstream call failed");
        RelayError::Upstream
    })?;

    let (parts, upstream_body) = upstream.into_parts();
    let headers = flatten_headers(&parts.headers);
    // A body that cannot be fully read degrades to length 0; the exchange
    // itself already succeeded.
    let length = match axum::body::to_bytes(upstream_body, usize::MAX).await {
        Ok(bytes) => bytes.len(),
        Err(_) => 0,
    };

    let response = RelayResponse {
        id: trace_id,
        status: parts.status.as_u16(),
        length,
        headers,
    };
    Ok((request, response))
}

/// Check the relay description, accumulating every failed check in order:
/// method first, then URL. URL emptiness and URL parse failure are mutually
/// exclusive; parsing is only attempted on a non-empty URL.
fn validate(request: &RelayRequest) -> Result<Uri, RelayError> {
    let mut errors = Vec::new();

    if request.method.is_empty() {
        errors.push("method is empty".to_string());
    }
    let target = if request.raw_url.is_empty() {
        errors.push("url is empty".to_string());
        None
    } else {
        match request.raw_url.parse::<Uri>() {
            Ok(uri) => Some(uri),
            Err(_) => {
                // Wire-compatible message, doubled "is" included.
                errors.push("url is is invalid".to_string());
                None
            }
        }
    };

    match target {
        Some(uri) if errors.is_empty() => Ok(uri),
        _ => Err(RelayError::Validation(errors)),
    }
}

/// Build the outbound request and mint its trace identifier.
///
/// Returns `None` when the description holds a method token or header the
/// HTTP layer cannot represent.
fn prepare(request: &RelayRequest, target: Uri) -> Option<(Request<Body>, String)> {
    let method = Method::from_bytes(request.method.as_bytes()).ok()?;

    let mut builder = Request::builder().method(method).uri(target);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let trace_id = trace::generate();
    let outbound = builder
        .header(TRACE_ID_HEADER, trace_id.as_str())
        .body(Body::empty())
        .ok()?;
    Some((outbound, trace_id))
}
