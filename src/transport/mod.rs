//! Outbound transport capability.
//!
//! The relay handler never talks to the network itself. It calls a
//! [`Transport`], constructed once at the composition root and injected into
//! the handler state. Production uses a hyper client behind a fixed
//! deadline; tests substitute deterministic implementations.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

/// Errors surfaced by the outbound transport.
///
/// The handler collapses every variant into one generic upstream failure for
/// the caller; the detail only reaches internal logs.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The upstream did not answer within the deadline.
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, connect, or protocol failure.
    #[error("upstream request failed: {0}")]
    Connect(String),
}

/// Capability to perform one HTTP request and return its response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError>;
}

/// Production transport backed by a hyper client.
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HyperTransport {
    /// Create a transport with the given per-request deadline.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, timeout }
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError> {
        match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response.map(Body::new)),
            Ok(Err(err)) => Err(TransportError::Connect(err.to_string())),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}
