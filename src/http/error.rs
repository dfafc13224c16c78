//! Error types for the relay endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::http::model::ErrorResponse;

/// Caller-visible failures of one relay exchange.
///
/// Every variant is terminal: the exchange produces exactly one error reply,
/// nothing is retried, and nothing is recorded in the traffic log.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request body was not a decodable JSON relay description.
    #[error("json body decode error")]
    Decode,

    /// One or more validation checks failed, in check order.
    #[error("{}", .0.join(","))]
    Validation(Vec<String>),

    /// The outbound request could not be constructed from the validated
    /// description (method token or header not representable).
    #[error("request is is invalid")]
    Prepare,

    /// The outbound call could not be completed.
    #[error("request failed")]
    Upstream,
}

impl RelayError {
    /// Messages reported to the caller, in check order.
    pub fn messages(&self) -> Vec<String> {
        match self {
            RelayError::Decode => vec!["json body decode error".to_string()],
            RelayError::Validation(errors) => errors.clone(),
            RelayError::Prepare => vec!["request is is invalid".to_string()],
            RelayError::Upstream => vec!["request failed".to_string()],
        }
    }

    /// HTTP status of the error reply.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Upstream => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::Decode => "decode",
            RelayError::Validation(_) => "validation",
            RelayError::Prepare => "prepare",
            RelayError::Upstream => "upstream",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            errors: self.messages(),
        };
        (status, Json(body)).into_response()
    }
}
