//! Boundary data shapes for the relay endpoint.

use std::collections::HashMap;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Inbound description of the HTTP call to perform.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelayRequest {
    /// HTTP method token.
    #[serde(default)]
    pub method: String,

    /// Target URL, absolute or relative.
    #[serde(rename = "url", default)]
    pub raw_url: String,

    /// Headers to send, one value per name.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Summary of the relayed response, returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    /// Trace identifier assigned to this exchange.
    pub id: String,

    /// Status code returned by the target.
    pub status: u16,

    /// Byte length of the fully read response body.
    pub length: usize,

    /// Response headers, first value per name.
    pub headers: HashMap<String, String>,
}

/// Error reply listing the failed checks in check order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

/// Flatten a response header map to one value per name.
///
/// A repeated header keeps only its first value. Names are rendered in
/// canonical HTTP capitalization ("X-Data"); the `http` crate stores them
/// lowercased, but callers of the relay observe canonical names.
pub fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat = HashMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        if let Some(value) = headers.get(name) {
            flat.insert(
                canonical_header_name(name.as_str()),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
    }
    flat
}

/// Render a lowercased header name in canonical capitalization: the first
/// letter and every letter following a `-` are uppercased.
fn canonical_header_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if upper_next {
            canonical.extend(c.to_uppercase());
        } else {
            canonical.push(c);
        }
        upper_next = c == '-';
    }
    canonical
}
