//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! All failing checks are reported together, not just the first.

use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

/// A single semantic configuration error.
#[derive(Debug)]
pub enum ValidationError {
    /// The bind address does not parse as `host:port`.
    InvalidBindAddress(String),
    /// A timeout is configured as zero seconds.
    ZeroTimeout(&'static str),
    /// The inbound request limit is zero bytes.
    ZeroRequestLimit,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address: {}", addr)
            }
            ValidationError::ZeroTimeout(name) => write!(f, "timeout {} must be non-zero", name),
            ValidationError::ZeroRequestLimit => write!(f, "max_request_bytes must be non-zero"),
        }
    }
}

/// Validate a configuration, collecting every failed check.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }
    if config.listener.max_request_bytes == 0 {
        errors.push(ValidationError::ZeroRequestLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
