//! HTTP Relay Service Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod trace;
pub mod traffic;
pub mod transport;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use traffic::TrafficLog;
