//! HTTP relay subsystem.
//!
//! # Data Flow
//! ```text
//! inbound connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → relay.rs (decode → validate → forward → summarize → record)
//!     → model.rs (boundary shapes, header flattening)
//!     → reply to client
//! ```

pub mod error;
pub mod model;
pub mod relay;
pub mod server;

pub use relay::{RelayState, TRACE_ID_HEADER};
pub use server::RelayServer;
