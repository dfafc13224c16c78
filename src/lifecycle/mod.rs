//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Interrupt signal → Shutdown::trigger()
//!     → server stops accepting connections
//!     → in-flight exchanges drain (bounded by the request timeout)
//!     → listener closes, run() returns
//!     → owner inspects the traffic log
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accept, drain, close
//! - The traffic log is only read after the server task has joined

pub mod shutdown;

pub use shutdown::Shutdown;
