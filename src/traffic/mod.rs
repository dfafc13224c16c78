//! In-process traffic capture.
//!
//! Every successfully forwarded exchange is recorded exactly once, keyed by
//! its trace identifier. Records are never updated or deleted and live for
//! the process lifetime. Concurrent handlers insert through the map's
//! internal sharded locks; the owning process reads the log only after the
//! server has drained and stopped, so reads never race writes.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::http::model::{RelayRequest, RelayResponse};

/// One validated relay request paired with the summary sent to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub request: RelayRequest,
    pub response: RelayResponse,
}

/// A thread-safe log of relayed traffic.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Clone, Default)]
pub struct TrafficLog {
    inner: Arc<DashMap<String, TrafficRecord>>,
}

impl TrafficLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one exchange under its trace identifier.
    pub fn insert(&self, trace_id: String, record: TrafficRecord) {
        self.inner.insert(trace_id, record);
    }

    /// Look up the record for a trace identifier.
    pub fn get(&self, trace_id: &str) -> Option<TrafficRecord> {
        self.inner.get(trace_id).map(|r| r.value().clone())
    }

    /// Number of recorded exchanges.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Copy the records into an ordinary map.
    pub fn snapshot(&self) -> HashMap<String, TrafficRecord> {
        self.inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Render the captured traffic as pretty JSON for inspection.
    pub fn dump_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}
