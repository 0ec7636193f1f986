use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The message forwarded to the control plane for every accepted event.
///
/// Serializes as `{"event": .., "version": .., "payload": ..}`. The payload
/// is the inbound body passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: String,
    pub version: String,
    pub payload: Value,
}

impl EventEnvelope {
    pub fn new(event: impl Into<String>, version: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            version: version.into(),
            payload,
        }
    }
}
