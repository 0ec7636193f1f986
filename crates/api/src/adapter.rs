//! Runtime side of an event source: validate, forward, answer.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::StatusCode;
use orbital_core::{validate_payload, EventEndpoint, EventSource};
use orbital_delivery::DeliveryClient;
use serde_json::Value;

use crate::error::AppResult;

/// Serves the endpoints of one [`EventSource`].
///
/// Owns nothing but the source's static declarations and a handle to the
/// shared delivery client, so one adapter is safe to call concurrently from
/// any number of requests.
pub struct EventSourceAdapter {
    source: &'static EventSource,
    delivery: Arc<DeliveryClient>,
}

impl EventSourceAdapter {
    pub fn new(source: &'static EventSource, delivery: Arc<DeliveryClient>) -> Self {
        Self { source, delivery }
    }

    pub fn source(&self) -> &'static EventSource {
        self.source
    }

    /// Relay one inbound body as `endpoint`'s canonical event.
    ///
    /// Invalid bodies are rejected before the control plane is contacted.
    /// A valid body leads to exactly one delivery attempt.
    pub async fn handle(&self, endpoint: &EventEndpoint, body: Bytes) -> AppResult<StatusCode> {
        let payload = validate_payload(&body).inspect_err(|e| {
            tracing::warn!(
                source = self.source.name,
                path = endpoint.path,
                error = %e,
                "Inbound event rejected"
            );
        })?;

        self.delivery
            .deliver(endpoint.event, endpoint.version, Value::Object(payload))
            .await?;

        tracing::info!(
            source = self.source.name,
            path = endpoint.path,
            event = endpoint.event,
            version = endpoint.version,
            "Event relayed"
        );
        Ok(StatusCode::OK)
    }
}
