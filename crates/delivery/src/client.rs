//! Single-attempt delivery of event envelopes to the control plane.
//!
//! [`DeliveryClient`] sends one JSON-encoded [`EventEnvelope`] per call via
//! HTTP POST, bounded by a fixed timeout. There is no retry, buffering or
//! batching: the caller awaits the outcome of exactly one exchange.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Request, Uri};
use orbital_core::EventEnvelope;
use serde_json::Value;

use crate::error::{RelayError, TransportError};
use crate::transport::Transport;

/// Logical base address of the control plane.
pub const DEFAULT_BASE_URL: &str = "http://orbital-relay";

/// Path every envelope is posted to.
pub const DEFAULT_RELAY_PATH: &str = "/orbital-relay";

/// Upper bound for one delivery, connect through response body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Downstream response bodies are kept for logs only, truncated to this size.
const MAX_LOGGED_BODY: usize = 512;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub base_url: String,
    pub path: String,
    pub timeout: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_RELAY_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// DeliveryClient
// ---------------------------------------------------------------------------

/// Forwards relayed events to the control plane.
///
/// Holds the process-wide transport; clone the surrounding `Arc` to share it
/// across handlers. Concurrent deliveries do not contend on anything here.
pub struct DeliveryClient {
    transport: Arc<dyn Transport>,
    endpoint: Uri,
    timeout: Duration,
}

impl fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("transport", &self.transport.describe())
            .finish()
    }
}

impl DeliveryClient {
    /// Create a client posting to `base_url` + `path` over `transport`.
    pub fn new(transport: Arc<dyn Transport>, config: DeliveryConfig) -> Result<Self, RelayError> {
        let url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.path.trim_start_matches('/')
        );

        let endpoint: Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
            RelayError::InvalidEndpoint {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        if endpoint.scheme().is_none() || endpoint.authority().is_none() {
            return Err(RelayError::InvalidEndpoint {
                url,
                reason: "base URL must include a scheme and host".to_string(),
            });
        }

        tracing::debug!(
            %endpoint,
            transport = %transport.describe(),
            timeout_ms = config.timeout.as_millis() as u64,
            "Delivery client configured"
        );

        Ok(Self {
            transport,
            endpoint,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Deliver one event to the control plane.
    ///
    /// Returns `Ok(())` when the control plane answers with any 2xx status.
    /// Makes exactly one attempt.
    pub async fn deliver(&self, event: &str, version: &str, payload: Value) -> Result<(), RelayError> {
        let envelope = EventEnvelope::new(event, version, payload);
        let body = Bytes::from(serde_json::to_vec(&envelope)?);

        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(TransportError::from)?;

        let started = Instant::now();
        let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(result) => result.inspect_err(|e| {
                tracing::warn!(event, version, error = %e, "Control plane unreachable");
            })?,
            Err(_) => {
                tracing::warn!(
                    event,
                    version,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Control plane delivery timed out"
                );
                return Err(RelayError::Timeout {
                    timeout: self.timeout,
                });
            }
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_body(response.body());
            tracing::warn!(
                event,
                version,
                status = status.as_u16(),
                elapsed_ms,
                "Control plane rejected event"
            );
            return Err(RelayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(event, version, status = status.as_u16(), elapsed_ms, "Event delivered");
        Ok(())
    }
}

fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_LOGGED_BODY) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.into_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
