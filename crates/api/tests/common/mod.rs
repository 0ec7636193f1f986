#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use orbital_api::config::RelayConfig;
use orbital_api::router::build_app_router;
use orbital_api::state::AppState;
use orbital_core::{EventEnvelope, RoutingTable};
use orbital_delivery::{DeliveryClient, DeliveryConfig, Transport, TransportError};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// RecordingTransport
// ---------------------------------------------------------------------------

/// Stands in for the control plane: records every envelope it is sent and
/// answers with a fixed status, optionally after a delay.
pub struct RecordingTransport {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    envelopes: Mutex<Vec<EventEnvelope>>,
}

impl RecordingTransport {
    pub fn ok() -> Arc<Self> {
        Self::answering(StatusCode::OK, "")
    }

    pub fn answering(status: StatusCode, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            delay: Duration::ZERO,
            envelopes: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(status: StatusCode, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: "",
            delay,
            envelopes: Mutex::new(Vec::new()),
        })
    }

    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        self.envelopes.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.envelopes.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let envelope: EventEnvelope =
            serde_json::from_slice(request.body()).expect("outbound body must be an envelope");
        self.envelopes.lock().unwrap().push(envelope);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))
            .unwrap())
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `RelayConfig` with safe defaults.
pub fn test_config() -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    }
}

/// Build the full application router around `transport`, using the same
/// middleware stack as production.
pub fn build_test_app(transport: Arc<RecordingTransport>) -> Router {
    build_test_app_with(transport, test_config())
}

pub fn build_test_app_with(transport: Arc<RecordingTransport>, config: RelayConfig) -> Router {
    let delivery = DeliveryClient::new(transport, config.delivery.clone()).unwrap();

    let state = AppState {
        config: Arc::new(config),
        routing: Arc::new(RoutingTable::builtin().unwrap()),
        delivery: Arc::new(delivery),
    };

    build_app_router(state)
}

/// A config whose deliveries give up after `timeout`.
pub fn config_with_delivery_timeout(timeout: Duration) -> RelayConfig {
    RelayConfig {
        delivery: DeliveryConfig {
            timeout,
            ..Default::default()
        },
        ..test_config()
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(json.to_string())).await
}

pub async fn post_raw(app: Router, uri: &str, raw: &'static str) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(raw)).await
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
