use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orbital_core::ValidationError;
use orbital_delivery::RelayError;
use serde_json::json;

/// Body returned for any rejected inbound payload.
pub const NO_PAYLOAD: &str = "No payload";

/// Application-level error type for relay handlers.
///
/// Implements [`IntoResponse`] so handlers can use `?` throughout. Nothing a
/// downstream service said ever reaches the inbound caller: relay failures
/// are logged in full and answered with a fixed body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The inbound body was missing, empty or not a JSON object.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Delivery to the control plane failed.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(err) => {
                tracing::debug!(error = %err, "Rejected inbound payload");
                (
                    StatusCode::UNAUTHORIZED,
                    [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                    NO_PAYLOAD,
                )
                    .into_response()
            }
            AppError::Relay(err) => {
                tracing::error!(
                    error = %err,
                    downstream_status = err.status_code(),
                    "Event delivery failed"
                );
                let body = json!({
                    "error": "Event delivery failed",
                    "code": "DELIVERY_FAILED",
                });
                (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
            }
        }
    }
}
