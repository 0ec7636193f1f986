use crate::source::EndpointMethod;

/// Errors raised while assembling the relay's static routing table.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Duplicate endpoint: {method} {path} is declared by both {first} and {second}")]
    DuplicateEndpoint {
        method: EndpointMethod,
        path: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("Invalid endpoint {path} in source {source_name}: {reason}")]
    InvalidEndpoint {
        source_name: &'static str,
        path: &'static str,
        reason: &'static str,
    },
}

/// Rejection of an inbound event body.
///
/// Every variant is a client error and is never retried.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body is missing")]
    Missing,

    #[error("Request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Request body is an empty object")]
    Empty,
}
