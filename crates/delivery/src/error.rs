//! Error types for control-plane delivery.

use std::time::Duration;

/// Failure of the underlying channel before a complete response arrived.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The socket or TCP connection could not be opened.
    #[error("Failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP/1.1 exchange over an open connection failed.
    #[error("HTTP exchange failed: {0}")]
    Http(#[from] hyper::Error),

    /// The reqwest-backed TCP client failed (connect, send or body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The outbound request could not be constructed.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] http::Error),
}

/// A failed delivery to the control plane.
///
/// Carries the downstream status when one was received. Callers decide how
/// much of this reaches their own clients.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The control plane answered with a non-2xx status.
    #[error("Control plane returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// No response arrived within the delivery timeout.
    #[error("Control plane did not respond within {timeout:?}")]
    Timeout { timeout: Duration },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to encode event envelope: {0}")]
    Encode(#[from] serde_json::Error),

    /// The configured control-plane address is unusable.
    #[error("Invalid control plane endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

impl RelayError {
    /// Downstream HTTP status, if the control plane answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the control plane was never reached or never answered.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display_omits_body() {
        let err = RelayError::HttpStatus {
            status: 503,
            body: "backend pool exhausted on node-7".into(),
        };

        assert_eq!(err.to_string(), "Control plane returned HTTP 503");
        assert_eq!(err.status_code(), Some(503));
        assert!(!err.is_unreachable());
    }

    #[test]
    fn timeout_has_no_status() {
        let err = RelayError::Timeout {
            timeout: Duration::from_secs(10),
        };

        assert_eq!(err.to_string(), "Control plane did not respond within 10s");
        assert_eq!(err.status_code(), None);
        assert!(err.is_unreachable());
    }

    #[test]
    fn connect_error_names_target() {
        let err = RelayError::from(TransportError::Connect {
            target: "/orbitlab/proxy.sock".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });

        assert!(err.to_string().contains("/orbitlab/proxy.sock"));
        assert!(err.is_unreachable());
    }
}
