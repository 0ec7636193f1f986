//! HTTP over TCP via reqwest, for a control plane on a network address.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};

use crate::error::TransportError;
use crate::transport::Transport;

/// Sends requests to the absolute URI they carry.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    client: reqwest::Client,
}

impl TcpTransport {
    /// Build the underlying HTTP client.
    ///
    /// Timeouts are enforced by the delivery client, not here. Redirects are
    /// never followed: a 3xx is handed back as-is so one event stays one POST.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let (parts, body) = request.into_parts();

        let response = self
            .client
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut out = Response::new(body);
        *out.status_mut() = status;
        *out.headers_mut() = headers;
        Ok(out)
    }

    fn describe(&self) -> String {
        "tcp".to_string()
    }
}
