//! HTTP/1.1 over a Unix domain socket.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HOST;
use http::{HeaderValue, Request, Response, Uri};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;

use crate::error::TransportError;
use crate::transport::Transport;

/// Sends each request over a fresh connection to a local socket.
///
/// The authority of the request URI is only used for the `Host` header; the
/// socket path alone decides where bytes go. Connections are not pooled.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    socket_path: PathBuf,
}

impl UnixSocketTransport {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

#[async_trait]
impl Transport for UnixSocketTransport {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let request = into_origin_form(request)?;

        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| TransportError::Connect {
                target: self.describe(),
                source,
            })?;

        let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await?;

        // The connection task ends once `sender` is dropped, which also
        // happens when this future is cancelled mid-flight.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "Control plane connection closed with error");
            }
        });

        let response = sender.send_request(request.map(Full::new)).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        Ok(Response::from_parts(parts, body))
    }

    fn describe(&self) -> String {
        format!("unix:{}", self.socket_path.display())
    }
}

/// Rewrite an absolute-form request into origin-form plus a `Host` header.
fn into_origin_form(request: Request<Bytes>) -> Result<Request<Bytes>, TransportError> {
    let (mut parts, body) = request.into_parts();

    if let Some(authority) = parts.uri.authority() {
        if !parts.headers.contains_key(HOST) {
            let host = HeaderValue::from_str(authority.as_str()).map_err(http::Error::from)?;
            parts.headers.insert(HOST, host);
        }
    }

    let origin = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let origin = Uri::try_from(origin).map_err(http::Error::from)?;
    parts.uri = origin;

    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn origin_form_moves_authority_into_host_header() {
        let request = Request::post("http://orbital-relay/orbital-relay?trace=1")
            .body(Bytes::new())
            .unwrap();

        let request = into_origin_form(request).unwrap();

        assert_eq!(request.uri(), "/orbital-relay?trace=1");
        assert_eq!(request.headers()[HOST], "orbital-relay");
    }

    #[test]
    fn explicit_host_header_is_kept() {
        let request = Request::post("http://orbital-relay/orbital-relay")
            .header(HOST, "control-plane.local")
            .body(Bytes::new())
            .unwrap();

        let request = into_origin_form(request).unwrap();

        assert_eq!(request.headers()[HOST], "control-plane.local");
    }

    #[tokio::test]
    async fn missing_socket_is_a_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let transport = UnixSocketTransport::new(dir.path().join("absent.sock"));
        let request = Request::post("http://orbital-relay/orbital-relay")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let err = transport.send(request).await.unwrap_err();

        assert_matches!(err, TransportError::Connect { target, .. } if target.ends_with("absent.sock"));
    }
}
