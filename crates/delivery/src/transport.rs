use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};

use crate::error::TransportError;
use crate::tcp::TcpTransport;
use crate::unix::UnixSocketTransport;

/// Anything that can perform one HTTP exchange over a given channel.
///
/// Requests carry an absolute URI; the transport decides how that URI maps
/// onto its channel. Implementations must not retry: one call is one
/// exchange. Dropping the returned future must release the connection.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;

    /// Human-readable description of the channel, for logs.
    fn describe(&self) -> String;
}

/// Where the control plane is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlPlaneTarget {
    /// HTTP over a Unix domain socket at this path.
    UnixSocket(PathBuf),
    /// HTTP over TCP to the host in the delivery base URL.
    Tcp,
}

impl ControlPlaneTarget {
    /// Build the single long-lived transport shared by every delivery.
    pub fn into_transport(self) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(match self {
            Self::UnixSocket(path) => Arc::new(UnixSocketTransport::new(path)),
            Self::Tcp => Arc::new(TcpTransport::new()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_target_describes_socket_path() {
        let transport = ControlPlaneTarget::UnixSocket(PathBuf::from("/orbitlab/proxy.sock"))
            .into_transport()
            .unwrap();

        assert_eq!(transport.describe(), "unix:/orbitlab/proxy.sock");
    }

    #[test]
    fn tcp_target_builds() {
        let transport = ControlPlaneTarget::Tcp.into_transport().unwrap();

        assert_eq!(transport.describe(), "tcp");
    }
}
