//! Outbound delivery of relayed events to the control plane.
//!
//! [`DeliveryClient`] wraps each event in an [`orbital_core::EventEnvelope`]
//! and performs exactly one POST per call through a pluggable [`Transport`].
//! The production transport speaks HTTP/1.1 over a Unix domain socket;
//! [`TcpTransport`] covers a control plane reachable over loopback TCP.

pub mod client;
pub mod error;
pub mod tcp;
pub mod transport;
pub mod unix;

pub use client::{DeliveryClient, DeliveryConfig};
pub use error::{RelayError, TransportError};
pub use tcp::TcpTransport;
pub use transport::{ControlPlaneTarget, Transport};
pub use unix::UnixSocketTransport;
