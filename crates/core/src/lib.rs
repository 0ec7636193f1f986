//! Domain types for the Orbital relay.
//!
//! Everything in this crate is pure data and validation: the endpoint
//! declarations each subsystem exposes, the routing table built from them,
//! the inbound payload check and the outbound envelope. No I/O happens here.

pub mod envelope;
pub mod error;
pub mod source;
pub mod validation;

pub use envelope::EventEnvelope;
pub use error::{CoreError, ValidationError};
pub use source::{EndpointMethod, EventEndpoint, EventSource, RoutingTable};
pub use validation::validate_payload;
