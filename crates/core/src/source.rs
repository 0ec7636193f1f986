//! Endpoint declarations for each event-emitting subsystem.
//!
//! Each [`EventSource`] is plain static data: the public paths a subsystem
//! posts to and the canonical event identity each path maps onto. Adding a
//! subsystem means declaring another static and listing it in
//! [`BUILTIN_SOURCES`]; no handler code changes.

use std::collections::HashMap;
use std::fmt;

use crate::error::CoreError;

/// HTTP method an endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointMethod {
    Post,
    Put,
}

impl EndpointMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for EndpointMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One public endpoint and the canonical event it is relayed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEndpoint {
    pub path: &'static str,
    pub method: EndpointMethod,
    /// Canonical event name sent to the control plane.
    pub event: &'static str,
    /// Schema version sent alongside the event name.
    pub version: &'static str,
}

/// A subsystem and the endpoints it exposes.
#[derive(Debug)]
pub struct EventSource {
    pub name: &'static str,
    pub endpoints: &'static [EventEndpoint],
}

pub static ETCD: EventSource = EventSource {
    name: "etcd",
    endpoints: &[EventEndpoint {
        path: "/etcd/v1/failover",
        method: EndpointMethod::Post,
        event: "datacore.etcd.failover",
        version: "v1",
    }],
};

pub static DATACORE: EventSource = EventSource {
    name: "datacore",
    endpoints: &[EventEndpoint {
        path: "/datacore/v1/event",
        method: EndpointMethod::Post,
        event: "datacore.cluster.event",
        version: "v1",
    }],
};

pub static DOCKFS: EventSource = EventSource {
    name: "dockfs",
    endpoints: &[
        EventEndpoint {
            path: "/dockfs/v1/failover",
            method: EndpointMethod::Post,
            event: "dockfs.failover",
            version: "v1",
        },
        EventEndpoint {
            path: "/dockfs/v1/reconcile",
            method: EndpointMethod::Post,
            event: "dockfs.reconcile",
            version: "v1",
        },
    ],
};

/// Every subsystem the relay serves out of the box.
pub static BUILTIN_SOURCES: &[&EventSource] = &[&ETCD, &DATACORE, &DOCKFS];

// ---------------------------------------------------------------------------
// RoutingTable
// ---------------------------------------------------------------------------

/// The aggregated, validated set of endpoints served by the relay.
///
/// Built once at startup and read-only afterwards. Construction guarantees
/// that every (method, path) pair is unique across all sources.
type Slot = (&'static EventSource, &'static EventEndpoint);

#[derive(Debug)]
pub struct RoutingTable {
    sources: Vec<&'static EventSource>,
    /// path -> method -> declaring source and endpoint.
    index: HashMap<&'static str, HashMap<EndpointMethod, Slot>>,
    len: usize,
}

impl RoutingTable {
    /// Aggregate the given sources, rejecting malformed or colliding endpoints.
    pub fn build(sources: &[&'static EventSource]) -> Result<Self, CoreError> {
        let mut index: HashMap<&'static str, HashMap<EndpointMethod, Slot>> = HashMap::new();
        let mut len = 0;

        for &source in sources {
            for endpoint in source.endpoints {
                if !endpoint.path.starts_with('/') {
                    return Err(CoreError::InvalidEndpoint {
                        source_name: source.name,
                        path: endpoint.path,
                        reason: "path must start with '/'",
                    });
                }
                if endpoint.event.is_empty() || endpoint.version.is_empty() {
                    return Err(CoreError::InvalidEndpoint {
                        source_name: source.name,
                        path: endpoint.path,
                        reason: "event name and version must not be empty",
                    });
                }

                let by_method = index.entry(endpoint.path).or_default();
                if let Some(&(existing, _)) = by_method.get(&endpoint.method) {
                    return Err(CoreError::DuplicateEndpoint {
                        method: endpoint.method,
                        path: endpoint.path,
                        first: existing.name,
                        second: source.name,
                    });
                }
                by_method.insert(endpoint.method, (source, endpoint));
                len += 1;
            }
        }

        Ok(Self {
            sources: sources.to_vec(),
            index,
            len,
        })
    }

    /// Routing table for [`BUILTIN_SOURCES`].
    pub fn builtin() -> Result<Self, CoreError> {
        Self::build(BUILTIN_SOURCES)
    }

    pub fn sources(&self) -> &[&'static EventSource] {
        &self.sources
    }

    /// All endpoints in declaration order, paired with their source.
    pub fn endpoints(
        &self,
    ) -> impl Iterator<Item = (&'static EventSource, &'static EventEndpoint)> + '_ {
        self.sources
            .iter()
            .flat_map(|&source| source.endpoints.iter().map(move |endpoint| (source, endpoint)))
    }

    pub fn lookup(&self, method: EndpointMethod, path: &str) -> Option<&'static EventEndpoint> {
        self.index
            .get(path)
            .and_then(|by_method| by_method.get(&method))
            .map(|&(_, endpoint)| endpoint)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
