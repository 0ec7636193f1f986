//! Route definitions for the relayed event endpoints.
//!
//! ```text
//! POST /etcd/v1/failover      -> datacore.etcd.failover  v1
//! POST /datacore/v1/event     -> datacore.cluster.event  v1
//! POST /dockfs/v1/failover    -> dockfs.failover         v1
//! POST /dockfs/v1/reconcile   -> dockfs.reconcile        v1
//! ```
//!
//! The table itself lives in `orbital_core::source`; this module only turns
//! it into axum routes. A registered path hit with another method answers
//! 405, an unknown path 404.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use orbital_core::{EndpointMethod, RoutingTable};
use orbital_delivery::DeliveryClient;

use crate::adapter::EventSourceAdapter;
use crate::state::AppState;

/// Register every endpoint in `table`, each backed by its source's adapter.
pub fn router(table: &RoutingTable, delivery: Arc<DeliveryClient>) -> Router<AppState> {
    // Endpoints sharing a path must share one method router.
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();

    for &source in table.sources() {
        let adapter = Arc::new(EventSourceAdapter::new(source, Arc::clone(&delivery)));

        for endpoint in source.endpoints {
            let adapter = Arc::clone(&adapter);
            let handler = move |body: Bytes| {
                let adapter = Arc::clone(&adapter);
                async move { adapter.handle(endpoint, body).await }
            };

            let methods = by_path
                .remove(endpoint.path)
                .unwrap_or_else(MethodRouter::new);
            by_path.insert(endpoint.path, methods.on(method_filter(endpoint.method), handler));

            tracing::debug!(
                source = source.name,
                method = %endpoint.method,
                path = endpoint.path,
                event = endpoint.event,
                version = endpoint.version,
                "Registered relay endpoint"
            );
        }
    }

    by_path
        .into_iter()
        .fold(Router::new(), |router, (path, methods)| router.route(path, methods))
}

fn method_filter(method: EndpointMethod) -> MethodFilter {
    match method {
        EndpointMethod::Post => MethodFilter::POST,
        EndpointMethod::Put => MethodFilter::PUT,
    }
}
