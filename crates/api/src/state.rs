use std::sync::Arc;

use orbital_core::RoutingTable;
use orbital_delivery::DeliveryClient;

use crate::config::RelayConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    /// The relay's endpoint declarations, validated for uniqueness.
    pub routing: Arc<RoutingTable>,
    /// The single process-wide handle to the control plane.
    pub delivery: Arc<DeliveryClient>,
}
