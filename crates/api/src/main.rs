use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orbital_api::config::{LogFormat, RelayConfig};
use orbital_api::router::build_app_router;
use orbital_api::state::AppState;
use orbital_core::RoutingTable;
use orbital_delivery::DeliveryClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = RelayConfig::from_env().context("Invalid relay configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = config.port, "Loaded relay configuration");

    // --- Control plane ---
    let transport = config
        .control_plane
        .clone()
        .into_transport()
        .context("Failed to set up control plane transport")?;
    tracing::info!(transport = %transport.describe(), "Control plane transport ready");

    let delivery = DeliveryClient::new(transport, config.delivery.clone())
        .context("Invalid control plane endpoint")?;
    tracing::info!(
        endpoint = %delivery.endpoint(),
        timeout_secs = delivery.timeout().as_secs(),
        "Delivery client created"
    );

    // --- Routing table ---
    let routing = RoutingTable::builtin().context("Invalid relay routing table")?;
    tracing::info!(
        sources = routing.sources().len(),
        endpoints = routing.len(),
        "Routing table built"
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        routing: Arc::new(routing),
        delivery: Arc::new(delivery),
    };

    let app = build_app_router(state);

    // --- Start server ---
    let host = config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address {:?}", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting relay server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "orbital_api=debug,orbital_delivery=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). If a handler cannot
/// be installed, that branch never completes and the other still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
