//! # homelinkd — homelink simulator daemon
//!
//! Composition root that wires the device hub, sensor simulator, and both
//! transports, and starts the servers.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Load the property directory and build the device registry
//! - Construct the shared [`DeviceHub`]
//! - Spawn the sensor perturbation loop
//! - Bind the WebSocket and HTTP listeners and serve until shutdown
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use homelink_adapter_http_axum::api::auth::demo_users;
use homelink_adapter_http_axum::state::ApiState;
use homelink_app::hub::DeviceHub;
use homelink_app::perturb::SensorSimulator;
use homelink_domain::property::{self, Property};
use homelink_domain::registry::DeviceRegistry;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let properties = load_properties(&config.properties.path)?;
    tracing::info!(count = properties.len(), "property directory loaded");

    let registry = DeviceRegistry::from_properties(&properties);
    tracing::info!(devices = registry.len(), "device registry initialized");
    let hub = Arc::new(DeviceHub::new(registry));

    let simulator = SensorSimulator::new(
        Arc::clone(&hub),
        Duration::from_millis(config.simulator.tick_interval_ms),
    );
    tokio::spawn(simulator.run());

    let ws_app = homelink_adapter_ws::router(Arc::clone(&hub));
    let http_app =
        homelink_adapter_http_axum::router::build(ApiState::new(hub, properties, demo_users()));

    let ws_listener = tokio::net::TcpListener::bind(config.ws_addr()).await?;
    tracing::info!(addr = %config.ws_addr(), "websocket server listening");
    let http_listener = tokio::net::TcpListener::bind(config.http_addr()).await?;
    tracing::info!(addr = %config.http_addr(), "http api server listening");

    tokio::select! {
        result = axum::serve(ws_listener, ws_app).into_future() => result?,
        result = axum::serve(http_listener, http_app).into_future() => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Load the property directory, falling back to the built-in demo set when
/// the file is absent. A present but malformed file is a hard error.
fn load_properties(path: &str) -> anyhow::Result<Vec<Property>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(property::parse_directory(&content)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path, "property directory not found, using demo properties");
            Ok(property::demo_properties())
        }
        Err(err) => Err(err.into()),
    }
}
