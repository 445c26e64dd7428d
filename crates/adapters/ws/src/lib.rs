//! # homelink-adapter-ws
//!
//! WebSocket transport for the device simulator. Exposes a single upgrade
//! route; each accepted socket becomes one session pumping frames between
//! the client and the [`DeviceHub`].
//!
//! Clients may scope their initial snapshot to one property by connecting
//! with `?propertyId=<id>`.
//!
//! ## Dependency rule
//! Depends on `homelink-app` (the hub) and `homelink-domain` only.

mod session;

use std::sync::Arc;

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::any;
use serde::Deserialize;

use homelink_app::hub::DeviceHub;

/// Connect-time query parameters.
#[derive(Debug, Default, Deserialize)]
struct ConnectParams {
    #[serde(rename = "propertyId")]
    property_id: Option<String>,
}

/// Build the WebSocket [`Router`].
pub fn router(hub: Arc<DeviceHub>) -> Router {
    Router::new().route("/", any(upgrade)).with_state(hub)
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(hub): State<Arc<DeviceHub>>,
    Query(params): Query<ConnectParams>,
) -> Response {
    ws.on_upgrade(move |socket| session::run(socket, hub, params.property_id))
}
