//! Per-connection session: registration, initial snapshot, and the frame
//! pump between the socket and the hub.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};

use homelink_app::hub::DeviceHub;

/// Drive one client session until the socket closes or errors.
///
/// The session registers with the hub, pushes the initial device snapshot
/// (scoped to `property_id` when given), then pumps: outbound frames from
/// the hub go to the socket, inbound text frames go to the hub's dispatch.
/// On any exit path the connection is unregistered, so no further sends are
/// attempted toward a closed transport.
pub(crate) async fn run(mut socket: WebSocket, hub: Arc<DeviceHub>, property_id: Option<String>) {
    let (id, mut outbound) = hub.register().await;
    let total = hub.connection_count().await;
    tracing::info!(
        connection = %id,
        total,
        "client connected"
    );

    hub.send_initial_devices(id, property_id.as_deref()).await;

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(frame) = frame else { break };
                if let Err(err) = socket.send(Message::Text(frame.into())).await {
                    tracing::debug!(connection = %id, %err, "write failed, closing session");
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => hub.handle_message(id, text.as_str()).await,
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!(connection = %id, "ignoring binary frame");
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(connection = %id, %err, "socket error, closing session");
                        break;
                    }
                }
            }
        }
    }

    hub.unregister(id).await;
    let remaining = hub.connection_count().await;
    tracing::info!(
        connection = %id,
        remaining,
        "client disconnected"
    );
}
