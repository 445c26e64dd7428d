//! `DeviceHub` — connection registry, fanout broadcaster, and session
//! dispatch.
//!
//! The hub owns the canonical [`DeviceRegistry`] behind a lock and a map of
//! per-connection outbound channels. Each command is processed fully (lookup,
//! mutation, status re-derivation) under one write-lock acquisition before
//! its broadcast, so a device's `value`/`status` pair is never observed torn
//! and two commands on one device apply last-writer-wins in lock order.
//!
//! Outbound delivery is decoupled through unbounded channels: a slow or
//! closed client never blocks the broadcaster. Frames are serialized once
//! per broadcast, not once per connection.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};

use homelink_domain::device::{Device, DeviceUpdate, DeviceValue};
use homelink_domain::error::HomelinkError;
use homelink_domain::id::ConnectionId;
use homelink_domain::protocol::{
    ClientMessage, ClientRequest, CommandAction, DeviceCommand, ServerMessage,
};
use homelink_domain::registry::DeviceRegistry;

/// Pre-serialized outbound frame delivered to a connection's pump task.
pub type OutboundFrame = String;

/// Shared hub; one instance per process, shared by every transport task and
/// the perturbation loop.
pub struct DeviceHub {
    registry: RwLock<DeviceRegistry>,
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<OutboundFrame>>>,
}

impl DeviceHub {
    /// Create a hub owning the given registry.
    #[must_use]
    pub fn new(registry: DeviceRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the connection id and the receiver end of its outbound
    /// channel; the transport pumps frames from the receiver into the
    /// socket. Dropping the receiver is equivalent to closing the transport.
    pub async fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<OutboundFrame>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(id, tx);
        tracing::debug!(connection = %id, "registered connection");
        (id, rx)
    }

    /// Remove a connection from the live set. Safe to call more than once.
    pub async fn unregister(&self, id: ConnectionId) {
        if self.connections.write().await.remove(&id).is_some() {
            tracing::debug!(connection = %id, "unregistered connection");
        }
    }

    /// Number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Full device snapshot, optionally scoped to one property.
    pub async fn snapshot(&self, property_id: Option<&str>) -> ServerMessage {
        let registry = self.registry.read().await;
        let devices = match property_id {
            Some(property_id) => registry.list_by_property(property_id),
            None => registry.all(),
        };
        ServerMessage::Devices {
            devices: devices.into_iter().cloned().collect(),
        }
    }

    /// Push the initial device snapshot to a freshly connected client.
    pub async fn send_initial_devices(&self, id: ConnectionId, property_id: Option<&str>) {
        let snapshot = self.snapshot(property_id).await;
        self.send_to(id, &snapshot).await;
    }

    /// Cloned device records for one property. Used by the REST adapter.
    pub async fn devices_for_property(&self, property_id: &str) -> Vec<Device> {
        let registry = self.registry.read().await;
        registry
            .list_by_property(property_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Cloned records of every sensor device. Used by the perturbation loop.
    pub async fn sensor_snapshot(&self) -> Vec<Device> {
        let registry = self.registry.read().await;
        registry
            .sensor_ids()
            .iter()
            .filter_map(|id| registry.get(id).cloned())
            .collect()
    }

    /// Apply a new value to one device and broadcast the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::DeviceNotFound`] when the id is unknown;
    /// nothing is broadcast in that case.
    pub async fn apply_and_broadcast(
        &self,
        device_id: &str,
        value: DeviceValue,
    ) -> Result<(), HomelinkError> {
        let update = {
            let mut registry = self.registry.write().await;
            let device = registry.apply_update(device_id, DeviceUpdate::value(value))?;
            ServerMessage::update_for(device)
        };
        self.broadcast(&update).await;
        Ok(())
    }

    /// Dispatch one inbound text frame from a connection.
    ///
    /// Only a successful control command triggers a broadcast; every other
    /// message produces at most a reply to its own sender. Errors are fully
    /// contained to the triggering message.
    pub async fn handle_message(&self, id: ConnectionId, raw: &str) {
        match ClientMessage::parse(raw) {
            Ok(ClientMessage::Command(command)) => self.handle_command(id, command).await,
            Ok(ClientMessage::Request(ClientRequest::GetDevices { property_id })) => {
                let snapshot = self.snapshot(Some(&property_id)).await;
                self.send_to(id, &snapshot).await;
            }
            Ok(ClientMessage::Request(ClientRequest::Ping)) => {
                self.send_to(id, &ServerMessage::Pong).await;
            }
            Err(err) => {
                tracing::warn!(connection = %id, %err, "rejected client message");
                self.send_to(id, &ServerMessage::error_for(&err)).await;
            }
        }
    }

    async fn handle_command(&self, id: ConnectionId, command: DeviceCommand) {
        let outcome = {
            let mut registry = self.registry.write().await;
            match registry.get(&command.device_id).map(Device::is_truthy) {
                None => Err(HomelinkError::DeviceNotFound {
                    id: command.device_id.clone(),
                }),
                Some(currently_truthy) => {
                    let value = match command.action {
                        CommandAction::Toggle => command
                            .value
                            .or(Some(DeviceValue::Bool(!currently_truthy))),
                        CommandAction::Set => command.value,
                    };
                    registry
                        .apply_update(
                            &command.device_id,
                            DeviceUpdate {
                                value,
                                status: None,
                            },
                        )
                        .map(ServerMessage::update_for)
                }
            }
        };

        match outcome {
            Ok(update) => {
                if let ServerMessage::DeviceUpdate { status, .. } = &update {
                    tracing::info!(device = %command.device_id, status = %status, "device updated");
                }
                self.broadcast(&update).await;
            }
            Err(err) => {
                tracing::warn!(connection = %id, device = %command.device_id, %err, "command rejected");
                self.send_to(id, &ServerMessage::error_for(&err)).await;
            }
        }
    }

    /// Deliver a message to every registered connection.
    ///
    /// The frame is serialized once. Connections whose pump task is gone are
    /// skipped silently; a failed delivery never aborts the rest.
    pub async fn broadcast(&self, message: &ServerMessage) {
        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize broadcast frame");
                return;
            }
        };

        let connections = self.connections.read().await;
        for (id, tx) in connections.iter() {
            if tx.send(frame.clone()).is_err() {
                tracing::debug!(connection = %id, "skipped closed connection during broadcast");
            }
        }
    }

    /// Deliver a message to a single connection, with the same closed-
    /// connection guard as [`broadcast`](Self::broadcast).
    pub async fn send_to(&self, id: ConnectionId, message: &ServerMessage) {
        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize outbound frame");
                return;
            }
        };

        let connections = self.connections.read().await;
        match connections.get(&id) {
            Some(tx) => {
                if tx.send(frame).is_err() {
                    tracing::debug!(connection = %id, "skipped send to closed connection");
                }
            }
            None => {
                tracing::debug!(connection = %id, "skipped send to unregistered connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homelink_domain::property::Property;

    fn property(id: &str) -> Property {
        Property {
            id: id.to_string(),
            name: format!("Property {id}"),
            location: None,
        }
    }

    fn hub() -> DeviceHub {
        DeviceHub::new(DeviceRegistry::from_properties(&[property("p1")]))
    }

    fn parse(frame: &str) -> serde_json::Value {
        serde_json::from_str(frame).unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> Vec<serde_json::Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(parse(&frame));
        }
        frames
    }

    #[tokio::test]
    async fn should_send_full_snapshot_on_connect() {
        let hub = hub();
        let (id, mut rx) = hub.register().await;

        hub.send_initial_devices(id, None).await;

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "devices");
        assert_eq!(frames[0]["devices"].as_array().unwrap().len(), 13);
    }

    #[tokio::test]
    async fn should_scope_snapshot_to_requested_property() {
        let hub = DeviceHub::new(DeviceRegistry::from_properties(&[
            property("p1"),
            property("p2"),
        ]));
        let (id, mut rx) = hub.register().await;

        hub.send_initial_devices(id, Some("p2")).await;

        let frames = drain(&mut rx);
        let devices = frames[0]["devices"].as_array().unwrap();
        assert_eq!(devices.len(), 13);
        assert!(
            devices
                .iter()
                .all(|d| d["propertyId"] == "p2")
        );
    }

    #[tokio::test]
    async fn should_broadcast_toggle_to_all_connections_including_sender() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (_viewer, mut viewer_rx) = hub.register().await;

        hub.handle_message(sender, r#"{"deviceId": "p1-gate-main", "action": "toggle"}"#)
            .await;

        for rx in [&mut sender_rx, &mut viewer_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(
                frames[0],
                serde_json::json!({
                    "type": "deviceUpdate",
                    "deviceId": "p1-gate-main",
                    "status": "open",
                    "value": true,
                })
            );
        }
    }

    #[tokio::test]
    async fn should_not_deliver_to_unregistered_connection() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (gone, mut gone_rx) = hub.register().await;
        hub.unregister(gone).await;

        hub.handle_message(sender, r#"{"deviceId": "p1-gate-main", "action": "toggle"}"#)
            .await;

        assert_eq!(drain(&mut sender_rx).len(), 1);
        assert!(drain(&mut gone_rx).is_empty());
    }

    #[tokio::test]
    async fn should_flip_value_exactly_once_per_toggle() {
        let hub = hub();
        let (id, mut rx) = hub.register().await;

        hub.handle_message(id, r#"{"deviceId": "p1-kitchen-light-1", "action": "toggle"}"#)
            .await;
        hub.handle_message(id, r#"{"deviceId": "p1-kitchen-light-1", "action": "toggle"}"#)
            .await;

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["value"], true);
        assert_eq!(frames[0]["status"], "on");
        assert_eq!(frames[1]["value"], false);
        assert_eq!(frames[1]["status"], "off");
    }

    #[tokio::test]
    async fn should_prefer_explicit_value_over_negation_on_toggle() {
        let hub = hub();
        let (id, mut rx) = hub.register().await;

        hub.handle_message(
            id,
            r#"{"deviceId": "p1-kitchen-light-1", "action": "toggle", "value": false}"#,
        )
        .await;

        let frames = drain(&mut rx);
        assert_eq!(frames[0]["value"], false);
        assert_eq!(frames[0]["status"], "off");
    }

    #[tokio::test]
    async fn should_set_value_verbatim() {
        let hub = hub();
        let (id, mut rx) = hub.register().await;

        hub.handle_message(
            id,
            r#"{"deviceId": "p1-sensor-temp-1", "action": "set", "value": 5}"#,
        )
        .await;

        let frames = drain(&mut rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["value"], 5.0);
        assert_eq!(frames[0]["status"], "active");
    }

    #[tokio::test]
    async fn should_reply_error_to_sender_only_when_device_unknown() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (_viewer, mut viewer_rx) = hub.register().await;

        hub.handle_message(sender, r#"{"deviceId": "does-not-exist", "action": "toggle"}"#)
            .await;

        let frames = drain(&mut sender_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "error");
        assert_eq!(frames[0]["message"], "Device does-not-exist not found");
        assert!(drain(&mut viewer_rx).is_empty());
    }

    #[tokio::test]
    async fn should_reply_scoped_snapshot_to_sender_only() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (_viewer, mut viewer_rx) = hub.register().await;

        hub.handle_message(sender, r#"{"type": "getDevices", "propertyId": "p1"}"#)
            .await;

        let frames = drain(&mut sender_rx);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "devices");
        assert!(drain(&mut viewer_rx).is_empty());
    }

    #[tokio::test]
    async fn should_reply_pong_to_ping() {
        let hub = hub();
        let (id, mut rx) = hub.register().await;

        hub.handle_message(id, r#"{"type": "ping"}"#).await;

        let frames = drain(&mut rx);
        assert_eq!(frames, vec![serde_json::json!({"type": "pong"})]);
    }

    #[tokio::test]
    async fn should_reply_error_for_malformed_payload() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (_viewer, mut viewer_rx) = hub.register().await;

        hub.handle_message(sender, "{not json").await;
        hub.handle_message(sender, r#"{"type": "selfDestruct"}"#).await;

        let frames = drain(&mut sender_rx);
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f["type"] == "error"));
        assert!(frames.iter().all(|f| f["message"] == "Invalid message format"));
        assert!(drain(&mut viewer_rx).is_empty());
    }

    #[tokio::test]
    async fn should_survive_broadcast_to_dropped_receiver() {
        let hub = hub();
        let (sender, mut sender_rx) = hub.register().await;
        let (_dead, dead_rx) = hub.register().await;
        drop(dead_rx);

        hub.handle_message(sender, r#"{"deviceId": "p1-gate-main", "action": "toggle"}"#)
            .await;

        // the live connection still gets the update
        assert_eq!(drain(&mut sender_rx).len(), 1);
    }

    #[tokio::test]
    async fn should_tolerate_repeated_unregister() {
        let hub = hub();
        let (id, _rx) = hub.register().await;

        hub.unregister(id).await;
        hub.unregister(id).await;

        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn should_run_gate_toggle_scenario_end_to_end() {
        let hub = hub();
        let (viewer_a, mut rx_a) = hub.register().await;
        let (_viewer_b, mut rx_b) = hub.register().await;

        hub.send_initial_devices(viewer_a, Some("p1")).await;
        let snapshot = drain(&mut rx_a);
        let gate = snapshot[0]["devices"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["id"] == "p1-gate-main")
            .unwrap()
            .clone();
        assert_eq!(gate["type"], "door");
        assert_eq!(gate["status"], "closed");
        assert_eq!(gate["value"], false);

        hub.handle_message(viewer_a, r#"{"deviceId": "p1-gate-main", "action": "toggle"}"#)
            .await;

        let expected = serde_json::json!({
            "type": "deviceUpdate",
            "deviceId": "p1-gate-main",
            "status": "open",
            "value": true,
        });
        assert_eq!(drain(&mut rx_a), vec![expected.clone()]);
        assert_eq!(drain(&mut rx_b), vec![expected]);
    }
}
