//! Wire messages exchanged with clients over the WebSocket transport.
//!
//! All frames are UTF-8 JSON text. Inbound shapes:
//!
//! ```json
//! {"deviceId": "p1-gate-main", "action": "toggle"}
//! {"deviceId": "p1-sensor-temp-1", "action": "set", "value": 21.5}
//! {"type": "getDevices", "propertyId": "p1"}
//! {"type": "ping"}
//! ```
//!
//! Outbound shapes:
//!
//! ```json
//! {"type": "devices", "devices": [...]}
//! {"type": "deviceUpdate", "deviceId": "...", "status": "open", "value": true}
//! {"type": "error", "message": "..."}
//! {"type": "pong"}
//! ```

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceValue};
use crate::error::HomelinkError;

/// Client → server message.
///
/// Control commands carry no `type` tag — they are recognized by the
/// presence of `deviceId` and `action`, and are tried before the tagged
/// request shapes, matching the protocol's dispatch order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    Command(DeviceCommand),
    Request(ClientRequest),
}

impl ClientMessage {
    /// Parse one raw text frame.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::MalformedMessage`] when the frame is not
    /// valid JSON or matches none of the known shapes.
    pub fn parse(raw: &str) -> Result<Self, HomelinkError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A control command: mutate one device and fan the result out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCommand {
    pub device_id: String,
    pub action: CommandAction,
    #[serde(default)]
    pub value: Option<DeviceValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    /// Flip the current value, or apply the explicit `value` when provided.
    Toggle,
    /// Apply the message's `value` verbatim.
    Set,
}

/// Tagged request shapes; replies go to the sender only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientRequest {
    #[serde(rename_all = "camelCase")]
    GetDevices { property_id: String },
    Ping,
}

/// Server → client message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full point-in-time device snapshot, sent to one connection.
    Devices { devices: Vec<Device> },
    /// State change notification, broadcast to every connection.
    #[serde(rename_all = "camelCase")]
    DeviceUpdate {
        device_id: String,
        status: String,
        value: Option<DeviceValue>,
    },
    /// Error reply, sent to the originating connection only.
    Error { message: String },
    /// Keepalive acknowledgment.
    Pong,
}

impl ServerMessage {
    /// Update event describing a device's current state.
    #[must_use]
    pub fn update_for(device: &Device) -> Self {
        Self::DeviceUpdate {
            device_id: device.id.clone(),
            status: device.status.clone(),
            value: device.value,
        }
    }

    /// Error event carrying the client-facing text of `err`.
    #[must_use]
    pub fn error_for(err: &HomelinkError) -> Self {
        Self::Error {
            message: err.client_message(),
        }
    }
}
