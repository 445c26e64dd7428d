//! Common error types used across the workspace.

/// Errors produced while handling a client message.
///
/// Every variant is contained to the message/connection that triggered it —
/// none of these ever crash the process or affect other connections.
#[derive(Debug, thiserror::Error)]
pub enum HomelinkError {
    /// A command referenced a device id the registry does not know.
    #[error("device {id} not found")]
    DeviceNotFound { id: String },
    /// Inbound payload was not parseable or matched no known message shape.
    #[error("invalid message format")]
    MalformedMessage(#[from] serde_json::Error),
}

impl HomelinkError {
    /// Human-readable text for the `error` event sent back to the client.
    ///
    /// This is the only error signal exposed on the wire; there is no
    /// structured error code in the protocol.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::DeviceNotFound { id } => format!("Device {id} not found"),
            Self::MalformedMessage(_) => "Invalid message format".to_string(),
        }
    }
}
