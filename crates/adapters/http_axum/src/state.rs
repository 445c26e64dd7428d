//! Shared application state for axum handlers.

use std::sync::Arc;

use homelink_app::hub::DeviceHub;
use homelink_domain::property::Property;

use crate::api::auth::UserAccount;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the inner types themselves do not need
/// to be `Clone` — only the `Arc` wrappers are cloned.
pub struct ApiState {
    /// Device hub, shared with the WebSocket adapter and the simulator loop.
    pub hub: Arc<DeviceHub>,
    /// Property directory loaded at startup.
    pub properties: Arc<Vec<Property>>,
    /// Accounts accepted by the login endpoint.
    pub users: Arc<Vec<UserAccount>>,
}

impl Clone for ApiState {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
            properties: Arc::clone(&self.properties),
            users: Arc::clone(&self.users),
        }
    }
}

impl ApiState {
    /// Create a new application state.
    #[must_use]
    pub fn new(hub: Arc<DeviceHub>, properties: Vec<Property>, users: Vec<UserAccount>) -> Self {
        Self {
            hub,
            properties: Arc::new(properties),
            users: Arc::new(users),
        }
    }

    /// Look up a property by id.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.id == id)
    }
}
