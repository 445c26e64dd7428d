//! Device — the unit of controllable/observable state in the simulator.

use serde::{Deserialize, Serialize};

/// What a device fundamentally is. Fixed at creation, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Switch,
    Door,
    Sensor,
}

impl DeviceKind {
    /// Status projection of a value, for the kinds where status is fully
    /// determined by the value.
    ///
    /// Returns `None` for sensors — they retain whatever status they were
    /// given.
    #[must_use]
    pub fn derived_status(self, value: Option<DeviceValue>) -> Option<&'static str> {
        let truthy = value.is_some_and(DeviceValue::is_truthy);
        match self {
            Self::Switch => Some(if truthy { "on" } else { "off" }),
            Self::Door => Some(if truthy { "open" } else { "closed" }),
            Self::Sensor => None,
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Door => f.write_str("door"),
            Self::Sensor => f.write_str("sensor"),
        }
    }
}

/// A device value on the wire — boolean, number, or absent (`Option`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    Bool(bool),
    Number(f64),
}

impl DeviceValue {
    /// Truthiness used by toggle-without-explicit-value and by status
    /// derivation: a number is truthy iff non-zero, an absent value is falsy.
    #[must_use]
    pub fn is_truthy(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Number(n) => n != 0.0,
        }
    }
}

impl From<bool> for DeviceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for DeviceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One simulated device record.
///
/// Invariant: for [`DeviceKind::Switch`] and [`DeviceKind::Door`], `status`
/// is always the projection of `value` (`on`/`off`, `open`/`closed`). Every
/// mutation path goes through [`sync_status`](Self::sync_status) so the pair
/// can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub status: String,
    pub value: Option<DeviceValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub property_id: String,
}

impl Device {
    /// Re-derive `status` from `value` for the kinds where status is a
    /// projection. A no-op for sensors.
    pub fn sync_status(&mut self) {
        if let Some(status) = self.kind.derived_status(self.value) {
            self.status = status.to_string();
        }
    }

    /// Truthiness of the current value (absent counts as false).
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        self.value.is_some_and(DeviceValue::is_truthy)
    }
}

/// Partial update applied to a device by the registry.
///
/// `value` always replaces the device's value (including clearing it);
/// `status` is merged only when provided, and is overridden by the derived
/// status for switches and doors — value is the source of truth.
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub value: Option<DeviceValue>,
    pub status: Option<String>,
}

impl DeviceUpdate {
    /// Update that only replaces the value.
    #[must_use]
    pub fn value(value: impl Into<DeviceValue>) -> Self {
        Self {
            value: Some(value.into()),
            status: None,
        }
    }
}
