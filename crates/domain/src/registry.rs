//! Canonical in-memory collection of device records.
//!
//! The registry is pure data plus mutation functions — no IO, no
//! broadcasting. Callers notify connected clients after a successful
//! mutation; the registry only guarantees the status/value invariant.

use std::collections::HashMap;

use crate::device::{Device, DeviceKind, DeviceUpdate, DeviceValue};
use crate::error::HomelinkError;
use crate::property::Property;

/// Owns every simulated device, keyed by id.
///
/// Devices are created in bulk per property at initialization and never
/// individually added or removed afterwards; only `value`/`status` mutate.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Device>,
}

impl DeviceRegistry {
    /// Build a registry populated for the given properties.
    #[must_use]
    pub fn from_properties(properties: &[Property]) -> Self {
        let mut registry = Self::default();
        registry.initialize(properties);
        registry
    }

    /// (Re)build the full collection: the same fixed room/type layout for
    /// every property, ids prefixed with the property id. Replaces any prior
    /// collection entirely, so re-initialization is idempotent.
    pub fn initialize(&mut self, properties: &[Property]) {
        self.devices.clear();
        for property in properties {
            for device in generate_devices(&property.id) {
                self.devices.insert(device.id.clone(), device);
            }
        }
    }

    /// Look up one device by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.get(id)
    }

    /// Number of devices in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// All devices, in stable (id) order.
    #[must_use]
    pub fn all(&self) -> Vec<&Device> {
        let mut devices: Vec<&Device> = self.devices.values().collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        devices
    }

    /// Devices owned by one property, in stable (id) order.
    #[must_use]
    pub fn list_by_property(&self, property_id: &str) -> Vec<&Device> {
        let mut devices: Vec<&Device> = self
            .devices
            .values()
            .filter(|device| device.property_id == property_id)
            .collect();
        devices.sort_by(|a, b| a.id.cmp(&b.id));
        devices
    }

    /// Ids of all sensor devices, in stable order. Used by the perturbation
    /// loop to walk the fleet without borrowing the records.
    #[must_use]
    pub fn sensor_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .devices
            .values()
            .filter(|device| device.kind == DeviceKind::Sensor)
            .map(|device| device.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Merge an update into the device with the given id, re-deriving
    /// `status` from `value` for switches and doors in the same mutation —
    /// the pair can never be observed out of sync.
    ///
    /// # Errors
    ///
    /// Returns [`HomelinkError::DeviceNotFound`] when the id is unknown; no
    /// mutation is performed in that case.
    pub fn apply_update(
        &mut self,
        id: &str,
        update: DeviceUpdate,
    ) -> Result<&Device, HomelinkError> {
        let device = self
            .devices
            .get_mut(id)
            .ok_or_else(|| HomelinkError::DeviceNotFound { id: id.to_string() })?;

        device.value = update.value;
        if let Some(status) = update.status {
            device.status = status;
        }
        device.sync_status();
        Ok(device)
    }
}

/// The fixed per-property device layout. Only the id prefix differs between
/// properties, so initialization is fully deterministic.
fn generate_devices(property_id: &str) -> Vec<Device> {
    let door = |suffix: &str, name: &str, room: &str| Device {
        id: format!("{property_id}-{suffix}"),
        name: name.to_string(),
        kind: DeviceKind::Door,
        status: "closed".to_string(),
        value: Some(DeviceValue::Bool(false)),
        unit: None,
        room: Some(room.to_string()),
        property_id: property_id.to_string(),
    };
    let switch = |suffix: &str, name: &str, room: &str| Device {
        id: format!("{property_id}-{suffix}"),
        name: name.to_string(),
        kind: DeviceKind::Switch,
        status: "off".to_string(),
        value: Some(DeviceValue::Bool(false)),
        unit: None,
        room: Some(room.to_string()),
        property_id: property_id.to_string(),
    };
    let sensor = |suffix: &str, name: &str, room: &str, value: DeviceValue, unit: Option<&str>| {
        Device {
            id: format!("{property_id}-{suffix}"),
            name: name.to_string(),
            kind: DeviceKind::Sensor,
            status: "active".to_string(),
            value: Some(value),
            unit: unit.map(str::to_string),
            room: Some(room.to_string()),
            property_id: property_id.to_string(),
        }
    };

    vec![
        door("gate-main", "Main Gate", "Gate"),
        switch("gate-light-1", "Gate Light", "Gate"),
        sensor(
            "gate-sensor-1",
            "Gate Motion Sensor",
            "Gate",
            DeviceValue::Bool(false),
            None,
        ),
        switch("garage-light-1", "Garage Light", "Garage"),
        door("garage-door-main", "Garage Door", "Garage"),
        switch("living-lamp-1", "Living Room Main Light", "Living Room"),
        switch("living-fan-1", "Living Room Ceiling Fan", "Living Room"),
        switch("bedroom-lamp-1", "Bedroom Light", "Bedroom"),
        switch("bedroom-fan-1", "Bedroom Fan", "Bedroom"),
        switch("kitchen-light-1", "Kitchen Light", "Kitchen"),
        switch("outdoor-light-1", "Outdoor Light", "Outdoor"),
        sensor(
            "sensor-temp-1",
            "Temperature Sensor",
            "Outdoor",
            DeviceValue::Number(22.0),
            Some("\u{b0}C"),
        ),
        sensor(
            "sensor-humidity-1",
            "Humidity Sensor",
            "Outdoor",
            DeviceValue::Number(45.0),
            Some("%"),
        ),
    ]
}
