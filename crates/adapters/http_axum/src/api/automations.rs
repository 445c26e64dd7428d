//! JSON REST handler for automations.
//!
//! Same story as cameras: a fixed mock set per property, enough for a
//! client to render routine toggles.

use axum::Json;
use axum::extract::Path;
use serde::Serialize;

/// One mock automation routine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub property_id: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    automations: Vec<Automation>,
}

/// `GET /api/properties/{id}/automations` — mock routines for one property.
pub async fn list(Path(property_id): Path<String>) -> Json<ListResponse> {
    Json(ListResponse {
        automations: automations_for(&property_id),
    })
}

fn automations_for(property_id: &str) -> Vec<Automation> {
    let automation = |slug: &str, name: &str, description: &str, active| Automation {
        id: format!("{property_id}-automation-{slug}"),
        name: name.to_string(),
        description: description.to_string(),
        active,
        property_id: property_id.to_string(),
    };
    vec![
        automation(
            "morning",
            "Morning Routine",
            "Wake up lights, temperature, and security",
            false,
        ),
        automation(
            "away",
            "Away Mode",
            "Security enabled, lights off, temperature optimized",
            false,
        ),
        automation(
            "evening",
            "Evening Routine",
            "Dimmed lights, comfortable temperature",
            true,
        ),
        automation(
            "night",
            "Night Mode",
            "All lights off, security armed, temperature lowered",
            false,
        ),
    ]
}
