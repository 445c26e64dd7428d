//! JSON REST handler for cameras.
//!
//! Cameras are not simulated devices; the endpoint serves a fixed mock
//! layout per property so clients can render a security view.

use axum::Json;
use axum::extract::Path;
use serde::Serialize;

/// One mock camera.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: String,
    pub status: &'static str,
    pub property_id: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    cameras: Vec<Camera>,
}

/// `GET /api/properties/{id}/cameras` — mock camera layout for one property.
pub async fn list(Path(property_id): Path<String>) -> Json<ListResponse> {
    Json(ListResponse {
        cameras: cameras_for(&property_id),
    })
}

fn cameras_for(property_id: &str) -> Vec<Camera> {
    let camera = |index: u8, name: &str, location: &str, status| Camera {
        id: format!("{property_id}-camera-{index}"),
        name: name.to_string(),
        location: location.to_string(),
        status,
        property_id: property_id.to_string(),
    };
    vec![
        camera(1, "Front Entrance", "Main Gate", "online"),
        camera(2, "Living Room", "Main Floor", "online"),
        camera(3, "Backyard", "Outdoor", "online"),
        camera(4, "Garage", "Ground Floor", "offline"),
    ]
}
