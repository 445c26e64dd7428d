//! JSON REST handlers for properties and their devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homelink_domain::device::Device;
use homelink_domain::property::Property;

use crate::state::ApiState;

#[derive(Serialize)]
struct ListResponse {
    properties: Vec<Property>,
}

/// `GET /api/properties` — list the property directory.
pub async fn list(State(state): State<ApiState>) -> Response {
    Json(ListResponse {
        properties: state.properties.as_ref().clone(),
    })
    .into_response()
}

#[derive(Serialize)]
struct GetOk {
    property: Property,
}

#[derive(Serialize)]
struct GetError {
    error: &'static str,
}

/// Possible responses from the single-property endpoint.
pub enum GetResponse {
    Ok(Property),
    NotFound,
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(property) => Json(GetOk { property }).into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(GetError {
                    error: "Property not found",
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /api/properties/{id}` — get one property by id.
pub async fn get(State(state): State<ApiState>, Path(id): Path<String>) -> GetResponse {
    match state.property(&id) {
        Some(property) => GetResponse::Ok(property.clone()),
        None => GetResponse::NotFound,
    }
}

#[derive(Serialize)]
struct DevicesResponse {
    devices: Vec<Device>,
}

/// `GET /api/properties/{id}/devices` — current devices of one property.
///
/// Unknown ids yield an empty list rather than a 404, matching the
/// WebSocket snapshot behavior.
pub async fn devices(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    Json(DevicesResponse {
        devices: state.hub.devices_for_property(&id).await,
    })
    .into_response()
}
