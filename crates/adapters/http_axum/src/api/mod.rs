//! JSON REST API handler modules.

pub mod auth;
pub mod automations;
pub mod cameras;
pub mod properties;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;

use crate::state::ApiState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/properties", get(properties::list))
        .route("/properties/{id}", get(properties::get))
        .route("/properties/{id}/devices", get(properties::devices))
        .route("/properties/{id}/cameras", get(cameras::list))
        .route("/properties/{id}/automations", get(automations::list))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// `GET /api/health` — liveness probe.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Homelink API is running",
    })
}
