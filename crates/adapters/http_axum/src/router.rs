//! Axum router assembly.

use axum::Json;
use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::ApiState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and answers everything else with an
/// express-style JSON 404. Includes a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build(state: ApiState) -> Router {
    Router::new()
        .nest("/api", crate::api::routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct NotFoundResponse {
    error: String,
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: format!("Route not found: {method} {}", uri.path()),
        }),
    )
}
