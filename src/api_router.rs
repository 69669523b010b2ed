//! Combines the API endpoints from all feature modules into a unified
//! router.

use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::auth::configure_auth_routes())
        .merge(crate::tickets::configure_tickets_routes())
        .merge(crate::sensors::configure_sensors_routes())
}
