pub mod api_router;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod report;
pub mod sensors;
pub mod shared;
pub mod tickets;
pub mod web;

use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::state::AppState;

/// The full application: API routes, page shells, CORS and request tracing.
pub fn build_app(state: Arc<AppState>) -> Router {
    api_router::configure_api_routes()
        .merge(web::configure_web_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
