//! API module for handling HTTP requests and responses

#[cfg(feature = "web")]
pub(crate) mod handlers;
#[cfg(feature = "web")]
pub(crate) mod responses;

#[cfg(feature = "web")]
use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
#[cfg(feature = "web")]
use serde_json::json;
#[cfg(feature = "web")]
use std::sync::Arc;
#[cfg(feature = "web")]
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
#[cfg(feature = "web")]
use crate::state::AppState;

#[cfg(feature = "web")]
pub(crate) use handlers::*;

#[cfg(feature = "web")]
/// Create the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_size;

    Router::new()
        .route("/api/health", get(health_check))
        // Single image -> embedding
        .route("/api/embed", post(embed_image))
        // Three embeddings -> result
        .route("/api/score", post(score_embeddings))
        // Three images -> result
        .route("/api/compare", post(compare_images))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(feature = "web")]
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    responses::ApiResponse::success(json!({
        "name": crate::built_info::PKG_NAME,
        "version": crate::built_info::PKG_VERSION,
        "built_at": crate::built_info::BUILT_TIME_UTC,
    }))
}
