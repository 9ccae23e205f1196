use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{FavoritesStore, MovieDetailService},
};

pub mod favorites;
pub mod movies;

/// Shared application state
pub struct AppState {
    pub favorites: FavoritesStore,
    pub details: MovieDetailService,
}

impl AppState {
    pub fn new(favorites: FavoritesStore, details: MovieDetailService) -> Self {
        Self { favorites, details }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies/:id", get(movies::detail))
        .route("/favorites", get(favorites::list))
        .route("/favorites/:id", get(favorites::status))
        .route("/favorites/:id/toggle", post(favorites::toggle))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
