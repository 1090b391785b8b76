//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    http::Method,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/search", get(handlers::search).post(handlers::search_post))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}
