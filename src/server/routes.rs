//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Only the model-backed endpoints sit behind the quota gate.
    let gated = Router::new()
        .route("/analyze_document", post(handlers::analyze_document))
        .route("/compare_documents", post(handlers::compare_documents))
        .route("/chatbot", post(handlers::chatbot))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::admission_gate,
        ));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/extract_text", post(handlers::extract_text))
        .merge(gated)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
