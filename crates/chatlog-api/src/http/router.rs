//! Axum router configuration with middleware.
//!
//! Routes:
//! - POST /api/chat/log
//! - POST /api/chat/session
//! - GET  /health
//!
//! Middleware: CORS (the widget posts from arbitrary origins), tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat/log", post(handlers::log::log_transcript))
        .route("/api/chat/session", post(handlers::log::save_chat_message))
        .route("/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
