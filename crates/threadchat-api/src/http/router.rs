//! Axum router configuration with middleware.
//!
//! HTML routes live at the root, the JSON mirror under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/conversations/{id}",
            get(handlers::api::get_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            post(handlers::api::post_message),
        );

    Router::new()
        .route("/", get(handlers::conversation::start))
        .route("/conversations/{id}", get(handlers::conversation::show))
        .route(
            "/conversations/{id}/messages",
            post(handlers::conversation::post_message),
        )
        .nest("/api/v1", api_routes)
        .route("/up", get(handlers::health::up))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
