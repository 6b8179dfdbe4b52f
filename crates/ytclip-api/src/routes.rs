//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_clips, health, root};
use crate::middleware::{cors_layer, ensure_public_link};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/clip", post(create_clips));

    // Generated clips are served as static byte streams from the public
    // root; the middleware below lazily re-links workspaces on access.
    let clips_service = ServeDir::new(state.workspaces.public_root());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .nest_service("/clips", clips_service)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ensure_public_link,
        ))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
