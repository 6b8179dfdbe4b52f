//! API middleware.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::state::AppState;

/// Create CORS layer.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    use axum::http::Method;

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(std::time::Duration::from_secs(600))
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(origins)
            .allow_credentials(false)
            .max_age(std::time::Duration::from_secs(600))
    }
}

/// Best-effort public-link step for `/clips/{workspaceId}/{file}` requests.
///
/// Re-ensures the workspace's public link before the static file server
/// looks for it. Failures are swallowed: retrieval can still succeed if an
/// earlier publish left a copy behind.
pub async fn ensure_public_link(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if let Some(rest) = path.strip_prefix("/clips/") {
        if let Some(id) = rest.split('/').next() {
            if !id.is_empty() {
                if let Err(e) = state.workspaces.publish(id).await {
                    debug!(workspace = %id, error = %e, "Best-effort public link failed");
                }
            }
        }
    }
    next.run(req).await
}
