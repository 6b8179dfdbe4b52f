//! Axum HTTP API for the ytclip backend.
//!
//! The interesting part lives in [`pipeline`]: it sequences download,
//! duration resolution, start-time planning, segment extraction and
//! publication for one request. Everything else here is plumbing around it.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod workspace;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use pipeline::ClipPipeline;
pub use routes::create_router;
pub use state::AppState;
pub use workspace::{Workspace, WorkspaceManager};
