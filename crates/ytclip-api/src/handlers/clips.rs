//! Clip creation handler.

use axum::extract::State;
use axum::Json;

use ytclip_models::{ClipInfo, ClipRequest};

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /api/clip` — download the source video into a fresh workspace,
/// slice it into the requested clips and return their retrieval URLs.
pub async fn create_clips(
    State(state): State<AppState>,
    Json(req): Json<ClipRequest>,
) -> ApiResult<Json<Vec<ClipInfo>>> {
    let clips = state.pipeline.run(&req).await?;
    Ok(Json(clips))
}
