//! Application state.

use std::sync::Arc;

use ytclip_media::{
    DurationProber, FfmpegEncoder, FfprobeProber, SegmentEncoder, VideoSource, YtDlpSource,
};
use ytclip_models::EncodingConfig;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::pipeline::ClipPipeline;
use crate::workspace::WorkspaceManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub workspaces: Arc<WorkspaceManager>,
    pub pipeline: Arc<ClipPipeline>,
}

impl AppState {
    /// Create state with the production collaborators (yt-dlp, ffprobe,
    /// ffmpeg).
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let workspaces = Arc::new(
            WorkspaceManager::new(&config.work_root, &config.public_root)
                .map_err(|e| ApiError::internal(format!("failed to prepare roots: {}", e)))?,
        );

        Ok(Self::with_collaborators(
            config,
            workspaces,
            Arc::new(YtDlpSource),
            Arc::new(FfprobeProber),
            Arc::new(FfmpegEncoder::new(EncodingConfig::default())),
        ))
    }

    /// Create state with explicit collaborators. Tests inject fakes here.
    pub fn with_collaborators(
        config: ApiConfig,
        workspaces: Arc<WorkspaceManager>,
        source: Arc<dyn VideoSource>,
        prober: Arc<dyn DurationProber>,
        encoder: Arc<dyn SegmentEncoder>,
    ) -> Self {
        let pipeline = Arc::new(ClipPipeline::new(
            source,
            prober,
            encoder,
            Arc::clone(&workspaces),
        ));
        Self {
            config,
            workspaces,
            pipeline,
        }
    }
}
