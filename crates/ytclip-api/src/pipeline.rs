//! The clip-generation pipeline.
//!
//! One request drives the stages strictly in order:
//! download -> duration resolution -> start-time planning -> N extractions
//! -> publish. Any stage failure aborts the rest and surfaces as one
//! classified [`ApiError`](crate::ApiError); files already produced stay on
//! disk (retention is an external concern).

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, Instrument};
use validator::Validate;

use ytclip_media::{
    is_supported_url, resolve_duration, DurationProber, SegmentEncoder, VideoSource,
};
use ytclip_models::{plan_starts, ClipInfo, ClipRequest, UniformSampler, SEGMENT_SECS};

use crate::error::{ApiError, ApiResult};
use crate::workspace::{Workspace, WorkspaceManager};

/// File name of the downloaded source inside a workspace.
const SOURCE_FILE_NAME: &str = "source.mp4";

/// Pipeline stages, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Downloading,
    DurationResolved,
    Planned,
    Extracting,
    Published,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Downloading => "downloading",
            Stage::DurationResolved => "duration_resolved",
            Stage::Planned => "planned",
            Stage::Extracting => "extracting",
            Stage::Published => "published",
            Stage::Done => "done",
        };
        write!(f, "{}", s)
    }
}

/// Sequences the collaborators for one clip request.
///
/// Collaborators are trait objects so tests can run the whole pipeline with
/// an in-memory source and encoder, no network or real video required.
pub struct ClipPipeline {
    source: Arc<dyn VideoSource>,
    prober: Arc<dyn DurationProber>,
    encoder: Arc<dyn SegmentEncoder>,
    workspaces: Arc<WorkspaceManager>,
}

impl ClipPipeline {
    pub fn new(
        source: Arc<dyn VideoSource>,
        prober: Arc<dyn DurationProber>,
        encoder: Arc<dyn SegmentEncoder>,
        workspaces: Arc<WorkspaceManager>,
    ) -> Self {
        Self {
            source,
            prober,
            encoder,
            workspaces,
        }
    }

    /// Run the full pipeline for one validated request.
    ///
    /// Returns the clip list in plan order; its length always equals the
    /// requested count. A failed segment fails the whole request rather than
    /// returning a misleading partial list.
    pub async fn run(&self, req: &ClipRequest) -> ApiResult<Vec<ClipInfo>> {
        req.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        if !is_supported_url(&req.url) {
            return Err(ApiError::Download(format!(
                "unsupported source URL: {}",
                req.url
            )));
        }

        let ws = self.workspaces.allocate().await?;
        let span = tracing::info_span!("clip_pipeline", workspace = %ws.id());

        let result = self.run_stages(req, &ws).instrument(span.clone()).await;
        if let Err(e) = &result {
            let _guard = span.enter();
            error!(error = %e, "Pipeline failed");
        }
        result
    }

    async fn run_stages(&self, req: &ClipRequest, ws: &Workspace) -> ApiResult<Vec<ClipInfo>> {
        info!(stage = %Stage::Downloading, url = %req.url, "Fetching source video");
        let source_path = ws.root().join(SOURCE_FILE_NAME);
        let asset = self.source.fetch(&req.url, &source_path).await?;

        let total = resolve_duration(&asset, self.prober.as_ref()).await?;
        info!(stage = %Stage::DurationResolved, total_secs = total, "Resolved duration");

        let mut sampler = UniformSampler(StdRng::from_os_rng());
        let starts = plan_starts(total, req.count, req.strategy, req.start, &mut sampler);
        info!(
            stage = %Stage::Planned,
            strategy = %req.strategy,
            offsets = ?starts,
            "Planned start offsets"
        );

        let mut results = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let index = i as u32 + 1;
            let file_name = format!("clip_{:02}.mp4", index);
            let output = ws.root().join(&file_name);

            info!(stage = %Stage::Extracting, index, start, "Extracting clip");
            self.encoder
                .extract(&asset.path, &output, start, total)
                .await?;

            results.push(ClipInfo {
                index,
                start,
                duration: (total - start).min(SEGMENT_SECS),
                url: format!("/clips/{}/{}", ws.id(), file_name),
            });
        }

        self.workspaces.publish(ws.id()).await?;
        info!(stage = %Stage::Published, "Workspace published");

        info!(stage = %Stage::Done, clips = results.len(), "Pipeline complete");
        Ok(results)
    }
}
