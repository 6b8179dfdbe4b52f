//! Clip result model.

use serde::{Deserialize, Serialize};

/// A single produced clip, as returned to the caller.
///
/// The response to a clip request is the full ordered list of these, one per
/// planned start offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    /// 1-based position in the plan.
    pub index: u32,
    /// Start offset in seconds within the source video.
    pub start: f64,
    /// Actual clip duration in seconds: `min(60, total - start)`.
    pub duration: f64,
    /// Retrieval URL of the shape `/clips/{workspaceId}/{fileName}`.
    pub url: String,
}
