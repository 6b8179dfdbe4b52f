//! Encoding configuration for clip extraction.

use serde::{Deserialize, Serialize};

/// FFmpeg encoding settings used for every extracted segment.
///
/// Quality tuning is out of scope; these defaults favor a fast transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec.
    pub codec: String,
    /// Encoder preset.
    pub preset: String,
    /// Constant rate factor (quality).
    pub crf: u8,
    /// Audio codec.
    pub audio_codec: String,
    /// Audio bitrate.
    pub audio_bitrate: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}
