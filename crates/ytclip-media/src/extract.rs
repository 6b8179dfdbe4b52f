//! Bounded segment extraction.

use std::path::Path;
use tracing::info;

use async_trait::async_trait;

use ytclip_models::{EncodingConfig, SEGMENT_SECS};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Compute the duration to request from the encoder for a segment starting
/// at `start` in a video of `total` seconds.
///
/// Always strictly positive, never longer than the fixed segment length, so
/// a start at the tail boundary still yields a valid (tiny) request.
pub fn requested_duration(start: f64, total: f64) -> f64 {
    (total - start).max(0.001).min(SEGMENT_SECS)
}

/// Produces a bounded-duration output file from a source asset.
#[async_trait]
pub trait SegmentEncoder: Send + Sync {
    /// Extract the segment starting at `start_secs` from `input` into
    /// `output`, bounded by the fixed segment length and the end of the
    /// video.
    async fn extract(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        total_secs: f64,
    ) -> MediaResult<()>;
}

/// Production encoder: a single FFmpeg transcode per segment.
pub struct FfmpegEncoder {
    encoding: EncodingConfig,
    timeout_secs: Option<u64>,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new(EncodingConfig::default())
    }
}

impl FfmpegEncoder {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self {
            encoding,
            timeout_secs: None,
        }
    }

    /// Kill extractions that run longer than `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

#[async_trait]
impl SegmentEncoder for FfmpegEncoder {
    async fn extract(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        total_secs: f64,
    ) -> MediaResult<()> {
        let duration = requested_duration(start_secs, total_secs);

        info!(
            input = %input.display(),
            output = %output.display(),
            start = start_secs,
            duration = duration,
            "Extracting segment"
        );

        let cmd = FfmpegCommand::new(input, output)
            .seek(start_secs)
            .duration(duration)
            .video_codec(&self.encoding.codec)
            .preset(&self.encoding.preset)
            .crf(self.encoding.crf)
            .audio_codec(&self.encoding.audio_codec)
            .audio_bitrate(&self.encoding.audio_bitrate);

        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        runner.run(&cmd).await?;

        info!(output = %output.display(), "Segment extracted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_duration_mid_video() {
        assert!((requested_duration(0.0, 150.0) - 60.0).abs() < 1e-9);
        assert!((requested_duration(60.0, 150.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_requested_duration_tail_is_remainder() {
        // 45s video, clip from 0: duration is the whole 45s
        assert!((requested_duration(0.0, 45.0) - 45.0).abs() < 1e-9);
        // start near the end: only the remainder is requested
        assert!((requested_duration(90.0, 100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_requested_duration_never_zero() {
        // Start exactly at (or past) the end still requests a positive length
        assert!(requested_duration(100.0, 100.0) > 0.0);
        assert!((requested_duration(100.0, 100.0) - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_requested_duration_bounds() {
        for (start, total) in [(0.0, 1.0), (0.0, 60.0), (30.0, 300.0), (240.0, 300.0)] {
            let d = requested_duration(start, total);
            assert!(d > 0.0 && d <= SEGMENT_SECS);
            assert!(start + d <= total + 0.001);
        }
    }
}
