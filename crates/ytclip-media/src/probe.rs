//! Duration resolution.
//!
//! Two-step fallback: the duration reported by the download step is used when
//! present and positive; otherwise the downloaded file is probed and the
//! human-readable `Duration: HH:MM:SS.fraction` field is parsed out of the
//! tool's diagnostic output. If both paths come up empty the request cannot
//! proceed, since no segment can be planned without a known duration.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use async_trait::async_trait;

use crate::download::SourceAsset;
use crate::error::{MediaError, MediaResult};

/// Probes a local media file for its duration.
///
/// `Ok(None)` means the probe ran but no usable duration was found; the
/// caller decides whether that is fatal.
#[async_trait]
pub trait DurationProber: Send + Sync {
    async fn probe(&self, path: &Path) -> MediaResult<Option<f64>>;
}

/// Production prober: runs `ffprobe` and scans its diagnostic output.
#[derive(Debug, Default)]
pub struct FfprobeProber;

#[async_trait]
impl DurationProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> MediaResult<Option<f64>> {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

        // ffprobe prints the container summary, including the Duration line,
        // to stderr. Exit status is irrelevant here; the text is what counts.
        let output = Command::new("ffprobe")
            .arg("-hide_banner")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let diagnostic = String::from_utf8_lossy(&output.stderr);
        let parsed = parse_diagnostic_duration(&diagnostic);
        debug!(path = %path.display(), duration = ?parsed, "Probed media file");
        Ok(parsed)
    }
}

/// Resolve the total duration of a downloaded asset.
///
/// Primary path is the metadata duration captured during download; fallback
/// is a probe of the media container. Fails with
/// [`MediaError::DurationUnavailable`] if both yield a non-positive or
/// unparsable value.
pub async fn resolve_duration(
    asset: &SourceAsset,
    prober: &dyn DurationProber,
) -> MediaResult<f64> {
    if let Some(d) = asset.metadata_duration {
        if d > 0.0 {
            return Ok(d);
        }
    }

    match prober.probe(&asset.path).await? {
        Some(d) if d > 0.0 => Ok(d),
        _ => Err(MediaError::DurationUnavailable),
    }
}

/// Parse a `Duration: HH:MM:SS.fraction` field out of diagnostic text.
///
/// Returns `None` when the field is missing or unparsable (e.g. `N/A`).
pub fn parse_diagnostic_duration(text: &str) -> Option<f64> {
    let after = text.split("Duration:").nth(1)?;
    let field = after.trim_start().split([',', '\n', '\r']).next()?.trim();
    parse_clock_time(field)
}

/// Parse `HH:MM:SS[.fraction]` into seconds.
fn parse_clock_time(ts: &str) -> Option<f64> {
    let mut parts = ts.split(':');
    let hours: f64 = parts.next()?.trim().parse().ok()?;
    let minutes: f64 = parts.next()?.trim().parse().ok()?;
    let seconds: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
