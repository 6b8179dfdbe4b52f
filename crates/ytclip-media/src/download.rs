//! Video download using yt-dlp.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use async_trait::async_trait;

use crate::error::{MediaError, MediaResult};

/// A downloaded media file plus whatever the downloader learned about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceAsset {
    /// Local path of the downloaded file.
    pub path: PathBuf,
    /// Total duration in seconds, when the source platform reported one.
    pub metadata_duration: Option<f64>,
}

/// Resolves a remote video reference to a local media file.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Download `url` to `dest`, returning the asset and any metadata
    /// duration the platform exposed.
    async fn fetch(&self, url: &str, dest: &Path) -> MediaResult<SourceAsset>;
}

/// Production source: invokes yt-dlp for the best mp4 rendition.
#[derive(Debug, Default)]
pub struct YtDlpSource;

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn fetch(&self, url: &str, dest: &Path) -> MediaResult<SourceAsset> {
        which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

        info!(url = %url, dest = %dest.display(), "Downloading video");

        let dest_str = dest.to_string_lossy();

        // --print after_move:duration makes yt-dlp report the metadata
        // duration on stdout once the file is in place, saving a decode later.
        let output = Command::new("yt-dlp")
            .args([
                "--quiet",
                "--no-warnings",
                "--no-progress",
                "--no-simulate",
                "--print",
                "after_move:duration",
                "-f",
                "mp4/bestvideo+bestaudio/best",
                "--merge-output-format",
                "mp4",
                "-o",
                &dest_str,
                url,
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(MediaError::download_failed(format!(
                "yt-dlp failed: {}",
                stderr.lines().last().unwrap_or("Unknown error")
            )));
        }

        if !dest.exists() {
            return Err(MediaError::download_failed("Output file not created"));
        }

        let metadata_duration = parse_reported_duration(&String::from_utf8_lossy(&output.stdout));

        let file_size = dest.metadata()?.len();
        info!(
            dest = %dest.display(),
            size_mb = file_size as f64 / (1024.0 * 1024.0),
            metadata_duration = ?metadata_duration,
            "Downloaded video successfully"
        );

        Ok(SourceAsset {
            path: dest.to_path_buf(),
            metadata_duration,
        })
    }
}

/// Parse the duration yt-dlp printed, if any.
///
/// yt-dlp prints `NA` for sources without a known duration.
fn parse_reported_duration(stdout: &str) -> Option<f64> {
    let line = stdout.lines().next()?.trim();
    match line.parse::<f64>() {
        Ok(d) if d > 0.0 => Some(d),
        _ => None,
    }
}

/// Check if a URL is a supported video platform.
pub fn is_supported_url(url: &str) -> bool {
    let supported_domains = ["youtube.com", "youtu.be"];
    supported_domains.iter().any(|domain| url.contains(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reported_duration() {
        assert_eq!(parse_reported_duration("123.5\n"), Some(123.5));
        assert_eq!(parse_reported_duration("150\n"), Some(150.0));
        assert_eq!(parse_reported_duration("NA\n"), None);
        assert_eq!(parse_reported_duration(""), None);
        assert_eq!(parse_reported_duration("0\n"), None);
    }

    #[test]
    fn test_is_supported_url() {
        assert!(is_supported_url("https://youtube.com/watch?v=abc"));
        assert!(is_supported_url("https://youtu.be/abc"));
        assert!(!is_supported_url("https://example.com/video"));
    }
}
