//! External-tool layer for the ytclip backend.
//!
//! Wraps the two command-line collaborators the pipeline depends on:
//! - `yt-dlp` for resolving a video URL to a local media file
//! - `ffmpeg` / `ffprobe` for duration probing and bounded segment extraction
//!
//! Each collaborator sits behind a trait ([`VideoSource`], [`DurationProber`],
//! [`SegmentEncoder`]) with one production implementation, so pipeline logic
//! is testable without a real video or network access.

pub mod command;
pub mod download;
pub mod error;
pub mod extract;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{is_supported_url, SourceAsset, VideoSource, YtDlpSource};
pub use error::{MediaError, MediaResult};
pub use extract::{requested_duration, FfmpegEncoder, SegmentEncoder};
pub use probe::{parse_diagnostic_duration, resolve_duration, DurationProber, FfprobeProber};
