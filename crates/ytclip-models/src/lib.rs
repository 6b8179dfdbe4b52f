//! Shared data models for the ytclip backend.
//!
//! This crate provides Serde-serializable types for:
//! - Clip requests and clip results
//! - Start-time selection strategies
//! - Encoding configuration
//! - The pure start-time planner

pub mod clip;
pub mod encoding;
pub mod plan;
pub mod request;

// Re-export common types
pub use clip::ClipInfo;
pub use encoding::EncodingConfig;
pub use plan::{plan_starts, round_ms, StartSampler, UniformSampler, SEGMENT_SECS};
pub use request::{ClipRequest, Strategy};
