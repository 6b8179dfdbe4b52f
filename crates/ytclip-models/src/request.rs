//! Clip request model and start-time strategies.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// How start times are picked for the requested clips.
///
/// Deserialization is permissive: any unrecognized strategy string maps to
/// `Sequential`. Clients sending `"chronological"` or a typo get the default
/// behavior instead of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Strategy {
    /// First clip at the requested (or zero) start, each next one 60s later,
    /// clamped to the latest start that still fits a full segment.
    #[default]
    Sequential,
    /// Each start drawn independently and uniformly from the valid range.
    Random,
}

impl From<String> for Strategy {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "random" => Strategy::Random,
            _ => Strategy::Sequential,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Random => write!(f, "random"),
        }
    }
}

/// A request to slice a remote video into fixed-length clips.
///
/// Immutable once accepted; validated at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClipRequest {
    /// Source video URL (YouTube).
    #[validate(url(message = "url must be a valid http(s) URL"))]
    pub url: String,

    /// How many 60s clips to produce.
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = 20, message = "count must be between 1 and 20"))]
    pub count: u8,

    /// How to pick start times.
    #[serde(default)]
    pub strategy: Strategy,

    /// Optional manual start time in seconds for the first clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, message = "start must be non-negative"))]
    pub start: Option<f64>,
}

fn default_count() -> u8 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_permissive_parse() {
        let req: ClipRequest =
            serde_json::from_str(r#"{"url":"https://youtu.be/x","strategy":"random"}"#).unwrap();
        assert_eq!(req.strategy, Strategy::Random);

        // Unknown strategies fall back to sequential, not an error
        let req: ClipRequest =
            serde_json::from_str(r#"{"url":"https://youtu.be/x","strategy":"zigzag"}"#).unwrap();
        assert_eq!(req.strategy, Strategy::Sequential);

        let req: ClipRequest = serde_json::from_str(r#"{"url":"https://youtu.be/x"}"#).unwrap();
        assert_eq!(req.strategy, Strategy::Sequential);
        assert_eq!(req.count, 1);
        assert!(req.start.is_none());
    }

    #[test]
    fn test_count_range_validation() {
        let ok = ClipRequest {
            url: "https://youtube.com/watch?v=abc".to_string(),
            count: 20,
            strategy: Strategy::Sequential,
            start: None,
        };
        assert!(ok.validate().is_ok());

        let too_many = ClipRequest { count: 21, ..ok.clone() };
        assert!(too_many.validate().is_err());

        let zero = ClipRequest { count: 0, ..ok.clone() };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_start_must_be_non_negative() {
        let req = ClipRequest {
            url: "https://youtube.com/watch?v=abc".to_string(),
            count: 1,
            strategy: Strategy::Sequential,
            start: Some(-1.0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_url_validation() {
        let req = ClipRequest {
            url: "not a url".to_string(),
            count: 1,
            strategy: Strategy::Sequential,
            start: None,
        };
        assert!(req.validate().is_err());
    }
}
