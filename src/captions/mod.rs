use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod timedtext;
pub mod tracks;
pub mod youtube;

pub use youtube::YoutubeCaptionService;

use crate::resolver::VideoId;
use crate::FetchError;

/// Language requested from the caption service
pub const DEFAULT_LANGUAGE: &str = "en";

/// One timed unit of caption text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Caption text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl CaptionSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Source of caption tracks for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Fetch the caption segments of a video in the given language, in playback order
    async fn get_captions(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Vec<CaptionSegment>, FetchError>;

    /// Get the name of this service
    fn service_name(&self) -> &'static str;
}
