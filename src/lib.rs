//! YouTube Transcript Extractor - A Rust CLI tool for pulling transcripts from YouTube videos
//!
//! This library resolves YouTube URLs to video IDs, fetches the English caption track from
//! YouTube's caption service and flattens it into plain text. The CLI is a thin layer on top
//! so the same orchestration can be reused in batch mode.

pub mod captions;
pub mod cli;
pub mod config;
pub mod input;
pub mod output;
pub mod resolver;
pub mod transcript;
pub mod utils;

pub use captions::{CaptionSegment, CaptionService, YoutubeCaptionService};
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use resolver::{resolve, resolve_reference, VideoId};
pub use transcript::{ResultStore, StoredResult, TranscriptResult, Transcriptor};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Why a reference could not be turned into a video ID
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported host: '{0}'")]
    UnsupportedHost(String),

    #[error("no video ID found in URL")]
    MissingIdentifier,

    #[error("video ID is empty")]
    EmptyIdentifier,

    #[error("malformed video ID: '{0}'")]
    MalformedIdentifier(String),
}

/// Failures reported by the caption service
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("too many requests, YouTube is rate limiting this client")]
    RateLimited,

    #[error("the video is no longer available")]
    VideoUnavailable,

    #[error("invalid video ID")]
    InvalidVideoId,

    #[error("subtitles are disabled for this video")]
    TranscriptsDisabled,

    #[error("no transcript found for language '{0}'")]
    NoTranscriptFound(String),

    #[error("YouTube is blocking requests from this IP")]
    RequestBlocked,

    #[error("the video is age restricted")]
    AgeRestricted,

    #[error("the video is unplayable: {0}")]
    Unplayable(String),

    #[error("could not parse YouTube response: {0}")]
    Unparsable(String),
}

impl FetchError {
    /// Whether a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::RateLimited)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Unparsable(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Per-reference failure, carrying everything the user needs to see
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Error: Could not extract video ID from the provided URL: '{reference}'")]
    Resolution {
        reference: String,
        #[source]
        reason: ResolutionError,
    },

    #[error("Error extracting transcript for '{reference}' (video ID: '{video_id}'): {source}")]
    Fetch {
        reference: String,
        video_id: VideoId,
        source: FetchError,
    },
}
