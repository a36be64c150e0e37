use std::borrow::Cow;

use crate::captions::{CaptionSegment, CaptionService, DEFAULT_LANGUAGE};
use crate::resolver::{resolve_reference, VideoId};
use crate::{ResolutionError, TranscriptError};

pub mod store;

pub use store::{ResultStore, StoredResult};

/// Progress of a single reference through resolution and fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Pending,
    Resolving,
    ResolutionFailed,
    Resolved,
    FetchSucceeded,
    FetchFailed,
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FetchState::ResolutionFailed | FetchState::FetchSucceeded | FetchState::FetchFailed
        )
    }
}

/// Outcome of fetching the transcript of one reference
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptResult {
    Success {
        video_id: VideoId,
        text: String,
        segment_count: usize,
    },
    Failure {
        video_id: Option<VideoId>,
        error: TranscriptError,
    },
}

impl TranscriptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscriptResult::Success { .. })
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        match self {
            TranscriptResult::Success { video_id, .. } => Some(video_id),
            TranscriptResult::Failure { video_id, .. } => video_id.as_ref(),
        }
    }

    /// Transcript text, if the fetch succeeded
    pub fn transcript(&self) -> Option<&str> {
        match self {
            TranscriptResult::Success { text, .. } => Some(text),
            TranscriptResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&TranscriptError> {
        match self {
            TranscriptResult::Success { .. } => None,
            TranscriptResult::Failure { error, .. } => Some(error),
        }
    }

    /// Transcript text on success, diagnostic message on failure
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            TranscriptResult::Success { text, .. } => Cow::Borrowed(text),
            TranscriptResult::Failure { error, .. } => Cow::Owned(error.to_string()),
        }
    }

    /// Terminal state reached by this reference
    pub fn state(&self) -> FetchState {
        match self {
            TranscriptResult::Success { .. } => FetchState::FetchSucceeded,
            TranscriptResult::Failure {
                error: TranscriptError::Resolution { .. },
                ..
            } => FetchState::ResolutionFailed,
            TranscriptResult::Failure { .. } => FetchState::FetchFailed,
        }
    }

    /// Flatten into the `(success, text)` pair
    pub fn into_parts(self) -> (bool, String) {
        match self {
            TranscriptResult::Success { text, .. } => (true, text),
            TranscriptResult::Failure { error, .. } => (false, error.to_string()),
        }
    }
}

/// Join segment texts in order, one space between neighbours, without trimming
pub fn join_segments(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Settings for transcript fetching
#[derive(Debug, Clone, Default)]
pub struct TranscriptSettings {
    /// Reject IDs that are not 11 characters of `[A-Za-z0-9_-]`
    pub strict_ids: bool,
}

/// Resolves references and fetches their transcripts, one at a time
pub struct Transcriptor {
    service: Box<dyn CaptionService>,
    settings: TranscriptSettings,
}

impl Transcriptor {
    pub fn new(service: Box<dyn CaptionService>, settings: TranscriptSettings) -> Self {
        Self { service, settings }
    }

    /// Fetch the transcript for one reference. Failures are returned as
    /// [`TranscriptResult::Failure`], never propagated.
    pub async fn fetch_transcript(&self, reference: &str) -> TranscriptResult {
        tracing::debug!("{:?}: {}", FetchState::Resolving, reference);

        let video_id = match self.resolve(reference) {
            Ok(video_id) => video_id,
            Err(reason) => {
                tracing::warn!("Could not resolve '{}': {}", reference, reason);
                return TranscriptResult::Failure {
                    video_id: None,
                    error: TranscriptError::Resolution {
                        reference: reference.to_string(),
                        reason,
                    },
                };
            }
        };

        tracing::debug!("{:?}: {} -> {}", FetchState::Resolved, reference, video_id);
        tracing::info!(
            "Fetching {} captions for video ID: {}",
            self.service.service_name(),
            video_id
        );

        match self.service.get_captions(&video_id, DEFAULT_LANGUAGE).await {
            Ok(segments) => TranscriptResult::Success {
                text: join_segments(&segments),
                segment_count: segments.len(),
                video_id,
            },
            Err(source) => {
                tracing::warn!("Caption fetch failed for {}: {}", video_id, source);
                TranscriptResult::Failure {
                    video_id: Some(video_id.clone()),
                    error: TranscriptError::Fetch {
                        reference: reference.to_string(),
                        video_id,
                        source,
                    },
                }
            }
        }
    }

    /// Process references in input order, inserting each result into `store` and handing it
    /// to `on_result` before moving on. A failed reference never stops the batch.
    pub async fn process_batch<F>(
        &self,
        references: &[String],
        store: &mut ResultStore,
        mut on_result: F,
    ) where
        F: FnMut(&StoredResult),
    {
        for reference in references {
            let result = self.fetch_transcript(reference).await;
            let entry = store.insert(reference.clone(), result);
            on_result(entry);
        }
    }

    fn resolve(&self, reference: &str) -> Result<VideoId, ResolutionError> {
        let video_id = resolve_reference(reference)?;

        if video_id.is_empty() {
            return Err(ResolutionError::EmptyIdentifier);
        }

        if !video_id.is_canonical() {
            if self.settings.strict_ids {
                return Err(ResolutionError::MalformedIdentifier(video_id.to_string()));
            }
            tracing::warn!("Video ID '{}' does not look like a YouTube ID", video_id);
        }

        Ok(video_id)
    }
}
