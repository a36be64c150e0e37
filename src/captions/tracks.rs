use serde::Deserialize;

use crate::resolver::VideoId;
use crate::FetchError;

/// InnerTube player response, reduced to what caption lookup needs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayabilityStatus {
    #[serde(default)]
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrack {
    pub base_url: String,
    pub language_code: String,
    pub name: Option<TrackName>,
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
pub struct TextRun {
    pub text: String,
}

/// A caption track offered for a video
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub base_url: String,
}

impl From<RawTrack> for CaptionTrack {
    fn from(raw: RawTrack) -> Self {
        let language = raw
            .name
            .and_then(|name| {
                name.simple_text
                    .or_else(|| name.runs.into_iter().next().map(|run| run.text))
            })
            .unwrap_or_else(|| raw.language_code.clone());

        Self {
            is_generated: raw.kind.as_deref() == Some("asr"),
            base_url: raw.base_url.replace("&fmt=srv3", ""),
            language_code: raw.language_code,
            language,
        }
    }
}

/// Caption tracks of one video, split by origin and kept in offered order
#[derive(Debug, Clone)]
pub struct TrackList {
    pub video_id: VideoId,
    pub manually_created: Vec<CaptionTrack>,
    pub generated: Vec<CaptionTrack>,
}

impl TrackList {
    /// Build the track list from a player response, failing if the video cannot be played
    /// or offers no captions
    pub fn from_player_response(
        video_id: &VideoId,
        response: PlayerResponse,
    ) -> Result<Self, FetchError> {
        assert_playability(video_id, response.playability_status.as_ref())?;

        let tracks = response
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(FetchError::TranscriptsDisabled);
        }

        let (generated, manually_created): (Vec<CaptionTrack>, Vec<CaptionTrack>) = tracks
            .into_iter()
            .map(CaptionTrack::from)
            .partition(|track| track.is_generated);

        Ok(Self {
            video_id: video_id.clone(),
            manually_created,
            generated,
        })
    }

    /// Find the track for a language, preferring manually created captions
    pub fn find(&self, language: &str) -> Result<&CaptionTrack, FetchError> {
        self.manually_created
            .iter()
            .chain(self.generated.iter())
            .find(|track| track.language_code == language)
            .ok_or_else(|| FetchError::NoTranscriptFound(language.to_string()))
    }

    pub fn len(&self) -> usize {
        self.manually_created.len() + self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map a non-OK playability status to the matching error
pub fn assert_playability(
    video_id: &VideoId,
    status: Option<&PlayabilityStatus>,
) -> Result<(), FetchError> {
    let status = match status {
        Some(status) if status.status != "OK" => status,
        _ => return Ok(()),
    };

    let reason = status.reason.as_deref().unwrap_or_default();

    match status.status.as_str() {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Err(FetchError::RequestBlocked),
        "LOGIN_REQUIRED" if reason.contains("inappropriate for some users") => {
            Err(FetchError::AgeRestricted)
        }
        "ERROR" if reason.contains("unavailable") => {
            let id = video_id.as_str();
            if id.starts_with("http://") || id.starts_with("https://") {
                Err(FetchError::InvalidVideoId)
            } else {
                Err(FetchError::VideoUnavailable)
            }
        }
        _ => Err(FetchError::Unplayable(reason.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(json: serde_json::Value) -> PlayerResponse {
        serde_json::from_value(json).unwrap()
    }

    fn with_tracks(tracks: serde_json::Value) -> PlayerResponse {
        player(serde_json::json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
            }
        }))
    }

    #[test]
    fn test_manual_track_preferred() {
        let response = with_tracks(serde_json::json!([
            { "baseUrl": "https://x/asr", "languageCode": "en", "kind": "asr",
              "name": { "runs": [{ "text": "English (auto-generated)" }] } },
            { "baseUrl": "https://x/manual&fmt=srv3", "languageCode": "en",
              "name": { "simpleText": "English" } }
        ]));

        let list = TrackList::from_player_response(&VideoId::new("abc"), response).unwrap();
        let track = list.find("en").unwrap();

        assert_eq!(list.len(), 2);
        assert!(!track.is_generated);
        assert_eq!(track.language, "English");
        assert_eq!(track.base_url, "https://x/manual");
    }

    #[test]
    fn test_generated_track_used_when_no_manual() {
        let response = with_tracks(serde_json::json!([
            { "baseUrl": "https://x/de", "languageCode": "de" },
            { "baseUrl": "https://x/asr", "languageCode": "en", "kind": "asr" }
        ]));

        let list = TrackList::from_player_response(&VideoId::new("abc"), response).unwrap();
        let track = list.find("en").unwrap();

        assert!(track.is_generated);
        assert_eq!(track.language, "en");
    }

    #[test]
    fn test_no_track_for_language() {
        let response = with_tracks(serde_json::json!([
            { "baseUrl": "https://x/de", "languageCode": "de" }
        ]));

        let list = TrackList::from_player_response(&VideoId::new("abc"), response).unwrap();
        assert_eq!(
            list.find("en"),
            Err(FetchError::NoTranscriptFound("en".to_string()))
        );
    }

    #[test]
    fn test_missing_captions_means_disabled() {
        let response = player(serde_json::json!({ "playabilityStatus": { "status": "OK" } }));
        assert!(matches!(
            TrackList::from_player_response(&VideoId::new("abc"), response),
            Err(FetchError::TranscriptsDisabled)
        ));

        let response = with_tracks(serde_json::json!([]));
        assert!(matches!(
            TrackList::from_player_response(&VideoId::new("abc"), response),
            Err(FetchError::TranscriptsDisabled)
        ));
    }

    #[test]
    fn test_playability_errors() {
        let id = VideoId::new("abc");
        let status = |status: &str, reason: &str| PlayabilityStatus {
            status: status.to_string(),
            reason: Some(reason.to_string()),
        };

        assert_eq!(assert_playability(&id, None), Ok(()));
        assert_eq!(assert_playability(&id, Some(&status("OK", ""))), Ok(()));
        assert_eq!(
            assert_playability(&id, Some(&status("ERROR", "This video is unavailable"))),
            Err(FetchError::VideoUnavailable)
        );
        assert_eq!(
            assert_playability(
                &VideoId::new("https://youtu.be/x"),
                Some(&status("ERROR", "This video is unavailable"))
            ),
            Err(FetchError::InvalidVideoId)
        );
        assert_eq!(
            assert_playability(
                &id,
                Some(&status("LOGIN_REQUIRED", "Sign in to confirm you're not a bot"))
            ),
            Err(FetchError::RequestBlocked)
        );
        assert_eq!(
            assert_playability(
                &id,
                Some(&status(
                    "LOGIN_REQUIRED",
                    "This video may be inappropriate for some users."
                ))
            ),
            Err(FetchError::AgeRestricted)
        );
        assert_eq!(
            assert_playability(&id, Some(&status("UNPLAYABLE", "Private video"))),
            Err(FetchError::Unplayable("Private video".to_string()))
        );
    }
}
