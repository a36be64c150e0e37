use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use super::tracks::{CaptionTrack, PlayerResponse, TrackList};
use super::{timedtext, CaptionSegment, CaptionService};
use crate::config::CaptionsConfig;
use crate::resolver::VideoId;
use crate::{FetchError, Result};

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#)
        .expect("Failed to compile InnerTube API key regex")
});

/// Caption service backed by YouTube's watch page, InnerTube player API and timedtext endpoint
pub struct YoutubeCaptionService {
    client: Client,
    base_url: String,
}

impl YoutubeCaptionService {
    /// Create a service from the caption settings
    pub fn new(config: &CaptionsConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone());

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the watch page HTML
    async fn fetch_watch_page(&self, video_id: &VideoId) -> std::result::Result<String, FetchError> {
        let url = format!(
            "{}/watch?v={}",
            self.base_url,
            urlencoding::encode(video_id.as_str())
        );
        tracing::debug!("Fetching watch page: {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response)?;

        Ok(response.text().await?)
    }

    /// Query the InnerTube player endpoint for caption metadata
    async fn fetch_player_response(
        &self,
        video_id: &VideoId,
        api_key: &str,
    ) -> std::result::Result<PlayerResponse, FetchError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        tracing::debug!("Fetching player data for video ID: {}", video_id);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id.as_str()
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let response = check_status(response)?;

        Ok(response.json::<PlayerResponse>().await?)
    }

    /// Download and parse the timedtext document of a track
    async fn fetch_track(
        &self,
        track: &CaptionTrack,
    ) -> std::result::Result<Vec<CaptionSegment>, FetchError> {
        let url = if track.base_url.starts_with('/') {
            format!("{}{}", self.base_url, track.base_url)
        } else {
            track.base_url.clone()
        };
        tracing::debug!(
            "Downloading {} captions ({})",
            track.language,
            if track.is_generated { "generated" } else { "manual" }
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status(response)?;
        let xml = response.text().await?;

        timedtext::parse(&xml)
    }
}

#[async_trait]
impl CaptionService for YoutubeCaptionService {
    async fn get_captions(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> std::result::Result<Vec<CaptionSegment>, FetchError> {
        let html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&html)?;

        let player = self.fetch_player_response(video_id, &api_key).await?;
        let tracks = TrackList::from_player_response(video_id, player)?;
        tracing::debug!("Found {} caption tracks for {}", tracks.len(), video_id);

        let track = tracks.find(language)?;
        let segments = self.fetch_track(track).await?;
        tracing::debug!("Parsed {} caption segments", segments.len());

        Ok(segments)
    }

    fn service_name(&self) -> &'static str {
        "YouTube"
    }
}

/// Pull the InnerTube API key out of the watch page
fn extract_api_key(html: &str) -> std::result::Result<String, FetchError> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(FetchError::RequestBlocked);
    }

    API_KEY
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str().to_string())
        .ok_or_else(|| FetchError::Unparsable("InnerTube API key not found".to_string()))
}

fn check_status(response: Response) -> std::result::Result<Response, FetchError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited);
    }

    if !status.is_success() {
        return Err(FetchError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSy-test_KEY"});</script>"#;
        assert_eq!(extract_api_key(html).unwrap(), "AIzaSy-test_KEY");
    }

    #[test]
    fn test_extract_api_key_missing() {
        assert!(matches!(
            extract_api_key("<html></html>"),
            Err(FetchError::Unparsable(_))
        ));
    }

    #[test]
    fn test_recaptcha_page_is_blocked() {
        let html = r#"<div class="g-recaptcha"></div>"INNERTUBE_API_KEY":"abc""#;
        assert_eq!(extract_api_key(html), Err(FetchError::RequestBlocked));
    }
}
