use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::ResolutionError;

/// Host of YouTube's short links, where the ID lives in the path
pub const SHORT_LINK_HOST: &str = "youtu.be";

/// Hosts accepted by the resolver
pub const ALLOWED_HOSTS: [&str; 4] = [
    "www.youtube.com",
    "youtube.com",
    "m.youtube.com",
    SHORT_LINK_HOST,
];

/// Opaque YouTube video identifier.
///
/// No shape validation happens on construction; see [`VideoId::is_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the ID has the usual shape of 11 characters from `[A-Za-z0-9_-]`
    pub fn is_canonical(&self) -> bool {
        self.0.len() == 11
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a URL to a video ID, or `None` when it does not reference a YouTube video
pub fn resolve(reference: &str) -> Option<VideoId> {
    resolve_reference(reference).ok()
}

/// Resolve a URL to a video ID, reporting why resolution failed.
///
/// The authority must be exactly one of [`ALLOWED_HOSTS`] (case-insensitive), so URLs with a
/// port or user info are rejected.
pub fn resolve_reference(reference: &str) -> Result<VideoId, ResolutionError> {
    let parsed =
        Url::parse(reference).map_err(|e| ResolutionError::InvalidUrl(e.to_string()))?;

    let authority = raw_authority(reference).to_ascii_lowercase();
    let host = parsed.host_str().unwrap_or_default();
    if authority != host || !ALLOWED_HOSTS.contains(&host) {
        return Err(ResolutionError::UnsupportedHost(authority));
    }

    if host == SHORT_LINK_HOST {
        // Everything after the leading slash, taken as written
        let path = raw_path(reference);
        return Ok(VideoId::new(path.strip_prefix('/').unwrap_or(path)));
    }

    // Blank values are skipped, so `?v=&v=abc` yields `abc`
    parsed
        .query_pairs()
        .find(|(key, value)| key == "v" && !value.is_empty())
        .map(|(_, value)| VideoId::new(value.into_owned()))
        .ok_or(ResolutionError::MissingIdentifier)
}

/// The part of `reference` after `://`, up to the start of path, query or fragment
fn raw_authority(reference: &str) -> &str {
    let rest = reference
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    &rest[..end]
}

/// The undecoded, unnormalized path of `reference`
fn raw_path(reference: &str) -> &str {
    let after_scheme = reference
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let rest = after_scheme
        .find(|c| matches!(c, '/' | '?' | '#'))
        .map(|start| &after_scheme[start..])
        .unwrap_or_default();
    let end = rest.find(|c| matches!(c, '?' | '#')).unwrap_or(rest.len());
    &rest[..end]
}
