use anyhow::Result;
use console::style;
use serde::Serialize;

use super::artifact_for;
use crate::transcript::{ResultStore, StoredResult, TranscriptResult};
use crate::utils::preview;
use crate::TranscriptError;

const SEPARATOR: &str = "------------------------------";

/// Format one processed reference for the console
pub fn format_entry(entry: &StoredResult, custom_names: &[String], preview_chars: usize) -> String {
    let mut out = String::new();

    match &entry.result {
        TranscriptResult::Success { text, .. } => {
            let headline = format!("Video {}: {}", entry.index, entry.reference);
            out.push_str(&format!("✅ {}", style(headline).green().bold()));
            if let Some(name) = artifact_for(entry, custom_names) {
                out.push_str(&format!(" (saved as `{}`)", name));
            }
            out.push('\n');
            out.push_str(&preview(text, preview_chars));
            out.push('\n');
        }
        TranscriptResult::Failure { video_id, error } => {
            let headline = format!("Video {}: {}", entry.index, entry.reference);
            out.push_str(&format!("❌ {}\n", style(headline).red().bold()));
            out.push_str(&error.to_string());
            out.push('\n');

            if let (Some(video_id), TranscriptError::Fetch { .. }) = (video_id, error) {
                out.push_str(&format!("Video ID: {}\n", video_id));
            }
        }
    }

    out.push_str(SEPARATOR);
    out
}

/// Format the success/failure counts
pub fn format_summary(store: &ResultStore) -> String {
    format!(
        "Summary: {} succeeded, {} failed",
        store.succeeded(),
        store.failed()
    )
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    succeeded: usize,
    failed: usize,
    results: Vec<JsonEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonEntry<'a> {
    index: usize,
    reference: &'a str,
    success: bool,
    video_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
}

/// Serialize the store as a JSON report
pub fn format_as_json(store: &ResultStore, custom_names: &[String]) -> Result<String> {
    let results = store
        .iter()
        .map(|entry| {
            let segment_count = match &entry.result {
                TranscriptResult::Success { segment_count, .. } => Some(*segment_count),
                TranscriptResult::Failure { .. } => None,
            };

            JsonEntry {
                index: entry.index,
                reference: &entry.reference,
                success: entry.result.is_success(),
                video_id: entry.result.video_id().map(|id| id.as_str()),
                transcript: entry.result.transcript(),
                segment_count,
                error: entry.result.error().map(ToString::to_string),
                artifact: artifact_for(entry, custom_names),
            }
        })
        .collect();

    let report = JsonReport {
        generated_at: chrono::Utc::now(),
        succeeded: store.succeeded(),
        failed: store.failed(),
        results,
    };

    Ok(serde_json::to_string_pretty(&report)?)
}
