use anyhow::{Context, Result};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::transcript::{ResultStore, StoredResult};
use crate::utils::sanitize_filename;

pub mod formatters;

pub use formatters::*;

/// File names for positions `1..=count`, unique within the batch.
///
/// A non-blank custom name at the same position wins; otherwise `transcript_<index>.txt`.
/// A name already taken by an earlier position gets `_<index>` appended until it is free.
pub fn artifact_names(count: usize, custom_names: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();

    (1..=count)
        .map(|index| {
            let mut stem = artifact_stem(index, custom_names);
            while taken.contains(&stem) {
                stem = format!("{}_{}", stem, index);
            }
            taken.insert(stem.clone());
            format!("{}.txt", stem)
        })
        .collect()
}

/// File name offered for the transcript at 1-based `index`, see [`artifact_names`]
pub fn artifact_name(index: usize, custom_names: &[String]) -> String {
    artifact_names(index, custom_names)
        .pop()
        .unwrap_or_else(|| format!("transcript_{}.txt", index))
}

fn artifact_stem(index: usize, custom_names: &[String]) -> String {
    let custom = index
        .checked_sub(1)
        .and_then(|i| custom_names.get(i))
        .map(|name| name.trim())
        .filter(|name| !name.is_empty());

    match custom {
        Some(name) => sanitize_filename(name),
        None => format!("transcript_{}", index),
    }
}

/// Artifact name for a stored result, `None` when there is nothing to download
pub fn artifact_for(entry: &StoredResult, custom_names: &[String]) -> Option<String> {
    entry
        .result
        .is_success()
        .then(|| artifact_name(entry.index, custom_names))
}

/// Write every successful transcript into `dir`, returning the written paths
pub fn save_transcripts(
    store: &ResultStore,
    dir: &Path,
    custom_names: &[String],
) -> Result<Vec<PathBuf>> {
    fs_err::create_dir_all(dir).context("Failed to create output directory")?;

    let mut written = Vec::new();
    for entry in store {
        let (Some(text), Some(name)) = (entry.result.transcript(), artifact_for(entry, custom_names))
        else {
            continue;
        };

        let path = dir.join(name);
        fs_err::write(&path, text)?;
        tracing::debug!("Saved transcript {} to {}", entry.index, path.display());
        written.push(path);
    }

    Ok(written)
}

/// Bundle every successful transcript into one ZIP archive, returning the entry names
pub fn save_zip(store: &ResultStore, path: &Path, custom_names: &[String]) -> Result<Vec<String>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).context("Failed to create archive directory")?;
    }

    let file = fs_err::File::create(path).context("Failed to create archive")?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    for entry in store {
        let (Some(text), Some(name)) = (entry.result.transcript(), artifact_for(entry, custom_names))
        else {
            continue;
        };

        archive
            .start_file(name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", name))?;
        archive.write_all(text.as_bytes())?;
        entries.push(name);
    }

    archive.finish().context("Failed to finish archive")?;
    tracing::debug!("Bundled {} transcripts into {}", entries.len(), path.display());

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VideoId;
    use crate::transcript::TranscriptResult;
    use crate::{FetchError, TranscriptError};

    fn sample_store() -> ResultStore {
        let mut store = ResultStore::new();
        store.insert(
            "https://youtu.be/aaaaaaaaaaa".into(),
            TranscriptResult::Success {
                video_id: VideoId::new("aaaaaaaaaaa"),
                text: "first transcript".into(),
                segment_count: 2,
            },
        );
        store.insert(
            "https://youtu.be/bbbbbbbbbbb".into(),
            TranscriptResult::Failure {
                video_id: Some(VideoId::new("bbbbbbbbbbb")),
                error: TranscriptError::Fetch {
                    reference: "https://youtu.be/bbbbbbbbbbb".into(),
                    video_id: VideoId::new("bbbbbbbbbbb"),
                    source: FetchError::VideoUnavailable,
                },
            },
        );
        store.insert(
            "https://youtu.be/ccccccccccc".into(),
            TranscriptResult::Success {
                video_id: VideoId::new("ccccccccccc"),
                text: "third transcript".into(),
                segment_count: 1,
            },
        );
        store
    }

    #[test]
    fn test_default_artifact_names_are_positional() {
        assert_eq!(artifact_name(1, &[]), "transcript_1.txt");
        assert_eq!(artifact_name(3, &[]), "transcript_3.txt");
    }

    #[test]
    fn test_custom_artifact_names() {
        let names = vec!["My Talk".to_string(), "".to_string()];

        assert_eq!(artifact_name(1, &names), "My_Talk.txt");
        assert_eq!(artifact_name(2, &names), "transcript_2.txt");
        assert_eq!(artifact_name(3, &names), "transcript_3.txt");
        assert_eq!(artifact_name(1, &["a/b?".to_string()]), "ab.txt");
    }

    #[test]
    fn test_save_skips_failures_and_keeps_indices() {
        let dir = tempfile::tempdir().unwrap();
        let store = sample_store();

        let written = save_transcripts(&store, dir.path(), &[]).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("transcript_1.txt"),
                dir.path().join("transcript_3.txt")
            ]
        );
        assert_eq!(
            fs_err::read_to_string(dir.path().join("transcript_3.txt")).unwrap(),
            "third transcript"
        );
        assert!(!dir.path().join("transcript_2.txt").exists());
    }

    #[test]
    fn test_repeated_names_get_index_suffix() {
        let names = vec!["talk".to_string(), "talk".to_string(), "ta/lk".to_string()];

        assert_eq!(
            artifact_names(3, &names),
            vec!["talk.txt", "talk_2.txt", "talk_3.txt"]
        );
        assert_eq!(artifact_name(2, &names), "talk_2.txt");
    }

    #[test]
    fn test_custom_name_cannot_shadow_default_name() {
        let names = vec!["transcript_2".to_string()];

        assert_eq!(
            artifact_names(2, &names),
            vec!["transcript_2.txt", "transcript_2_2.txt"]
        );
    }

    #[test]
    fn test_save_keeps_transcripts_with_same_custom_name() {
        let dir = tempfile::tempdir().unwrap();
        let names = vec!["talk".to_string(), "talk".to_string(), "talk".to_string()];

        let written = save_transcripts(&sample_store(), dir.path(), &names).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("talk.txt"), dir.path().join("talk_3.txt")]
        );
        assert_eq!(
            fs_err::read_to_string(dir.path().join("talk.txt")).unwrap(),
            "first transcript"
        );
        assert_eq!(
            fs_err::read_to_string(dir.path().join("talk_3.txt")).unwrap(),
            "third transcript"
        );
    }

    #[test]
    fn test_zip_bundle_holds_successful_transcripts() {
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle").join("transcripts.zip");

        let entries = save_zip(&sample_store(), &path, &[]).unwrap();
        assert_eq!(entries, vec!["transcript_1.txt", "transcript_3.txt"]);

        let mut archive = zip::ZipArchive::new(fs_err::File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut text = String::new();
        archive
            .by_name("transcript_3.txt")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "third transcript");
    }

    #[test]
    fn test_artifact_for_failure_is_none() {
        let store = sample_store();
        let artifacts: Vec<Option<String>> = store.iter().map(|e| artifact_for(e, &[])).collect();

        assert_eq!(
            artifacts,
            vec![
                Some("transcript_1.txt".to_string()),
                None,
                Some("transcript_3.txt".to_string())
            ]
        );
    }
}
