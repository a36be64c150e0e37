use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Split free text into references: one per line, trimmed, blank lines dropped, order kept.
///
/// With `split_concatenated`, a line holding several `http(s)://` URLs glued together yields
/// one reference per URL and anything before the first URL is dropped.
pub fn parse_references(text: &str, split_concatenated: bool) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| {
            if split_concatenated {
                split_urls(line)
            } else {
                vec![line.to_string()]
            }
        })
        .collect()
}

/// Split a line at every `http://` or `https://`
pub fn split_urls(line: &str) -> Vec<String> {
    let starts: Vec<usize> = line
        .match_indices("http")
        .map(|(pos, _)| pos)
        .filter(|&pos| line[pos..].starts_with("http://") || line[pos..].starts_with("https://"))
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            line[start..end].trim().to_string()
        })
        .filter(|url| !url.is_empty())
        .collect()
}

/// Read references from a file, or from stdin when the path is `-`
pub fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read references from stdin")?;
        return Ok(buffer);
    }

    fs_err::read_to_string(path).context("Failed to read input file")
}

/// Read one custom file name per line. Blank lines are kept so names stay aligned with
/// the references they belong to.
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let content = fs_err::read_to_string(path).context("Failed to read names file")?;

    Ok(content.lines().map(|line| line.trim().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_dropped_and_order_kept() {
        let text = "https://youtu.be/a\n\n   \r\n  https://youtu.be/b  \nnot a url\n";

        assert_eq!(
            parse_references(text, false),
            vec!["https://youtu.be/a", "https://youtu.be/b", "not a url"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(
            parse_references("https://youtu.be/a\nhttps://youtu.be/a", false).len(),
            2
        );
    }

    #[test]
    fn test_split_concatenated() {
        let text = "https://youtu.be/ahttps://www.youtube.com/watch?v=b\nnoise http://youtu.be/c";

        assert_eq!(
            parse_references(text, true),
            vec![
                "https://youtu.be/a",
                "https://www.youtube.com/watch?v=b",
                "http://youtu.be/c"
            ]
        );
    }

    #[test]
    fn test_split_without_scheme_drops_line() {
        assert!(split_urls("youtube.com/watch?v=x").is_empty());
        assert_eq!(
            split_urls("https://youtu.be/httpish"),
            vec!["https://youtu.be/httpish"]
        );
    }

    #[test]
    fn test_read_names_keeps_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        fs_err::write(&path, "intro\n\n outro \n").unwrap();

        assert_eq!(read_names(&path).unwrap(), vec!["intro", "", "outro"]);
    }

    #[test]
    fn test_read_source_missing_file() {
        assert!(read_source(Path::new("/definitely/not/here.txt")).is_err());
    }
}
