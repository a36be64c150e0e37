use once_cell::sync::Lazy;
use regex::Regex;

use super::CaptionSegment;
use crate::FetchError;

/// A `<text ...>` element, either self-closing or with a body
static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)"#)
        .expect("Failed to compile timedtext element regex")
});

/// Inline formatting tags such as `<i>` or `<font color="...">`
static INLINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile inline tag regex"));

/// Parse a YouTube timedtext XML document into caption segments.
///
/// Elements without text, self-closing or empty, are skipped. Text is unescaped twice, since
/// YouTube escapes entities inside already-escaped XML, and inline formatting tags are dropped.
pub fn parse(xml: &str) -> Result<Vec<CaptionSegment>, FetchError> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();

    for captures in TEXT_ELEMENT.captures_iter(xml) {
        let attributes = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let raw_text = match captures.get(2) {
            Some(text) if !text.as_str().is_empty() => text.as_str(),
            _ => continue,
        };

        let start = attribute(attributes, "start")
            .ok_or_else(|| FetchError::Unparsable("caption without start time".to_string()))?
            .parse::<f64>()
            .map_err(|e| FetchError::Unparsable(format!("invalid start time: {}", e)))?;

        let duration = match attribute(attributes, "dur") {
            Some(dur) => dur
                .parse::<f64>()
                .map_err(|e| FetchError::Unparsable(format!("invalid duration: {}", e)))?,
            None => 0.0,
        };

        let xml_decoded = html_escape::decode_html_entities(raw_text);
        let html_decoded = html_escape::decode_html_entities(&xml_decoded);
        let text = INLINE_TAG.replace_all(&html_decoded, "").into_owned();

        segments.push(CaptionSegment {
            text,
            start,
            duration,
        });
    }

    if segments.is_empty() && !xml.contains("<transcript") && !xml.contains("<timedtext") {
        return Err(FetchError::Unparsable(
            "response is not a timedtext document".to_string(),
        ));
    }

    Ok(segments)
}

fn attribute<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let mut search = attributes;

    while let Some(pos) = search.find(&needle) {
        let preceded_by_space = pos == 0
            || search[..pos]
                .chars()
                .last()
                .map(char::is_whitespace)
                .unwrap_or(false);
        let rest = &search[pos + needle.len()..];

        if preceded_by_space {
            return rest.find('"').map(|end| &rest[..end]);
        }
        search = rest;
    }

    None
}
