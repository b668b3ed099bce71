//! Derived summary field.
//!
//! `summary = truncate(strip_markup(content), summary_length)`, recomputed
//! whenever `content` or `summary_length` changes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Appended when [`truncate`] cuts text short.
pub const ELLIPSIS: &str = "...";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// How manual edits to a derived field interact with recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPolicy {
    /// Source changes always regenerate the summary; manual edits survive
    /// only until the next source change.
    #[default]
    AlwaysOverwrite,
    /// A manual edit pins the summary until it is cleared or reset.
    KeepManualEdits,
}

/// Removes tag-like substrings, decodes the common entities and collapses
/// whitespace.
pub fn strip_markup(content: &str) -> String {
    let without_tags = TAG_RE.replace_all(content, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WS_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Cuts `text` to `max` characters, appending [`ELLIPSIS`] if anything was
/// dropped.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
    }
}

pub fn summarize(content: &str, summary_length: usize) -> String {
    truncate(&strip_markup(content), summary_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_plain_text() {
        assert_eq!(summarize("Hello world this is a test", 10), "Hello worl...");
    }

    #[test]
    fn short_text_is_not_marked() {
        assert_eq!(summarize("Hello", 10), "Hello");
        assert_eq!(summarize("0123456789", 10), "0123456789");
    }

    #[test]
    fn strip_markup_removes_tags_and_collapses_whitespace() {
        let html = "<p>Reuni <b>akbar</b></p>\n\n<p>angkatan&nbsp;2010 &amp; 2011</p>";
        assert_eq!(strip_markup(html), "Reuni akbar angkatan 2010 & 2011");
    }

    #[test]
    fn truncate_respects_multibyte_characters() {
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn zero_length_summary_is_only_the_marker() {
        assert_eq!(truncate("abc", 0), "...");
        assert_eq!(truncate("", 0), "");
    }
}
