use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// An unfiltered extraction result: one anchor or URL found in a message.
/// Many candidates may share a destination across messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCandidate {
    pub title: String,
    pub snippet: String,
    pub raw_url: String,
}

/// The externally visible unit: canonical URL usable directly as a link
/// target and as the stable identity for downstream citation matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub title: String,
    pub canonical_url: String,
    pub host: String,
    pub snippet: String,
    pub score: f64,
}

/// Extraction knobs, copied out of the pipeline config for the run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub min_title_length: usize,
    pub snippet_max_len: usize,
}

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static ZERO_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{200B}-\u{200D}\u{FEFF}]").unwrap());

/// Collapse whitespace runs and strip zero-width characters, which newsletter
/// templates sprinkle into anchor text.
pub fn clean_inline_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    ZERO_WIDTH.replace_all(&collapsed, "").trim().to_string()
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncate to at most `max` chars, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}
