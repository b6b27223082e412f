//! Primary strategy: walk every anchor in the HTML body.

use scraper::{ElementRef, Html, Selector};

use crate::extract::model::{
    ArticleCandidate, ExtractOptions, char_len, clean_inline_text, truncate_chars,
};
use crate::filter;
use crate::mail::decode::DecodedEmail;
use crate::normalize::unwrap_redirect;

/// Generic button/action phrases that are useless as titles.
const BUTTON_PHRASES: &[&str] = &[
    "read more",
    "learn more",
    "more",
    "보기",
    "자세히",
    "더보기",
    "확인",
    "open",
    "click",
    "go",
    "view",
    "continue",
    "신청",
    "구독",
    "수신거부",
    "unsubscribe",
];

/// A snippet-derived title is capped well below the snippet itself.
const FALLBACK_TITLE_MAX: usize = 80;

/// Below this many chars a surrounding snippet is too thin to describe the
/// article; fall back to the whole text body instead.
const MIN_SNIPPET_CHARS: usize = 40;

pub fn extract(email: &DecodedEmail, opts: &ExtractOptions) -> Vec<ArticleCandidate> {
    if email.html_body.trim().is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(&email.html_body);
    let Ok(anchor_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = unwrap_redirect(href.trim()).trim().to_string();

        // Early structural/blocklist reject; the filter chain re-checks the
        // canonical URL later and stays authoritative.
        if url.is_empty() || !filter::is_likely_article_url(&url) {
            continue;
        }

        let own_text = anchor.text().collect::<String>();
        let aria_label = anchor.value().attr("aria-label").unwrap_or("");
        let title_attr = anchor.value().attr("title").unwrap_or("");
        let raw_title = clean_inline_text(&format!("{own_text} {aria_label} {title_attr}"));

        let context = snippet_around_anchor(&anchor, opts.snippet_max_len);
        let title = best_title(&raw_title, &context, &email.subject, opts.min_title_length);
        if char_len(&title) < opts.min_title_length || is_button_text(&title) {
            continue;
        }

        out.push(ArticleCandidate {
            title,
            snippet: build_snippet(&context, &email.text_body, opts.snippet_max_len),
            raw_url: url,
        });
    }
    out
}

/// The longest of the anchor's own text, its parent's, and its grandparent's,
/// truncated. Newsletter cards usually put headline and teaser in siblings of
/// the anchor, so walking up two levels catches the teaser text.
fn snippet_around_anchor(anchor: &ElementRef, max_len: usize) -> String {
    let own = clean_inline_text(&anchor.text().collect::<String>());
    let parent = anchor
        .parent()
        .and_then(ElementRef::wrap)
        .map(|el| clean_inline_text(&el.text().collect::<String>()))
        .unwrap_or_default();
    let grandparent = anchor
        .parent()
        .and_then(|p| p.parent())
        .and_then(ElementRef::wrap)
        .map(|el| clean_inline_text(&el.text().collect::<String>()))
        .unwrap_or_default();

    let mut best = String::new();
    for candidate in [own, parent, grandparent] {
        if char_len(&candidate) > char_len(&best) {
            best = candidate;
        }
    }
    truncate_chars(&best, max_len)
}

/// Title priority: the anchor's own combined text, then the surrounding
/// snippet, then the email subject. A too-short or button-like anchor text is
/// rejected as a title source, not merely truncated.
fn best_title(raw_title: &str, snippet: &str, subject: &str, min_len: usize) -> String {
    if char_len(raw_title) >= min_len && !is_button_text(raw_title) {
        return raw_title.to_string();
    }
    if char_len(snippet) >= min_len {
        return truncate_chars(snippet, FALLBACK_TITLE_MAX);
    }
    clean_inline_text(subject)
}

fn build_snippet(context: &str, text_body: &str, max_len: usize) -> String {
    if char_len(context) >= MIN_SNIPPET_CHARS {
        return truncate_chars(context, max_len);
    }
    truncate_chars(&clean_inline_text(text_body), max_len)
}

pub(crate) fn is_button_text(text: &str) -> bool {
    let folded = text.trim().to_lowercase();
    BUTTON_PHRASES.contains(&folded.as_str())
}
