//! Fallback strategy: scan the plain-text body for URL-shaped substrings.
//!
//! Plain-text digests carry no per-link titles, so every candidate borrows
//! the email subject. Lower information quality, acceptable only because no
//! richer data exists for these messages.

use std::sync::LazyLock;

use linkify::{LinkFinder, LinkKind};
use regex::Regex;

use crate::extract::model::{
    ArticleCandidate, ExtractOptions, char_len, clean_inline_text, truncate_chars,
};
use crate::filter;
use crate::mail::decode::DecodedEmail;
use crate::normalize::unwrap_redirect;

/// Plain-text digests repeat the same footer links endlessly; cap how many
/// candidates one message can contribute.
const MAX_CANDIDATES_PER_MESSAGE: usize = 10;

static BARE_WWW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"www\.[^\s<>"'()]+"#).unwrap());

pub fn extract(email: &DecodedEmail, opts: &ExtractOptions) -> Vec<ArticleCandidate> {
    let text = email.text_body.as_str();
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut urls: Vec<String> = Vec::new();

    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);
    for link in finder.links(text) {
        urls.push(link.as_str().to_string());
    }

    // Bare `www.` hosts the link finder skips; ignore matches that are just
    // the host portion of a scheme'd URL or a subdomain already captured.
    for found in BARE_WWW.find_iter(text) {
        let before = &text[..found.start()];
        if before.ends_with("://") || before.ends_with('.') || before.ends_with('/') {
            continue;
        }
        urls.push(format!("https://{}", found.as_str()));
    }

    // The subject is the only title available on this path; if it is too
    // short to be a valid title, nothing from this message can be either.
    let subject = clean_inline_text(&email.subject);
    if char_len(&subject) < opts.min_title_length {
        return Vec::new();
    }
    let snippet = truncate_chars(&clean_inline_text(text), opts.snippet_max_len);

    urls.into_iter()
        .map(|u| unwrap_redirect(u.trim()).trim().to_string())
        .filter(|u| !u.is_empty())
        .filter(|u| filter::is_likely_article_url(u))
        .take(MAX_CANDIDATES_PER_MESSAGE)
        .map(|raw_url| ArticleCandidate {
            title: subject.clone(),
            snippet: snippet.clone(),
            raw_url,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(text: &str) -> DecodedEmail {
        DecodedEmail {
            subject: "Daily digest: chips and power".to_string(),
            html_body: String::new(),
            text_body: text.to_string(),
        }
    }

    fn opts() -> ExtractOptions {
        ExtractOptions {
            min_title_length: 12,
            snippet_max_len: 320,
        }
    }

    #[test]
    fn finds_scheme_urls_and_titles_them_with_subject() {
        let found = extract(
            &email("Top story: https://example.com/news/2025/chips today."),
            &opts(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_url, "https://example.com/news/2025/chips");
        assert_eq!(found[0].title, "Daily digest: chips and power");
    }

    #[test]
    fn bare_www_urls_get_https_prefixed() {
        let found = extract(&email("see www.example.com/news/story for more"), &opts());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_url, "https://www.example.com/news/story");
    }

    #[test]
    fn www_inside_a_full_url_is_not_double_counted() {
        let found = extract(&email("link: https://www.example.com/news/story"), &opts());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw_url, "https://www.example.com/news/story");
    }

    #[test]
    fn non_article_urls_are_dropped() {
        let found = extract(
            &email("root https://example.com/ and social https://youtube.com/watch?v=1"),
            &opts(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn candidate_count_is_capped() {
        let mut text = String::new();
        for i in 0..30 {
            text.push_str(&format!("https://example.com/news/story-{i}\n"));
        }
        let found = extract(&email(&text), &opts());
        assert_eq!(found.len(), MAX_CANDIDATES_PER_MESSAGE);
    }

    #[test]
    fn short_subject_disqualifies_the_whole_message() {
        let mut mail = email("see https://example.com/news/2025/story");
        mail.subject = "hi".to_string();
        assert!(extract(&mail, &opts()).is_empty());
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(extract(&email("   "), &opts()).is_empty());
    }
}
