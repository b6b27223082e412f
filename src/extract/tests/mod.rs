use std::fs;

use crate::extract;
use crate::extract::model::ExtractOptions;
use crate::mail::decode::DecodedEmail;

fn opts() -> ExtractOptions {
    ExtractOptions {
        min_title_length: 12,
        snippet_max_len: 320,
    }
}

fn alert_email() -> DecodedEmail {
    let html = fs::read_to_string("src/extract/tests/fixtures/alert_newsletter.html")
        .expect("failed to read test fixture");
    DecodedEmail {
        subject: "Google Alert - semiconductors".to_string(),
        html_body: html,
        text_body: String::new(),
    }
}

#[test]
fn extracts_real_articles_from_alert_newsletter() {
    let found = extract::extract(&alert_email(), &opts());

    assert_eq!(found.len(), 2, "found: {found:#?}");

    // First story: anchor text is the headline; the wrapped redirect is
    // unwrapped to the true destination.
    assert_eq!(
        found[0].title,
        "Chip export rules tighten as fabs race to expand capacity"
    );
    assert_eq!(
        found[0].raw_url,
        "https://example.com/news/2025/chip-exports?utm_source=alert"
    );

    // Second story: "Read more" is rejected as a title source and the
    // surrounding card text takes over.
    assert!(found[1].title.starts_with("Memory prices rebounded"));
    assert_eq!(
        found[1].raw_url,
        "https://publisher.example.org/story/2025/memory-prices?utm_campaign=alerts"
    );
}

#[test]
fn blocked_and_system_links_never_become_candidates() {
    let found = extract::extract(&alert_email(), &opts());
    for candidate in &found {
        assert!(!candidate.raw_url.contains("youtube.com"), "{candidate:?}");
        assert!(
            !candidate.raw_url.contains("google.com/alerts"),
            "{candidate:?}"
        );
    }
}

#[test]
fn html_strategy_wins_over_text_when_it_yields() {
    let mut email = alert_email();
    email.text_body = "unrelated https://other.example.com/news/plain-text-story".to_string();

    let found = extract::extract(&email, &opts());
    assert!(
        found
            .iter()
            .all(|c| !c.raw_url.contains("plain-text-story"))
    );
}

#[test]
fn text_strategy_is_used_when_html_yields_nothing() {
    let email = DecodedEmail {
        subject: "Weekly roundup of chip news".to_string(),
        html_body: "<html><body><p>no links here</p></body></html>".to_string(),
        text_body: "story: https://example.com/news/2025/fab-expansion".to_string(),
    };

    let found = extract::extract(&email, &opts());
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].raw_url, "https://example.com/news/2025/fab-expansion");
    assert_eq!(found[0].title, "Weekly roundup of chip news");
}

#[test]
fn linkless_email_yields_nothing() {
    let email = DecodedEmail {
        subject: "An update with no links".to_string(),
        html_body: "<html><body><p>Plain prose, nothing to click.</p></body></html>".to_string(),
        text_body: "Plain prose, nothing to click.".to_string(),
    };

    assert!(extract::extract(&email, &opts()).is_empty());
}
