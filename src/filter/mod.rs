//! Candidate filtering.
//!
//! Newsletter HTML is mostly chrome: unsubscribe links, account settings,
//! social buttons, search pages. The chain keeps a candidate only when its
//! canonical URL survives every predicate below. Rejections are silent.

use url::Url;

/// Video/social destinations that are never single articles. Subdomains are
/// blocked along with the apex.
const BLOCKED_DOMAINS: &[&str] = &[
    "tiktok.com",
    "youtube.com",
    "youtu.be",
    "instagram.com",
    "facebook.com",
    "x.com",
    "twitter.com",
    "threads.net",
    "reddit.com",
    "discord.com",
    "discord.gg",
    "t.me",
];

/// Substrings marking provider-internal and list-management links.
const BLOCKED_URL_KEYWORDS: &[&str] = &[
    "google.com/alerts",
    "unsubscribe",
    "preferences",
    "accounts.google",
    "support.google",
    "policies.google",
    "myaccount.google",
    "mail.google.com",
];

/// Search and aggregator result pages: a listing, not an article.
const SEARCH_PAGE_PATTERNS: &[&str] = &[
    "google.com/search",
    "news.google.com/search",
    "search.naver.com",
    "m.search.naver.com",
    "media.naver.com/press",
    "vertexaisearch.cloud.google.com",
];

pub fn is_blocked_domain(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.strip_prefix("www.").unwrap_or(host).to_ascii_lowercase();

    BLOCKED_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

pub fn is_blocked_keyword(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    BLOCKED_URL_KEYWORDS.iter().any(|k| lower.contains(k))
}

pub fn is_search_page(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SEARCH_PAGE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Structural test: does this even look like a link to a single article?
/// Scheme must be http(s), the host must have a dot, and the path must be
/// more than a bare `/`.
pub fn is_likely_article_url(url: &str) -> bool {
    if url.is_empty() || is_blocked_domain(url) || is_blocked_keyword(url) || is_search_page(url) {
        return false;
    }

    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if !host.contains('.') {
        return false;
    }

    let path = parsed.path();
    !path.is_empty() && path != "/" && path.len() >= 2
}

/// The full chain over a canonical URL.
pub fn keep(canonical_url: &str) -> bool {
    !is_blocked_domain(canonical_url)
        && !is_blocked_keyword(canonical_url)
        && !is_search_page(canonical_url)
        && is_likely_article_url(canonical_url)
}
