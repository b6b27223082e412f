//! Relevance scoring and ranking.
//!
//! Every term is additive, so the score stays explainable: a long title on a
//! trusted publisher with an article-shaped path beats a short button caption
//! on an unknown host by construction.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::extract::NormalizedArticle;
use crate::extract::model::char_len;

/// Wire-service and major-publisher domains; a hit outranks any length term.
const STRONG_DOMAINS: &[&str] = &[
    "reuters.com",
    "bloomberg.com",
    "wsj.com",
    "ft.com",
    "economist.com",
    "nytimes.com",
    "bbc.co.uk",
    "bbc.com",
    "cnn.com",
    "apnews.com",
    "khan.co.kr",
    "chosun.com",
    "joongang.co.kr",
    "donga.com",
    "hani.co.kr",
    "mk.co.kr",
    "hankyung.com",
    "yonhapnews.co.kr",
];

/// Portals and blogging platforms: plausible sources, weaker provenance.
const MEDIUM_DOMAINS: &[&str] = &["naver.com", "daum.net", "medium.com", "substack.com", "brunch.co.kr"];

const STRONG_DOMAIN_BONUS: f64 = 18.0;
const MEDIUM_DOMAIN_BONUS: f64 = 8.0;
const KEYWORD_HINT_BONUS: f64 = 8.0;

static ARTICLE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(news|article|story|stories|press|post)").unwrap());
static YEAR_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"20\d{2}").unwrap());

/// Score every article and sort descending. The sort is stable, so equal
/// scores keep their input (first-encounter) order.
pub fn score_and_rank(
    mut articles: Vec<NormalizedArticle>,
    keyword_hint: &str,
) -> Vec<NormalizedArticle> {
    for article in &mut articles {
        article.score = score_article(article, keyword_hint);
    }
    articles.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    articles
}

pub fn score_article(article: &NormalizedArticle, keyword_hint: &str) -> f64 {
    let mut score = 0.0;

    score += char_len(&article.title).clamp(0, 120) as f64 * 0.4;
    score += char_len(&article.snippet).clamp(0, 300) as f64 * 0.2;
    score += domain_trust(&article.host);

    let hint = keyword_hint.trim().to_lowercase();
    if !hint.is_empty() && article.title.to_lowercase().contains(&hint) {
        score += KEYWORD_HINT_BONUS;
    }

    score + url_shape(&article.canonical_url)
}

fn domain_trust(host: &str) -> f64 {
    let host = host.to_ascii_lowercase();
    if STRONG_DOMAINS.iter().any(|d| host.ends_with(d)) {
        return STRONG_DOMAIN_BONUS;
    }
    if MEDIUM_DOMAINS.iter().any(|d| host.ends_with(d)) {
        return MEDIUM_DOMAIN_BONUS;
    }
    0.0
}

/// Small bonuses for article-shaped paths: a news-ish segment, a year, and
/// some real path depth.
fn url_shape(url: &str) -> f64 {
    let Ok(parsed) = Url::parse(url) else {
        return 0.0;
    };
    let path = parsed.path();

    let mut bonus = 0.0;
    if ARTICLE_SEGMENT.is_match(path) {
        bonus += 6.0;
    }
    if YEAR_SEGMENT.is_match(path) {
        bonus += 4.0;
    }
    if path.split('/').filter(|s| !s.is_empty()).count() >= 3 {
        bonus += 3.0;
    }
    bonus
}
