//! Cross-message deduplication by canonical URL.

use std::collections::HashMap;

use crate::extract::NormalizedArticle;
use crate::extract::model::char_len;

/// Merge articles sharing a canonical URL, keeping the most informative one.
/// `2 * title + snippet` is a cheap proxy for information content; ties keep
/// the first candidate encountered, and first-encounter order is preserved
/// so the later stable sort has a deterministic input.
pub fn dedupe_by_canonical_url(articles: Vec<NormalizedArticle>) -> Vec<NormalizedArticle> {
    let mut out: Vec<NormalizedArticle> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for article in articles {
        match index.get(&article.canonical_url) {
            Some(&slot) => {
                if informativeness(&article) > informativeness(&out[slot]) {
                    out[slot] = article;
                }
            }
            None => {
                index.insert(article.canonical_url.clone(), out.len());
                out.push(article);
            }
        }
    }
    out
}

fn informativeness(article: &NormalizedArticle) -> usize {
    2 * char_len(&article.title) + char_len(&article.snippet)
}
