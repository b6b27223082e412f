//! Article candidate extraction.
//!
//! Strategies are an explicit ordered cascade: each one returns a (possibly
//! empty) candidate list instead of erroring, and the first non-empty result
//! wins. HTML parsing runs first; plain-text URL scanning only gets a look
//! when the HTML yields nothing.

pub mod html;
pub mod model;
pub mod text;

#[cfg(test)]
mod tests;

pub use model::{ArticleCandidate, ExtractOptions, NormalizedArticle};

use crate::mail::decode::DecodedEmail;

type Strategy = fn(&DecodedEmail, &ExtractOptions) -> Vec<ArticleCandidate>;

const STRATEGIES: [Strategy; 2] = [html::extract, text::extract];

pub fn extract(email: &DecodedEmail, opts: &ExtractOptions) -> Vec<ArticleCandidate> {
    for strategy in STRATEGIES {
        let found = strategy(email, opts);
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}
