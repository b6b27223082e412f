//! Label name resolution.
//!
//! Matching is deliberately conservative: exact match ignoring whitespace and
//! case, then a prefix match, then nothing. A substring pass would happily
//! bind "news" to "old newsletters archive", so it is not attempted; callers
//! fall back to a search query instead.

use crate::mail::Label;

pub fn resolve_label_id(labels: &[Label], name: &str) -> Option<String> {
    let target = fold_label(name);
    if target.is_empty() {
        return None;
    }

    if let Some(label) = labels.iter().find(|l| fold_label(&l.name) == target) {
        return Some(label.id.clone());
    }

    labels
        .iter()
        .find(|l| fold_label(&l.name).starts_with(&target))
        .map(|l| l.id.clone())
}

fn fold_label(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
