//! Time-boxed record of canonical URLs already surfaced.
//!
//! The cache is an explicit repository client over the injected
//! [`KeyValueStore`]: loaded (and pruned) once at the start of a run, written
//! once at the very end for the final truncated result set only. Time is a
//! parameter everywhere so expiry behavior is testable.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::storage::KeyValueStore;

pub const SEEN_STORAGE_KEY: &str = "newsbrief_seen_article_urls_v1";

/// `canonical_url -> expires_at` in epoch milliseconds. An entry at or past
/// its expiry is treated as absent and pruned at load.
#[derive(Debug, Default)]
pub struct SeenCache {
    entries: HashMap<String, i64>,
}

impl SeenCache {
    /// Load the blob, dropping expired entries. The pruned map is persisted
    /// back immediately so the blob never grows without bound. Storage and
    /// parse failures degrade to an empty cache; they never fail the run.
    pub async fn load(store: &dyn KeyValueStore, now: DateTime<Utc>) -> Self {
        let raw = match store.get(SEEN_STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("seen-cache load failed, starting empty: {err:#}");
                None
            }
        };

        let mut entries: HashMap<String, i64> = raw
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        let now_ms = now.timestamp_millis();
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now_ms);

        let cache = Self { entries };
        if before != cache.entries.len() {
            cache.persist(store).await;
        }
        cache
    }

    pub fn is_seen(&self, canonical_url: &str) -> bool {
        self.entries.contains_key(canonical_url.trim())
    }

    /// Record the given URLs as seen until `now + ttl_days`, refreshing any
    /// existing entries, and persist.
    pub async fn mark_seen<'a>(
        &mut self,
        store: &dyn KeyValueStore,
        canonical_urls: impl IntoIterator<Item = &'a str>,
        ttl_days: u32,
        now: DateTime<Utc>,
    ) {
        let ttl = Duration::days(i64::from(ttl_days.max(1)));
        let expires_at = (now + ttl).timestamp_millis();

        let mut changed = false;
        for url in canonical_urls {
            let key = url.trim();
            if key.is_empty() {
                continue;
            }
            self.entries.insert(key.to_string(), expires_at);
            changed = true;
        }

        if changed {
            self.persist(store).await;
        }
    }

    /// A lost write degrades to a repeated article next run, never to a
    /// failed run.
    async fn persist(&self, store: &dyn KeyValueStore) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("seen-cache serialize failed: {err}");
                return;
            }
        };
        if let Err(err) = store.set(SEEN_STORAGE_KEY, &raw).await {
            warn!("seen-cache persist failed: {err:#}");
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
