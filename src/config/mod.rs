//! Pipeline configuration.
//!
//! The config lives as a JSON blob in the key-value store under its own key,
//! the same contract the seen-cache uses. It is read once at the start of a
//! run and never mutated during one. Missing fields fall back to defaults so
//! old blobs keep working when new knobs are added.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::KeyValueStore;

pub const CONFIG_STORAGE_KEY: &str = "newsbrief_pipeline_config_v1";

/// Hard ceilings applied regardless of what the stored blob says.
pub const MAX_MESSAGES_CEILING: usize = 30;
pub const MAX_ITEMS_CEILING: usize = 100;

const DEFAULT_LABEL_NAME: &str = "뉴스요약";
const DEFAULT_FALLBACK_QUERY: &str = "newer_than:14d (from:googlealerts-noreply@google.com \
     OR from:googlealerts-noreply OR subject:\"Google 알림\" OR subject:\"Google Alerts\")";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Preferred inbox label; falls back to `fallback_query` when absent.
    pub label_name: String,
    /// Provider search query used when the label cannot be resolved.
    pub fallback_query: String,
    pub max_messages_to_read: usize,
    pub max_items_to_return: usize,
    pub seen_ttl_days: u32,
    /// Minimum title length in chars, not bytes.
    pub min_title_length: usize,
    pub snippet_max_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label_name: DEFAULT_LABEL_NAME.to_string(),
            fallback_query: DEFAULT_FALLBACK_QUERY.to_string(),
            max_messages_to_read: 8,
            max_items_to_return: 30,
            seen_ttl_days: 7,
            min_title_length: 12,
            snippet_max_len: 320,
        }
    }
}

impl PipelineConfig {
    /// Load from the store, merging defaults for missing fields. A missing
    /// or unparseable blob yields the defaults; this never fails.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(CONFIG_STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("config load failed, using defaults: {err:#}");
                None
            }
        };

        let config = raw
            .and_then(|raw| match serde_json::from_str::<Self>(&raw) {
                Ok(config) => Some(config),
                Err(err) => {
                    warn!("config blob unparseable, using defaults: {err}");
                    None
                }
            })
            .unwrap_or_default();

        config.clamped()
    }

    pub async fn save(&self, store: &dyn KeyValueStore) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&self.clone().clamped())?;
        store.set(CONFIG_STORAGE_KEY, &raw).await
    }

    fn clamped(mut self) -> Self {
        self.max_messages_to_read = self.max_messages_to_read.clamp(1, MAX_MESSAGES_CEILING);
        self.max_items_to_return = self.max_items_to_return.clamp(1, MAX_ITEMS_CEILING);
        self.seen_ttl_days = self.seen_ttl_days.max(1);
        self
    }
}
