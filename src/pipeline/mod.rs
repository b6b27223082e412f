//! Pipeline orchestrator.
//!
//! One call wires the whole flow: resolve label → list ids → fan-out fetch →
//! decode → extract → normalize → dedupe → filter → seen-filter → score →
//! truncate → mark-seen. Data flows strictly left to right; the seen-cache
//! is the only state that outlives a run.

pub mod errors;

pub use errors::PipelineError;

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use crate::config::{self, PipelineConfig};
use crate::dedupe::dedupe_by_canonical_url;
use crate::extract::model::clean_inline_text;
use crate::extract::{self, ExtractOptions, NormalizedArticle};
use crate::filter;
use crate::mail::decode::decode_email;
use crate::mail::label::resolve_label_id;
use crate::mail::{ListCriteria, MailSource, RawMessage};
use crate::normalize::{normalize_url, safe_hostname};
use crate::score;
use crate::seen::SeenCache;
use crate::storage::KeyValueStore;

/// Per-run overrides on top of the persisted config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub label_name: Option<String>,
    pub query_override: Option<String>,
    /// When false, the seen-cache is neither consulted nor updated.
    pub exclude_seen: bool,
    pub max_messages_to_read: Option<usize>,
    pub max_items_to_return: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            label_name: None,
            query_override: None,
            exclude_seen: true,
            max_messages_to_read: None,
            max_items_to_return: None,
        }
    }
}

pub struct Pipeline {
    mail: Arc<dyn MailSource>,
    store: Arc<dyn KeyValueStore>,
}

impl Pipeline {
    pub fn new(mail: Arc<dyn MailSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { mail, store }
    }

    /// Run the pipeline once. An empty result is a valid outcome; only an
    /// auth failure or an empty message listing is an error.
    #[instrument(skip_all)]
    pub async fn run(&self, opts: RunOptions) -> Result<Vec<NormalizedArticle>, PipelineError> {
        let config = PipelineConfig::load(self.store.as_ref()).await;

        let label_name = opts
            .label_name
            .unwrap_or_else(|| config.label_name.clone())
            .trim()
            .to_string();
        let fallback_query = opts
            .query_override
            .unwrap_or_else(|| config.fallback_query.clone())
            .trim()
            .to_string();
        let max_messages = opts
            .max_messages_to_read
            .unwrap_or(config.max_messages_to_read)
            .clamp(1, config::MAX_MESSAGES_CEILING);
        let max_items = opts
            .max_items_to_return
            .unwrap_or(config.max_items_to_return)
            .clamp(1, config::MAX_ITEMS_CEILING);

        // An auth failure here would fail every later call too, so it is
        // fatal; any other label-listing failure degrades to the fallback
        // query.
        let label_id = match self.mail.list_labels().await {
            Ok(labels) => resolve_label_id(&labels, &label_name),
            Err(err) if err.is_auth() => return Err(PipelineError::from_mail(err)),
            Err(err) => {
                warn!("label listing failed, falling back to query: {err}");
                None
            }
        };

        let criteria = match &label_id {
            Some(id) => ListCriteria::for_label(id.clone(), max_messages),
            None => ListCriteria::for_query(fallback_query.clone(), max_messages),
        };

        let ids = self
            .mail
            .list_message_ids(criteria)
            .await
            .map_err(PipelineError::from_mail)?;
        if ids.is_empty() {
            return Err(PipelineError::NoMatchingMessages);
        }

        let messages = self.fetch_all(ids).await?;

        // Pool candidates across every message so deduplication is global.
        let extract_opts = ExtractOptions {
            min_title_length: config.min_title_length,
            snippet_max_len: config.snippet_max_len,
        };
        let mut candidates = Vec::new();
        for message in &messages {
            let email = decode_email(message);
            candidates.extend(extract::extract(&email, &extract_opts));
        }
        info!(
            messages = messages.len(),
            candidates = candidates.len(),
            "extraction complete"
        );

        let mut normalized = Vec::new();
        for candidate in candidates {
            let canonical_url = normalize_url(&candidate.raw_url);
            if canonical_url.is_empty() {
                continue;
            }
            let host = safe_hostname(&canonical_url).unwrap_or_default();
            normalized.push(NormalizedArticle {
                title: clean_inline_text(&candidate.title),
                canonical_url,
                host,
                snippet: clean_inline_text(&candidate.snippet),
                score: 0.0,
            });
        }

        let deduped = dedupe_by_canonical_url(normalized);
        let filtered: Vec<NormalizedArticle> = deduped
            .into_iter()
            .filter(|a| filter::keep(&a.canonical_url))
            .collect();

        let now = Utc::now();
        let mut seen = if opts.exclude_seen {
            Some(SeenCache::load(self.store.as_ref(), now).await)
        } else {
            None
        };
        let unseen: Vec<NormalizedArticle> = match &seen {
            Some(cache) => filtered
                .into_iter()
                .filter(|a| !cache.is_seen(&a.canonical_url))
                .collect(),
            None => filtered,
        };

        let mut ranked = score::score_and_rank(unseen, &label_name);
        ranked.truncate(max_items);

        // Only the truncated set counts as surfaced.
        if let Some(cache) = seen.as_mut() {
            cache
                .mark_seen(
                    self.store.as_ref(),
                    ranked.iter().map(|a| a.canonical_url.as_str()),
                    config.seen_ttl_days,
                    now,
                )
                .await;
        }

        info!(returned = ranked.len(), "pipeline run complete");
        Ok(ranked)
    }

    /// Fan-out fetch, joined in full before extraction begins. A failed
    /// fetch is logged and skipped so one bad message cannot void an
    /// otherwise-successful run; results keep the listing order.
    async fn fetch_all(&self, ids: Vec<String>) -> Result<Vec<RawMessage>, PipelineError> {
        let mut set = JoinSet::new();
        let count = ids.len();
        for (slot, id) in ids.into_iter().enumerate() {
            let mail = Arc::clone(&self.mail);
            set.spawn(async move {
                let result = mail.get_message(&id).await;
                (slot, id, result)
            });
        }

        let mut slots: Vec<Option<RawMessage>> = vec![None; count];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((slot, _id, Ok(message))) => slots[slot] = Some(message),
                Ok((_slot, id, Err(err))) => {
                    warn!("skipping message {id}: fetch failed: {err}");
                }
                Err(err) => {
                    return Err(PipelineError::Internal(anyhow::anyhow!(
                        "message fetch task failed: {err}"
                    )));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
