//! Key-value persistence used for the pipeline config and the seen-URL blob.
//!
//! The pipeline never touches a concrete backend directly; it goes through
//! the [`KeyValueStore`] trait so tests can run against [`MemoryStore`] and
//! the CLI against [`FileStore`].

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON file holding a `key -> value` map.
///
/// Reads tolerate a missing or corrupt file (treated as empty); writes
/// rewrite the whole map. Good enough for a single-process CLI.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> HashMap<String, String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map().await.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map().await;
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(&map)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
