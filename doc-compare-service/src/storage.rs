//! In-memory storage for completed comparisons.
//!
//! A comparison session lives from submission until the artifact is
//! downloaded or the session is explicitly reset. Nothing survives a
//! process restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use doc_compare::{CompareOutcome, DocumentCategory};

/// One completed comparison, keyed by session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub id: String,
    pub file1: String,
    pub file2: String,
    pub category: DocumentCategory,
    pub outcome: CompareOutcome,
    pub created_at: DateTime<Utc>,
}

/// Trait for storing and retrieving comparison sessions.
#[async_trait]
pub trait ComparisonStore: Send + Sync {
    async fn save(&self, record: ComparisonRecord) -> anyhow::Result<()>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<ComparisonRecord>>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
}

/// In-memory implementation of ComparisonStore.
pub struct InMemoryComparisonStore {
    records: Arc<DashMap<String, ComparisonRecord>>,
}

impl InMemoryComparisonStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryComparisonStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComparisonStore for InMemoryComparisonStore {
    async fn save(&self, record: ComparisonRecord) -> anyhow::Result<()> {
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<ComparisonRecord>> {
        Ok(self.records.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.records.remove(id);
        Ok(())
    }
}
