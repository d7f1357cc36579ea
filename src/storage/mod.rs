//! Local persistence: uploaded resumes and analysis records

pub mod files;
pub mod kv;

pub use files::{FileStore, StoredFile};
pub use kv::{FileKvStore, KvStore};

use crate::error::{FeedbackError, Result};
use crate::record::{record_key, AnalysisRecord};
use log::warn;
use uuid::Uuid;

const RECORD_PREFIX: &str = "resume:";

/// Typed access to analysis records kept in a [`KvStore`]
pub struct RecordStore<K> {
    kv: K,
}

impl<K: KvStore> RecordStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub async fn save(&self, record: &AnalysisRecord) -> Result<()> {
        let value = serde_json::to_string(record)?;
        self.kv.set(&record.key(), &value).await
    }

    pub async fn load(&self, id: &Uuid) -> Result<AnalysisRecord> {
        let key = record_key(id);
        let value = self
            .kv
            .get(&key)
            .await?
            .ok_or_else(|| FeedbackError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(&value)?)
    }

    /// All readable records, newest first. Corrupt entries are skipped.
    pub async fn list(&self) -> Result<Vec<AnalysisRecord>> {
        let mut records = Vec::new();
        for key in self.kv.list(RECORD_PREFIX).await? {
            let Some(value) = self.kv.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<AnalysisRecord>(&value) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable record {}: {}", key, e),
            }
        }
        records.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(records)
    }

    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        self.kv.delete(&record_key(id)).await
    }

    /// Remove a record and return it; an unreadable record is removed and
    /// reported as `None`
    pub async fn take(&self, id: &Uuid) -> Result<Option<AnalysisRecord>> {
        let record = match self.load(id).await {
            Ok(record) => Some(record),
            Err(FeedbackError::Serialization(e)) => {
                warn!("Removing unreadable record {}: {}", record_key(id), e);
                None
            }
            Err(e) => return Err(e),
        };
        self.delete(id).await?;
        Ok(record)
    }
}

/// Accepts a full id, a `resume:<id>` key, or a unique prefix of a stored id
pub async fn resolve_id<K: KvStore>(store: &RecordStore<K>, input: &str) -> Result<Uuid> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix(RECORD_PREFIX).unwrap_or(trimmed);
    if let Ok(id) = Uuid::parse_str(trimmed) {
        return Ok(id);
    }

    let matches: Vec<Uuid> = store
        .kv()
        .list(&format!("{}{}", RECORD_PREFIX, trimmed))
        .await?
        .iter()
        .filter_map(|key| key.strip_prefix(RECORD_PREFIX))
        .filter_map(|id| Uuid::parse_str(id).ok())
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(FeedbackError::NotFound(trimmed.to_string())),
        _ => Err(FeedbackError::InvalidInput(format!(
            "Id prefix '{}' is ambiguous ({} matches)",
            trimmed,
            matches.len()
        ))),
    }
}
