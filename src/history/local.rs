use chrono::Utc;
use std::sync::Arc;

use super::record::{RecordId, StudyRecord};
use crate::error::{StudyError, StudyResult};
use crate::storage::{KeyValueStore, HISTORY_KEY};

/// Newest-first history list kept in the local key-value store as one JSON blob.
#[derive(Clone)]
pub struct LocalHistory {
    store: Arc<dyn KeyValueStore>,
    limit: usize,
}

impl LocalHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            store,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn load(&self) -> StudyResult<Vec<StudyRecord>> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("[History] Local history is unreadable: {}", e);
                StudyError::Persistence(format!("local history is unreadable: {}", e))
            }),
            _ => Ok(Vec::new()),
        }
    }

    fn persist(&self, records: &[StudyRecord]) -> StudyResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// Prepend a new record, evicting the oldest beyond the limit.
    pub fn insert(&self, text: &str, translation: &str) -> StudyResult<StudyRecord> {
        self.insert_at(Utc::now().timestamp_millis(), text, translation)
    }

    pub(crate) fn insert_at(
        &self,
        now_ms: i64,
        text: &str,
        translation: &str,
    ) -> StudyResult<StudyRecord> {
        let mut records = self.load()?;
        let newest = records.iter().filter_map(|r| r.id.as_timestamp()).max();
        let id = match newest {
            Some(newest) if now_ms <= newest => newest + 1,
            _ => now_ms,
        };

        let record = StudyRecord::local(id, text, translation);
        records.insert(0, record.clone());
        if records.len() > self.limit {
            let evicted = records.len() - self.limit;
            records.truncate(self.limit);
            tracing::debug!("[History] Evicted {} oldest local record(s)", evicted);
        }
        self.persist(&records)?;
        Ok(record)
    }

    /// Remove every record whose id matches one of `ids`. Returns how many went.
    pub fn remove(&self, ids: &[RecordId]) -> StudyResult<usize> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        let removed = before - records.len();
        if removed > 0 {
            self.persist(&records)?;
        }
        Ok(removed)
    }

    pub fn clear(&self) -> StudyResult<usize> {
        let removed = self.load()?.len();
        self.store.remove(HISTORY_KEY)?;
        Ok(removed)
    }

    pub fn find(&self, id: &RecordId) -> StudyResult<Option<StudyRecord>> {
        Ok(self.load()?.into_iter().find(|r| &r.id == id))
    }
}
