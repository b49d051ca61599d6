use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::local::LocalHistory;
use super::record::{RecordId, StudyRecord};
use crate::backend::StudyBackend;
use crate::error::{StudyError, StudyResult};
use crate::session::Session;

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select items to delete.";
const EMPTY_SAVE_MESSAGE: &str = "Please enter English text!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    Remote,
    Local,
}

/// One listing of the history. Each `list` call returns a fresh view; callers
/// replace whatever they held before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryView {
    pub records: Vec<StudyRecord>,
    pub source: HistorySource,
}

impl HistoryView {
    pub fn get(&self, id: &RecordId) -> Option<&StudyRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub source: HistorySource,
    /// `None` when the backend did not report the new id.
    pub id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteOutcome {
    pub deleted: usize,
    /// History as it stands after the delete.
    pub view: HistoryView,
}

/// Routes history operations to the account (authenticated) or to the device (guest).
pub struct HistoryStore {
    backend: Arc<dyn StudyBackend>,
    local: LocalHistory,
}

impl HistoryStore {
    pub fn new(backend: Arc<dyn StudyBackend>, local: LocalHistory) -> Self {
        Self { backend, local }
    }

    pub fn local(&self) -> &LocalHistory {
        &self.local
    }

    /// Authenticated saves go to the account only; a failure is reported, never
    /// duplicated locally.
    pub async fn save(
        &self,
        session: &Session,
        text: &str,
        translation: &str,
    ) -> StudyResult<SaveOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyError::Validation(EMPTY_SAVE_MESSAGE.to_string()));
        }

        match session.token() {
            Some(token) => {
                let id = self
                    .backend
                    .save_study_record(token, text, translation)
                    .await
                    .map_err(|e| {
                        tracing::error!("[History] Remote save failed: {}", e);
                        e
                    })?;
                tracing::info!("[History] Saved to account of {}", session.display_name());
                Ok(SaveOutcome {
                    source: HistorySource::Remote,
                    id,
                })
            }
            None => {
                let record = self.local.insert(text, translation)?;
                tracing::info!("[History] Saved locally as {}", record.id);
                Ok(SaveOutcome {
                    source: HistorySource::Local,
                    id: Some(record.id),
                })
            }
        }
    }

    /// Remote history when signed in and reachable, local history otherwise.
    pub async fn list(&self, session: &Session) -> StudyResult<HistoryView> {
        if let Some(token) = session.token() {
            match self.backend.list_study_history(token).await {
                Ok(records) => {
                    tracing::info!("[History] Loaded {} item(s) from account", records.len());
                    return Ok(HistoryView {
                        records,
                        source: HistorySource::Remote,
                    });
                }
                Err(e) => {
                    tracing::warn!("[History] Account history unavailable, using local: {}", e);
                }
            }
        }

        let records = self.local.load()?;
        tracing::info!("[History] Loaded {} item(s) from local storage", records.len());
        Ok(HistoryView {
            records,
            source: HistorySource::Local,
        })
    }

    pub async fn delete_selected(
        &self,
        session: &Session,
        ids: &[RecordId],
    ) -> StudyResult<DeleteOutcome> {
        if ids.is_empty() {
            return Err(StudyError::Validation(EMPTY_SELECTION_MESSAGE.to_string()));
        }

        let deleted = match session.token() {
            Some(token) => self.backend.delete_study_records(token, ids).await?,
            None => self.local.remove(ids)?,
        };
        tracing::info!("[History] Deleted {} selected record(s)", deleted);

        Ok(DeleteOutcome {
            deleted,
            view: self.refreshed(session).await,
        })
    }

    pub async fn delete_all(&self, session: &Session) -> StudyResult<DeleteOutcome> {
        let deleted = match session.token() {
            Some(token) => self.backend.delete_all_study_records(token).await?,
            None => self.local.clear()?,
        };
        tracing::info!("[History] Deleted all {} record(s)", deleted);

        Ok(DeleteOutcome {
            deleted,
            view: self.refreshed(session).await,
        })
    }

    /// Listing after a completed delete. The delete already happened, so a
    /// failed refresh yields an empty view instead of an error.
    async fn refreshed(&self, session: &Session) -> HistoryView {
        match self.list(session).await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!("[History] Refresh after delete failed: {}", e);
                HistoryView {
                    records: Vec::new(),
                    source: if session.is_authenticated() {
                        HistorySource::Remote
                    } else {
                        HistorySource::Local
                    },
                }
            }
        }
    }

    /// Look `id` up in the caller's current view, then in local storage.
    pub fn find(&self, view: Option<&HistoryView>, id: &RecordId) -> StudyResult<Option<StudyRecord>> {
        if let Some(record) = view.and_then(|v| v.get(id)) {
            return Ok(Some(record.clone()));
        }
        self.local.find(id)
    }
}
