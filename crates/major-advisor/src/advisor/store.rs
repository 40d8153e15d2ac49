use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::domain::{IndexEntry, Recommendation, ResultId};
use super::intake::SubmissionDraft;

pub const RESULT_KEY_PREFIX: &str = "advisor_result_";
pub const INDEX_KEY: &str = "advisor_results_index";
pub const DRAFT_KEY: &str = "advisor_current";

/// Minimal string key-value storage the result store is written against.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Whether a save added a new listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdate {
    Inserted,
    AlreadyIndexed,
}

/// Persists recommendations by id and keeps a most-recent-first listing.
///
/// Reads never fail outward: a missing, unreadable or corrupt record is
/// reported as absent.
///
/// Clones share the index lock, so saves through any clone never interleave
/// their index updates.
pub struct ResultStore<B> {
    backend: Arc<B>,
    index_lock: Arc<Mutex<()>>,
}

impl<B> Clone for ResultStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            index_lock: Arc::clone(&self.index_lock),
        }
    }
}

impl<B: KeyValueBackend> ResultStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            index_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Writes the full record, then prepends it to the index unless the id is
    /// already listed. An existing index entry is never replaced.
    pub fn save(&self, recommendation: &Recommendation) -> Result<IndexUpdate, StoreError> {
        let key = result_key(&recommendation.id);
        self.write_json(&key, recommendation)?;

        // held until the rewritten index is stored
        let _guard = self
            .index_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut index = self.index();
        if index.iter().any(|entry| entry.id == recommendation.id) {
            debug!(result_id = %recommendation.id, "result already indexed");
            return Ok(IndexUpdate::AlreadyIndexed);
        }

        index.insert(0, recommendation.index_entry());
        self.write_json(INDEX_KEY, &index)?;
        Ok(IndexUpdate::Inserted)
    }

    pub fn get(&self, id: &ResultId) -> Option<Recommendation> {
        let recommendation: Recommendation = self.read_json(&result_key(id))?;
        if let Some(defect) = recommendation.structural_defect() {
            warn!(result_id = %id, defect, "ignoring inconsistent stored result");
            return None;
        }
        if &recommendation.id != id {
            warn!(result_id = %id, "stored result carries a different id");
            return None;
        }
        Some(recommendation)
    }

    /// Listing of saved results, newest first. A corrupt index reads as empty.
    pub fn index(&self) -> Vec<IndexEntry> {
        self.read_json(INDEX_KEY).unwrap_or_default()
    }

    /// Index entries whose name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<IndexEntry> {
        let needle = query.trim().to_lowercase();
        let index = self.index();
        if needle.is_empty() {
            return index;
        }
        index
            .into_iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn save_draft(&self, draft: &SubmissionDraft) -> Result<(), StoreError> {
        self.write_json(DRAFT_KEY, draft)
    }

    pub fn load_draft(&self) -> Option<SubmissionDraft> {
        self.read_json(DRAFT_KEY)
    }

    fn write_json<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &raw)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, %err, "storage read failed; treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "stored value is corrupt; treating as absent");
                None
            }
        }
    }
}

pub fn result_key(id: &ResultId) -> String {
    format!("{RESULT_KEY_PREFIX}{}", id.0)
}
