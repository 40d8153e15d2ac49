use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::catalog::MajorCatalog;
use super::codec::{self, CodecError};
use super::domain::{now_millis, IndexEntry, Recommendation, ResultId};
use super::engine::RecommendationEngine;
use super::intake::{SubmissionDraft, SubmissionError, SubmissionInput};
use super::scoring::MajorScore;
use super::stats::{summarize, StatsSummary};
use super::store::{IndexUpdate, KeyValueBackend, ResultStore, StoreError};

/// Service composing intake validation, the recommendation engine and the
/// result store.
pub struct AdvisorService<B> {
    catalog: Arc<MajorCatalog>,
    engine: RecommendationEngine,
    store: ResultStore<B>,
}

impl<B> AdvisorService<B>
where
    B: KeyValueBackend + 'static,
{
    pub fn new(catalog: Arc<MajorCatalog>, backend: Arc<B>) -> Self {
        Self::with_engine(catalog, backend, RecommendationEngine::default())
    }

    pub fn with_engine(
        catalog: Arc<MajorCatalog>,
        backend: Arc<B>,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            catalog,
            engine,
            store: ResultStore::new(backend),
        }
    }

    pub fn catalog(&self) -> &MajorCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &ResultStore<B> {
        &self.store
    }

    /// Validate, score and persist a new submission under a fresh id.
    pub fn submit(&self, input: SubmissionInput) -> Result<Recommendation, AdvisorServiceError> {
        self.submit_with(input, ResultId::generate(), now_millis())
    }

    /// Same as [`submit`](Self::submit) with the id and timestamp supplied.
    pub fn submit_with(
        &self,
        input: SubmissionInput,
        id: ResultId,
        created_at: DateTime<Utc>,
    ) -> Result<Recommendation, AdvisorServiceError> {
        let submission = input.into_submission(id, created_at)?;
        let recommendation = self.engine.recommend(&self.catalog, submission);

        let update = self.store.save(&recommendation)?;
        info!(
            result_id = %recommendation.id,
            top = ?recommendation.top.first().map(|entry| entry.major_id.as_str()),
            newly_indexed = update == IndexUpdate::Inserted,
            "recommendation computed"
        );

        Ok(recommendation)
    }

    /// Score without persisting; returns every major with its breakdown.
    pub fn preview(
        &self,
        input: SubmissionInput,
    ) -> Result<Vec<MajorScore>, AdvisorServiceError> {
        let submission = input.into_submission(ResultId::generate(), now_millis())?;
        Ok(self.engine.breakdown(&self.catalog, &submission))
    }

    pub fn get(&self, id: &ResultId) -> Option<Recommendation> {
        self.store.get(id)
    }

    /// Share token for a stored result, `None` when the id is unknown.
    pub fn share_token(&self, id: &ResultId) -> Result<Option<String>, AdvisorServiceError> {
        match self.store.get(id) {
            Some(recommendation) => Ok(Some(codec::encode(&recommendation)?)),
            None => Ok(None),
        }
    }

    /// Resolves a result the way a shared link does: a valid token wins,
    /// otherwise the store is consulted by id.
    ///
    /// When both are given, a token describing a different result is ignored.
    pub fn resolve(&self, id: Option<&ResultId>, token: Option<&str>) -> Option<Recommendation> {
        if let Some(decoded) = token.and_then(codec::decode) {
            match id {
                Some(id) if &decoded.id != id => {
                    debug!(result_id = %id, token_id = %decoded.id, "token names another result");
                }
                _ => return Some(decoded),
            }
        }
        id.and_then(|id| self.store.get(id))
    }

    pub fn index(&self) -> Vec<IndexEntry> {
        self.store.index()
    }

    pub fn search(&self, query: &str) -> Vec<IndexEntry> {
        self.store.search(query)
    }

    pub fn stats(&self, now: DateTime<Utc>) -> StatsSummary {
        summarize(&self.store.index(), &self.catalog, now)
    }

    pub fn save_draft(&self, draft: &SubmissionDraft) -> Result<(), AdvisorServiceError> {
        self.store.save_draft(draft)?;
        Ok(())
    }

    pub fn load_draft(&self) -> Option<SubmissionDraft> {
        self.store.load_draft()
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
