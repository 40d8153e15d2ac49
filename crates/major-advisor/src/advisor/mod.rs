//! Major recommendation: questionnaire intake, affinity scoring against the
//! major catalog, ranking with a short rationale, persistence and share links.

pub mod backend;
pub mod catalog;
pub mod codec;
pub mod domain;
pub mod engine;
pub mod export;
pub mod intake;
pub mod normalizer;
pub mod ranking;
pub mod rationale;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use backend::{FileBackend, InMemoryBackend, StorageBackend};
pub use catalog::{CatalogError, CurriculumSubject, CurriculumTerm, Major, MajorCatalog};
pub use codec::CodecError;
pub use domain::{
    IndexEntry, RankedMajor, Recommendation, ResultId, ScoreVector, SubjectKey, Submission,
    TraitKey, TraitVector,
};
pub use engine::RecommendationEngine;
pub use export::{write_index_csv, ExportError};
pub use intake::{SubmissionDraft, SubmissionError, SubmissionInput};
pub use router::advisor_router;
pub use scoring::{AffinityScorer, MajorScore, ScoringWeights};
pub use service::{AdvisorService, AdvisorServiceError};
pub use stats::{MajorStat, StatsSummary};
pub use store::{IndexUpdate, KeyValueBackend, ResultStore, StoreError};
