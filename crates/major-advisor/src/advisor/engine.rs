use super::catalog::MajorCatalog;
use super::domain::{Recommendation, Submission};
use super::ranking::{rank, top_majors};
use super::rationale::compose_rationale;
use super::scoring::{AffinityScorer, MajorScore, ScoringWeights};

/// Normalize, score, rank and explain: the full pipeline from a validated
/// submission to a recommendation. Pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    scorer: AffinityScorer,
}

impl RecommendationEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scorer: AffinityScorer::new(weights),
        }
    }

    pub fn recommend(&self, catalog: &MajorCatalog, submission: Submission) -> Recommendation {
        let scores = self.scorer.score_catalog(catalog, &submission);
        let top = top_majors(scores);
        let reasons = compose_rationale(&submission);

        Recommendation {
            id: submission.id.clone(),
            top,
            reasons,
            submission,
        }
    }

    /// Every major with its score breakdown, best first.
    pub fn breakdown(&self, catalog: &MajorCatalog, submission: &Submission) -> Vec<MajorScore> {
        rank(self.scorer.score_catalog(catalog, submission))
    }
}
