mod orientation;
mod subjects;

use serde::{Deserialize, Serialize};

use super::catalog::{Major, MajorCatalog};
use super::domain::{Submission, TRAIT_COUNT};
use super::normalizer::normalize_traits;

/// Weights for the combined affinity score.
///
/// `combined = trait_weight * trait + subject_weight * subject
///           + orientation_weight * orientation`
///
/// The sum is not renormalized: a favorite-subject boost can push the
/// subject term, and therefore the combined score, slightly above 1.0.
/// Only the relative order is consumed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub trait_weight: f64,
    pub subject_weight: f64,
    pub orientation_weight: f64,
    /// Flat orientation term awarded on a pattern match (before weighting).
    pub orientation_bonus: f64,
    /// Multiplier applied to a subject average when its favorite tag is chosen.
    pub favorite_boost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            trait_weight: 0.60,
            subject_weight: 0.34,
            orientation_weight: 0.06,
            orientation_bonus: 0.06,
            favorite_boost: 1.1,
        }
    }
}

/// Per-major breakdown kept alongside the combined score for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorScore {
    pub major_id: String,
    pub trait_affinity: f64,
    pub subject_affinity: f64,
    pub orientation_boost: f64,
    pub combined: f64,
}

/// Stateless scorer applying the weights to every catalog entry.
#[derive(Debug, Clone, Default)]
pub struct AffinityScorer {
    weights: ScoringWeights,
}

impl AffinityScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Scores every major, preserving catalog order.
    pub fn score_catalog(&self, catalog: &MajorCatalog, submission: &Submission) -> Vec<MajorScore> {
        let normalized = normalize_traits(&submission.traits);
        catalog
            .majors()
            .iter()
            .map(|major| self.score_major(major, submission, &normalized))
            .collect()
    }

    pub fn score_major(
        &self,
        major: &Major,
        submission: &Submission,
        normalized: &[f64; TRAIT_COUNT],
    ) -> MajorScore {
        let trait_affinity = trait_affinity(&major.traits, normalized);
        let subject_affinity = subjects::subject_affinity(
            &major.id,
            &submission.scores,
            &submission.favorites,
            self.weights.favorite_boost,
        );
        let orientation_boost =
            if orientation::orientation_matches(&major.id, &submission.orientation) {
                self.weights.orientation_bonus
            } else {
                0.0
            };

        let combined = trait_affinity * self.weights.trait_weight
            + subject_affinity * self.weights.subject_weight
            + orientation_boost * self.weights.orientation_weight;

        MajorScore {
            major_id: major.id.clone(),
            trait_affinity,
            subject_affinity,
            orientation_boost,
            combined,
        }
    }
}

/// Weighted average of the normalized traits using the major's weights.
fn trait_affinity(weights: &[f64], normalized: &[f64; TRAIT_COUNT]) -> f64 {
    if weights.is_empty() {
        return 0.0;
    }
    let dot: f64 = weights
        .iter()
        .zip(normalized.iter())
        .map(|(weight, value)| weight * value)
        .sum();
    dot / weights.len() as f64
}
