use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    truncate_to_millis, ResultId, ScoreVector, SubjectKey, Submission, TraitKey, TraitVector,
    MAX_FAVORITE_SUBJECTS, MAX_SUBJECT_SCORE,
};

/// Input-contract violations detected before any scoring happens.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid submission: name is required")]
    MissingName,
    #[error("invalid submission: trait '{}' is missing", .0.key())]
    MissingTrait(TraitKey),
    #[error("invalid submission: trait '{}' must be between 1 and 5 (found {value})", .trait_key.key())]
    TraitOutOfRange { trait_key: TraitKey, value: i64 },
    #[error("invalid submission: score for '{}' is missing", .0.key())]
    MissingScore(SubjectKey),
    #[error("invalid submission: score for '{}' is not a finite number", .0.key())]
    NonFiniteScore(SubjectKey),
    #[error("invalid submission: at least one favorite subject is required")]
    NoFavoriteSubjects,
}

/// Questionnaire answers as posted by the collecting form.
///
/// Traits and scores arrive as loose maps so an incomplete form can be
/// rejected explicitly rather than failing deep inside deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub custom_preference: Option<String>,
    pub traits: BTreeMap<String, i64>,
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub favorites: Vec<String>,
    pub orientation: String,
    pub habits: String,
}

impl SubmissionInput {
    /// Validates the answers and finalizes them under `id`. `created_at` is
    /// kept to whole milliseconds, the precision persisted records carry.
    pub fn into_submission(
        self,
        id: ResultId,
        created_at: DateTime<Utc>,
    ) -> Result<Submission, SubmissionError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(SubmissionError::MissingName);
        }

        let traits = TraitVector::from_ratings(&self.traits)?;
        let scores = ScoreVector::from_scores(&self.scores)?;

        let favorites = favorite_subjects(self.favorites);
        if favorites.is_empty() {
            return Err(SubmissionError::NoFavoriteSubjects);
        }

        Ok(Submission {
            id,
            name,
            email: non_blank(self.email),
            preferences: self
                .preferences
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            custom_preference: non_blank(self.custom_preference),
            traits,
            scores,
            favorites,
            orientation: self.orientation.trim().to_string(),
            habits: self.habits.trim().to_string(),
            created_at: truncate_to_millis(created_at),
        })
    }
}

impl ScoreVector {
    /// Builds a vector from string-keyed scores, clamping each into [0, 10].
    pub fn from_scores(scores: &BTreeMap<String, f64>) -> Result<Self, SubmissionError> {
        let mut vector = ScoreVector::zeroed();
        for key in SubjectKey::ORDER {
            let value = *scores
                .get(key.key())
                .ok_or(SubmissionError::MissingScore(key))?;
            if !value.is_finite() {
                return Err(SubmissionError::NonFiniteScore(key));
            }
            vector.set(key, value.clamp(0.0, MAX_SUBJECT_SCORE));
        }
        Ok(vector)
    }
}

/// In-progress questionnaire kept by the autosave slot. Every field is
/// optional because the student may leave at any step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub preferences: Vec<String>,
    pub custom_preference: Option<String>,
    pub traits: BTreeMap<String, i64>,
    pub scores: BTreeMap<String, f64>,
    pub favorites: Vec<String>,
    pub orientation: Option<String>,
    pub habits: Option<String>,
}

impl From<SubmissionInput> for SubmissionDraft {
    fn from(input: SubmissionInput) -> Self {
        Self {
            name: Some(input.name),
            email: input.email,
            preferences: input.preferences,
            custom_preference: input.custom_preference,
            traits: input.traits,
            scores: input.scores,
            favorites: input.favorites,
            orientation: Some(input.orientation),
            habits: Some(input.habits),
        }
    }
}

fn favorite_subjects(raw: Vec<String>) -> Vec<String> {
    let mut favorites: Vec<String> = Vec::with_capacity(MAX_FAVORITE_SUBJECTS);
    for tag in raw {
        let tag = tag.trim();
        if tag.is_empty() || favorites.iter().any(|existing| existing == tag) {
            continue;
        }
        favorites.push(tag.to_string());
        if favorites.len() == MAX_FAVORITE_SUBJECTS {
            break;
        }
    }
    favorites
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
