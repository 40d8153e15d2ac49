use std::collections::BTreeMap;

use super::domain::{TraitKey, TraitVector, MAX_TRAIT_RATING, MIN_TRAIT_RATING, TRAIT_COUNT};
use super::intake::SubmissionError;

const RATING_SPAN: f64 = (MAX_TRAIT_RATING - MIN_TRAIT_RATING) as f64;

/// Maps 1-5 ratings onto [0, 1] in `TraitKey::ORDER`.
pub fn normalize_traits(traits: &TraitVector) -> [f64; TRAIT_COUNT] {
    TraitKey::ORDER.map(|key| {
        f64::from(traits.get(key).saturating_sub(MIN_TRAIT_RATING)) / RATING_SPAN
    })
}

/// Normalizes loosely-keyed form ratings, rejecting incomplete vectors
/// instead of substituting defaults.
pub fn normalize_ratings(
    ratings: &BTreeMap<String, i64>,
) -> Result<[f64; TRAIT_COUNT], SubmissionError> {
    let traits = TraitVector::from_ratings(ratings)?;
    Ok(normalize_traits(&traits))
}

impl TraitVector {
    /// Builds a vector from string-keyed ratings. Every recognized key must be
    /// present with an integer in [1, 5]; unknown keys are ignored.
    pub fn from_ratings(ratings: &BTreeMap<String, i64>) -> Result<Self, SubmissionError> {
        let mut traits = TraitVector::uniform(MIN_TRAIT_RATING);
        for key in TraitKey::ORDER {
            let value = *ratings
                .get(key.key())
                .ok_or(SubmissionError::MissingTrait(key))?;
            let rating = u8::try_from(value)
                .ok()
                .filter(|rating| (MIN_TRAIT_RATING..=MAX_TRAIT_RATING).contains(rating))
                .ok_or(SubmissionError::TraitOutOfRange {
                    trait_key: key,
                    value,
                })?;
            traits.set(key, rating);
        }
        Ok(traits)
    }
}
