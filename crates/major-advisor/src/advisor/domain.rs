use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRAIT_COUNT: usize = 6;
pub const MIN_TRAIT_RATING: u8 = 1;
pub const MAX_TRAIT_RATING: u8 = 5;
pub const MAX_SUBJECT_SCORE: f64 = 10.0;
pub const MAX_FAVORITE_SUBJECTS: usize = 2;
pub const MAX_TOP_MAJORS: usize = 3;

const RESULT_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RESULT_ID_LEN: usize = 8;

/// Identifier shared by a submission and the recommendation computed from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResultId(pub String);

impl ResultId {
    /// Random eight character base-36 identifier.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id = (0..RESULT_ID_LEN)
            .map(|_| RESULT_ID_ALPHABET[rng.gen_range(0..RESULT_ID_ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Self-assessed personality dimensions, in their fixed declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKey {
    Logic,
    Creativity,
    Communication,
    Meticulous,
    Leadership,
    Patience,
}

impl TraitKey {
    pub const ORDER: [TraitKey; TRAIT_COUNT] = [
        TraitKey::Logic,
        TraitKey::Creativity,
        TraitKey::Communication,
        TraitKey::Meticulous,
        TraitKey::Leadership,
        TraitKey::Patience,
    ];

    /// Wire key used in submitted forms and persisted JSON.
    pub const fn key(self) -> &'static str {
        match self {
            TraitKey::Logic => "logic",
            TraitKey::Creativity => "creativity",
            TraitKey::Communication => "communication",
            TraitKey::Meticulous => "meticulous",
            TraitKey::Leadership => "leadership",
            TraitKey::Patience => "patience",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TraitKey::Logic => "Tư duy logic",
            TraitKey::Creativity => "Sáng tạo",
            TraitKey::Communication => "Giao tiếp",
            TraitKey::Meticulous => "Tỉ mỉ",
            TraitKey::Leadership => "Lãnh đạo",
            TraitKey::Patience => "Kiên nhẫn",
        }
    }
}

/// Academic subjects with a self-reported 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKey {
    Math,
    Literature,
    English,
    Informatics,
    Physics,
    Chemistry,
}

impl SubjectKey {
    pub const ORDER: [SubjectKey; 6] = [
        SubjectKey::Math,
        SubjectKey::Literature,
        SubjectKey::English,
        SubjectKey::Informatics,
        SubjectKey::Physics,
        SubjectKey::Chemistry,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            SubjectKey::Math => "math",
            SubjectKey::Literature => "literature",
            SubjectKey::English => "english",
            SubjectKey::Informatics => "informatics",
            SubjectKey::Physics => "physics",
            SubjectKey::Chemistry => "chemistry",
        }
    }

    /// Tag shown in the favorite-subject picker.
    pub const fn favorite_label(self) -> &'static str {
        match self {
            SubjectKey::Math => "Toán",
            SubjectKey::Literature => "Văn",
            SubjectKey::English => "Anh",
            SubjectKey::Informatics => "Tin",
            SubjectKey::Physics => "Vật lý",
            SubjectKey::Chemistry => "Hóa",
        }
    }
}

/// Likert ratings (1-5) for every trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitVector {
    pub logic: u8,
    pub creativity: u8,
    pub communication: u8,
    pub meticulous: u8,
    pub leadership: u8,
    pub patience: u8,
}

impl TraitVector {
    pub fn uniform(rating: u8) -> Self {
        Self {
            logic: rating,
            creativity: rating,
            communication: rating,
            meticulous: rating,
            leadership: rating,
            patience: rating,
        }
    }

    pub fn get(&self, key: TraitKey) -> u8 {
        match key {
            TraitKey::Logic => self.logic,
            TraitKey::Creativity => self.creativity,
            TraitKey::Communication => self.communication,
            TraitKey::Meticulous => self.meticulous,
            TraitKey::Leadership => self.leadership,
            TraitKey::Patience => self.patience,
        }
    }

    pub(crate) fn set(&mut self, key: TraitKey, rating: u8) {
        match key {
            TraitKey::Logic => self.logic = rating,
            TraitKey::Creativity => self.creativity = rating,
            TraitKey::Communication => self.communication = rating,
            TraitKey::Meticulous => self.meticulous = rating,
            TraitKey::Leadership => self.leadership = rating,
            TraitKey::Patience => self.patience = rating,
        }
    }

    /// Ratings paired with their key, in declaration order.
    pub fn entries(&self) -> [(TraitKey, u8); TRAIT_COUNT] {
        TraitKey::ORDER.map(|key| (key, self.get(key)))
    }
}

/// Self-reported subject scores, each within [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub math: f64,
    pub literature: f64,
    pub english: f64,
    pub informatics: f64,
    pub physics: f64,
    pub chemistry: f64,
}

impl ScoreVector {
    pub fn get(&self, key: SubjectKey) -> f64 {
        match key {
            SubjectKey::Math => self.math,
            SubjectKey::Literature => self.literature,
            SubjectKey::English => self.english,
            SubjectKey::Informatics => self.informatics,
            SubjectKey::Physics => self.physics,
            SubjectKey::Chemistry => self.chemistry,
        }
    }

    pub(crate) fn set(&mut self, key: SubjectKey, score: f64) {
        match key {
            SubjectKey::Math => self.math = score,
            SubjectKey::Literature => self.literature = score,
            SubjectKey::English => self.english = score,
            SubjectKey::Informatics => self.informatics = score,
            SubjectKey::Physics => self.physics = score,
            SubjectKey::Chemistry => self.chemistry = score,
        }
    }

    pub(crate) fn zeroed() -> Self {
        Self {
            math: 0.0,
            literature: 0.0,
            english: 0.0,
            informatics: 0.0,
            physics: 0.0,
            chemistry: 0.0,
        }
    }
}

/// A finalized student questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: ResultId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_preference: Option<String>,
    pub traits: TraitVector,
    pub scores: ScoreVector,
    pub favorites: Vec<String>,
    pub orientation: String,
    pub habits: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// One major in the ranked shortlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMajor {
    pub major_id: String,
    pub score: f64,
}

/// Self-contained outcome of scoring one submission.
///
/// The submission is embedded by value so the record can be shared without
/// any other context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: ResultId,
    pub top: Vec<RankedMajor>,
    pub reasons: String,
    pub submission: Submission,
}

impl Recommendation {
    /// Describes the first structural inconsistency, if any.
    ///
    /// Records read back from tokens or storage are only trusted when this
    /// returns `None`.
    pub fn structural_defect(&self) -> Option<&'static str> {
        if self.id != self.submission.id {
            return Some("result id differs from submission id");
        }
        if self.top.len() > MAX_TOP_MAJORS {
            return Some("more than three ranked majors");
        }
        if self
            .top
            .iter()
            .any(|entry| !entry.score.is_finite() || entry.score < 0.0)
        {
            return Some("ranked score is negative or not finite");
        }
        if self
            .top
            .windows(2)
            .any(|pair| pair[0].score < pair[1].score)
        {
            return Some("ranked scores are not descending");
        }
        if self
            .submission
            .traits
            .entries()
            .iter()
            .any(|(_, rating)| !(MIN_TRAIT_RATING..=MAX_TRAIT_RATING).contains(rating))
        {
            return Some("trait rating outside 1-5");
        }
        if SubjectKey::ORDER.iter().any(|key| {
            let score = self.submission.scores.get(*key);
            !(0.0..=MAX_SUBJECT_SCORE).contains(&score)
        }) {
            return Some("subject score outside 0-10");
        }
        if self.submission.favorites.len() > MAX_FAVORITE_SUBJECTS {
            return Some("more than two favorite subjects");
        }
        None
    }

    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            id: self.id.clone(),
            name: self.submission.name.clone(),
            created_at: self.submission.created_at,
            top: self.top.clone(),
        }
    }
}

/// Listing projection of a stored recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: ResultId,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub top: Vec<RankedMajor>,
}

/// Current wall-clock time truncated to the millisecond precision that
/// survives serialization.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

/// Drops sub-millisecond precision, which `ts_milliseconds` cannot carry.
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_base36() {
        let id = ResultId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn trait_entries_follow_declaration_order() {
        let traits = TraitVector {
            logic: 5,
            creativity: 4,
            communication: 3,
            meticulous: 2,
            leadership: 1,
            patience: 2,
        };
        let keys: Vec<_> = traits.entries().iter().map(|(key, _)| key.key()).collect();
        assert_eq!(
            keys,
            vec![
                "logic",
                "creativity",
                "communication",
                "meticulous",
                "leadership",
                "patience"
            ]
        );
        assert_eq!(traits.get(TraitKey::Meticulous), 2);
    }

    #[test]
    fn truncation_keeps_whole_milliseconds() {
        let instant = DateTime::from_timestamp(1_717_230_600, 289_213_628).expect("valid");
        let truncated = truncate_to_millis(instant);
        assert_eq!(truncated.timestamp_subsec_nanos(), 289_000_000);
        assert_eq!(truncated.timestamp(), instant.timestamp());
        assert_eq!(truncate_to_millis(truncated), truncated);
    }

    #[test]
    fn now_millis_drops_sub_millisecond_precision() {
        let now = now_millis();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
