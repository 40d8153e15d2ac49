use crate::advisor::domain::{ScoreVector, SubjectKey};

/// How one group of majors reads the subject scores: which subjects are
/// averaged and which favorite tag earns the boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubjectRule {
    pub subjects: &'static [SubjectKey],
    pub favorite_boost: Option<SubjectKey>,
}

use SubjectKey::{English, Informatics, Literature, Math, Physics};

const SUBJECT_RULES: &[(&[&str], SubjectRule)] = &[
    (
        &["software", "webdev", "ai", "data"],
        SubjectRule {
            subjects: &[Math, Informatics],
            favorite_boost: Some(Math),
        },
    ),
    (
        &["cybersec"],
        SubjectRule {
            subjects: &[Math, Informatics],
            favorite_boost: Some(Informatics),
        },
    ),
    (
        &["graphic", "multimedia"],
        SubjectRule {
            subjects: &[English, Literature],
            favorite_boost: Some(Literature),
        },
    ),
    (
        &["marketing", "emarket", "hotel", "tourism"],
        SubjectRule {
            subjects: &[English, Literature],
            favorite_boost: None,
        },
    ),
    (
        &["business"],
        SubjectRule {
            subjects: &[Literature, English],
            favorite_boost: None,
        },
    ),
    (
        &["mechatronics", "electronics", "automotive"],
        SubjectRule {
            subjects: &[Math, Physics],
            favorite_boost: Some(Physics),
        },
    ),
    (
        &["logistics"],
        SubjectRule {
            subjects: &[Math, English],
            favorite_boost: None,
        },
    ),
];

const DEFAULT_RULE: SubjectRule = SubjectRule {
    subjects: &[Math, English, Informatics],
    favorite_boost: None,
};

pub(crate) fn rule_for(major_id: &str) -> &'static SubjectRule {
    SUBJECT_RULES
        .iter()
        .find(|(ids, _)| ids.contains(&major_id))
        .map(|(_, rule)| rule)
        .unwrap_or(&DEFAULT_RULE)
}

/// Subject affinity on a 0-1 scale; exceeds 1 only through the favorite boost.
pub(crate) fn subject_affinity(
    major_id: &str,
    scores: &ScoreVector,
    favorites: &[String],
    boost_factor: f64,
) -> f64 {
    let rule = rule_for(major_id);
    let total: f64 = rule.subjects.iter().map(|key| scores.get(*key)).sum();
    let average = total / rule.subjects.len() as f64;

    let boosted = match rule.favorite_boost {
        Some(subject)
            if favorites
                .iter()
                .any(|favorite| favorite == subject.favorite_label()) =>
        {
            average * boost_factor
        }
        _ => average,
    };

    boosted / 10.0
}
