use super::domain::{Submission, TraitKey, TraitVector};

/// The `count` highest-rated traits. Ties resolve to declaration order.
pub fn strongest_traits(traits: &TraitVector, count: usize) -> Vec<TraitKey> {
    let mut entries = traits.entries().to_vec();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into_iter().take(count).map(|(key, _)| key).collect()
}

/// One-sentence explanation built from the two strongest traits, the
/// favorite subjects and the chosen orientation.
pub fn compose_rationale(submission: &Submission) -> String {
    let strengths = strongest_traits(&submission.traits, 2)
        .into_iter()
        .map(|key| key.label().to_lowercase())
        .collect::<Vec<_>>()
        .join(" & ");
    let favorites = submission.favorites.join(", ");

    format!(
        "Vì sao phù hợp: Bạn mạnh về {strengths}, cùng điểm mạnh ở các môn yêu thích ({favorites}). Kết hợp định hướng \"{}\" nên các ngành Top phù hợp với bạn.",
        submission.orientation
    )
}
