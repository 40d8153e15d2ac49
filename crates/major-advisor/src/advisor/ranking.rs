use super::domain::{RankedMajor, MAX_TOP_MAJORS};
use super::scoring::MajorScore;

/// Sorts by combined score, highest first. The sort is stable, so majors
/// with equal scores keep their catalog order.
pub fn rank(mut scores: Vec<MajorScore>) -> Vec<MajorScore> {
    scores.sort_by(|a, b| b.combined.total_cmp(&a.combined));
    scores
}

/// The `MAX_TOP_MAJORS` best majors as `{majorId, score}` pairs.
pub fn top_majors(scores: Vec<MajorScore>) -> Vec<RankedMajor> {
    rank(scores)
        .into_iter()
        .take(MAX_TOP_MAJORS)
        .map(|score| RankedMajor {
            major_id: score.major_id,
            score: score.combined,
        })
        .collect()
}
