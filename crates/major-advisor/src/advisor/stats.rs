use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::catalog::MajorCatalog;
use super::domain::IndexEntry;

const RECENT_WINDOW_DAYS: i64 = 7;
const TOP_MAJOR_COUNT: usize = 5;

/// How often one major appears in saved top-3 lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorStat {
    pub major_id: String,
    pub major_name: String,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_submissions: usize,
    pub recent_submissions: usize,
    pub major_stats: Vec<MajorStat>,
    pub top_majors: Vec<MajorStat>,
}

/// Aggregates the listing index into popularity figures relative to `now`.
pub fn summarize(
    entries: &[IndexEntry],
    catalog: &MajorCatalog,
    now: DateTime<Utc>,
) -> StatsSummary {
    let total = entries.len();
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent = entries
        .iter()
        .filter(|entry| entry.created_at >= cutoff)
        .count();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for ranked in entries.iter().flat_map(|entry| entry.top.iter()) {
        let id = ranked.major_id.as_str();
        let count = counts.entry(id).or_insert_with(|| {
            order.push(id);
            0
        });
        *count += 1;
    }

    let mut major_stats: Vec<MajorStat> = order
        .into_iter()
        .map(|id| {
            let count = counts.get(id).copied().unwrap_or_default();
            MajorStat {
                major_id: id.to_string(),
                major_name: catalog.display_name(id).to_string(),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect();
    major_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let top_majors = major_stats.iter().take(TOP_MAJOR_COUNT).cloned().collect();

    StatsSummary {
        total_submissions: total,
        recent_submissions: recent,
        major_stats,
        top_majors,
    }
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::domain::{RankedMajor, ResultId};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn entry(id: &str, days_ago: i64, majors: &[&str]) -> IndexEntry {
        IndexEntry {
            id: ResultId(id.to_string()),
            name: format!("Student {id}"),
            created_at: now() - Duration::days(days_ago),
            top: majors
                .iter()
                .enumerate()
                .map(|(rank, major)| RankedMajor {
                    major_id: major.to_string(),
                    score: 0.9 - rank as f64 * 0.1,
                })
                .collect(),
        }
    }

    #[test]
    fn counts_appearances_and_recent_submissions() {
        let catalog = MajorCatalog::bundled().expect("bundled catalog");
        let entries = vec![
            entry("a", 1, &["software", "ai", "data"]),
            entry("b", 3, &["graphic", "software", "marketing"]),
            entry("c", 30, &["software", "mystery", "ai"]),
        ];

        let summary = summarize(&entries, &catalog, now());

        assert_eq!(summary.total_submissions, 3);
        assert_eq!(summary.recent_submissions, 2);
        let first = &summary.major_stats[0];
        assert_eq!(first.major_id, "software");
        assert_eq!(first.count, 3);
        assert_eq!(first.percentage, 100);
        assert_eq!(first.major_name, "Công nghệ thông tin - Ứng dụng phần mềm");

        let ai = &summary.major_stats[1];
        assert_eq!((ai.major_id.as_str(), ai.count, ai.percentage), ("ai", 2, 67));

        let mystery = summary
            .major_stats
            .iter()
            .find(|stat| stat.major_id == "mystery")
            .expect("unknown majors still counted");
        assert_eq!(mystery.major_name, "mystery");
        assert_eq!(summary.top_majors.len(), 5);
    }

    #[test]
    fn equal_counts_keep_first_appearance_order() {
        let catalog = MajorCatalog::bundled().expect("bundled catalog");
        let entries = vec![entry("a", 0, &["logistics", "hotel"])];
        let summary = summarize(&entries, &catalog, now());
        let ids: Vec<_> = summary
            .major_stats
            .iter()
            .map(|stat| stat.major_id.as_str())
            .collect();
        assert_eq!(ids, vec!["logistics", "hotel"]);
    }

    #[test]
    fn empty_index_yields_zeroes() {
        let catalog = MajorCatalog::bundled().expect("bundled catalog");
        let summary = summarize(&[], &catalog, now());
        assert_eq!(summary.total_submissions, 0);
        assert!(summary.major_stats.is_empty());
        assert!(summary.top_majors.is_empty());
    }
}
