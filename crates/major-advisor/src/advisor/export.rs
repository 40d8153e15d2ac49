use std::io::Write;

use super::domain::{IndexEntry, MAX_TOP_MAJORS};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to flush csv output: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 9] = [
    "id",
    "name",
    "created_at",
    "top_1",
    "top_1_score",
    "top_2",
    "top_2_score",
    "top_3",
    "top_3_score",
];

/// Writes the listing index as CSV, one row per saved result.
pub fn write_index_csv<W: Write>(entries: &[IndexEntry], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for entry in entries {
        let mut row = vec![
            entry.id.0.clone(),
            entry.name.clone(),
            entry.created_at.to_rfc3339(),
        ];
        for rank in 0..MAX_TOP_MAJORS {
            match entry.top.get(rank) {
                Some(ranked) => {
                    row.push(ranked.major_id.clone());
                    row.push(format!("{:.4}", ranked.score));
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}
