use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::TRAIT_COUNT;
use crate::config::StorageConfig;

const BUNDLED_CATALOG: &str = include_str!("../../data/majors.json");

/// Static reference entry describing one academic program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Major {
    pub id: String,
    pub name_vi: String,
    pub name_en: String,
    pub description: String,
    /// Weights aligned with `TraitKey::ORDER`.
    pub traits: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<Vec<CurriculumTerm>>,
}

/// Ordered group of courses, typically a semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumTerm {
    pub name: String,
    pub subjects: Vec<CurriculumSubject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumSubject {
    pub code: String,
    pub name: String,
    pub credits: u8,
}

impl CurriculumTerm {
    pub fn total_credits(&self) -> u32 {
        self.subjects
            .iter()
            .map(|subject| u32::from(subject.credits))
            .sum()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read catalog at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no majors")]
    Empty,
    #[error("major '{id}' is listed more than once")]
    DuplicateId { id: String },
    #[error("major '{id}' is invalid: {reason}")]
    InvalidMajor { id: String, reason: &'static str },
}

/// Read-only list of majors, kept in declaration order.
///
/// Declaration order is significant: it is the tie-break when two majors
/// score identically.
#[derive(Debug, Clone, PartialEq)]
pub struct MajorCatalog {
    majors: Vec<Major>,
}

impl MajorCatalog {
    pub fn new(majors: Vec<Major>) -> Result<Self, CatalogError> {
        if majors.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for major in &majors {
            validate_major(major)?;
            if !seen.insert(major.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: major.id.clone(),
                });
            }
        }

        Ok(Self { majors })
    }

    /// Catalog shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let majors: Vec<Major> = serde_json::from_str(raw)?;
        Self::new(majors)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads the configured override, or the bundled catalog when none is set.
    pub fn from_config(config: &StorageConfig) -> Result<Self, CatalogError> {
        match &config.catalog_path {
            Some(path) => {
                debug!(path = %path.display(), "loading catalog override");
                Self::from_path(path)
            }
            None => Self::bundled(),
        }
    }

    pub fn majors(&self) -> &[Major] {
        &self.majors
    }

    pub fn get(&self, id: &str) -> Option<&Major> {
        self.majors.iter().find(|major| major.id == id)
    }

    /// Vietnamese display name, falling back to the raw id for unknown majors.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|major| major.name_vi.as_str()).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.majors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
    }
}

fn validate_major(major: &Major) -> Result<(), CatalogError> {
    let invalid = |reason| CatalogError::InvalidMajor {
        id: major.id.clone(),
        reason,
    };

    if major.id.trim().is_empty() {
        return Err(invalid("identifier is blank"));
    }
    if major.traits.len() != TRAIT_COUNT {
        return Err(invalid("trait weights must have six entries"));
    }
    if major
        .traits
        .iter()
        .any(|weight| !weight.is_finite() || !(0.0..=1.0).contains(weight))
    {
        return Err(invalid("trait weights must lie within [0, 1]"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = MajorCatalog::bundled().expect("bundled catalog is valid");
        assert!(catalog.len() >= 16);
        let software = catalog.get("software").expect("software present");
        assert_eq!(software.traits.len(), TRAIT_COUNT);
        let curriculum = software.curriculum.as_ref().expect("software curriculum");
        assert_eq!(curriculum[0].name, "semester_1");
        assert_eq!(curriculum[0].total_credits(), 9);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let catalog = MajorCatalog::bundled().expect("bundled catalog is valid");
        assert_eq!(catalog.display_name("graphic"), "Thiết kế đồ họa");
        assert_eq!(catalog.display_name("astronomy"), "astronomy");
    }

    #[test]
    fn rejects_short_weight_vectors() {
        let raw = r#"[{"id":"x","name_vi":"X","name_en":"X","description":"","traits":[0.5,0.5]}]"#;
        match MajorCatalog::from_json_str(raw) {
            Err(CatalogError::InvalidMajor { id, .. }) => assert_eq!(id, "x"),
            other => panic!("expected invalid major, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids_and_empty_lists() {
        let entry = r#"{"id":"x","name_vi":"X","name_en":"X","description":"","traits":[0,0,0,0,0,0]}"#;
        let raw = format!("[{entry},{entry}]");
        assert!(matches!(
            MajorCatalog::from_json_str(&raw),
            Err(CatalogError::DuplicateId { .. })
        ));
        assert!(matches!(
            MajorCatalog::from_json_str("[]"),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn reports_missing_override_file() {
        let config = StorageConfig {
            store_dir: None,
            catalog_path: Some(PathBuf::from("/nonexistent/majors.json")),
        };
        assert!(matches!(
            MajorCatalog::from_config(&config),
            Err(CatalogError::Io { .. })
        ));
    }
}
