use major_advisor::advisor::{AdvisorService, MajorCatalog, StorageBackend, SubmissionInput};
use major_advisor::config::StorageConfig;
use major_advisor::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type SharedAdvisor = Arc<AdvisorService<StorageBackend>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the catalog and the configured backend into a shareable service.
pub(crate) fn build_advisor(
    storage: &StorageConfig,
    store_dir: Option<PathBuf>,
) -> Result<SharedAdvisor, AppError> {
    let storage = StorageConfig {
        store_dir: store_dir.or_else(|| storage.store_dir.clone()),
        catalog_path: storage.catalog_path.clone(),
    };

    let catalog = MajorCatalog::from_config(&storage)?;
    let backend = StorageBackend::from_config(&storage)?;
    info!(
        majors = catalog.len(),
        backend = %backend.describe(),
        "advisor initialised"
    );

    Ok(Arc::new(AdvisorService::new(
        Arc::new(catalog),
        Arc::new(backend),
    )))
}

/// Reads a questionnaire as JSON from a file, or from stdin when the path is `-`.
pub(crate) fn read_submission(path: &Path) -> Result<SubmissionInput, AppError> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        raw
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_dir_override_wins_over_configuration() {
        let configured = tempfile::tempdir().expect("tempdir");
        let override_dir = tempfile::tempdir().expect("tempdir");
        let storage = StorageConfig {
            store_dir: Some(configured.path().to_path_buf()),
            catalog_path: None,
        };

        let advisor = build_advisor(&storage, Some(override_dir.path().to_path_buf()))
            .expect("advisor builds");

        match advisor.store().backend().as_ref() {
            StorageBackend::File(backend) => assert_eq!(backend.root(), override_dir.path()),
            other => panic!("expected file backend, got {other:?}"),
        }
    }

    #[test]
    fn reads_questionnaire_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.json");
        std::fs::write(&path, crate::demo::SAMPLE_QUESTIONNAIRE).expect("fixture written");

        let input = read_submission(&path).expect("parses");
        assert_eq!(input.favorites, vec!["Toán".to_string()]);

        std::fs::write(&path, "{").expect("fixture written");
        assert!(matches!(read_submission(&path), Err(AppError::Input(_))));
    }
}
