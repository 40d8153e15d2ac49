use std::collections::BTreeMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::advisor::backend::InMemoryBackend;
use crate::advisor::catalog::{Major, MajorCatalog};
use crate::advisor::domain::{
    RankedMajor, Recommendation, ResultId, ScoreVector, Submission, TraitVector,
};
use crate::advisor::intake::SubmissionInput;
use crate::advisor::service::AdvisorService;
use crate::advisor::store::{KeyValueBackend, StoreError};
use crate::advisor::advisor_router;

pub(crate) fn major(id: &str, traits: [f64; 6]) -> Major {
    Major {
        id: id.to_string(),
        name_vi: format!("Ngành {id}"),
        name_en: id.to_string(),
        description: String::new(),
        traits: traits.to_vec(),
        skills: None,
        curriculum: None,
    }
}

pub(crate) fn catalog_of(majors: Vec<Major>) -> MajorCatalog {
    MajorCatalog::new(majors).expect("fixture catalog is valid")
}

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// logic=5, everything else 3; strong in math and informatics; engineering
/// orientation with "Toán" as the only favorite.
pub(crate) fn engineering_submission() -> Submission {
    let mut traits = TraitVector::uniform(3);
    traits.logic = 5;

    Submission {
        id: ResultId("eng00001".to_string()),
        name: "Nguyễn Văn An".to_string(),
        email: None,
        preferences: vec!["Công nghệ".to_string()],
        custom_preference: None,
        traits,
        scores: ScoreVector {
            math: 9.0,
            literature: 5.0,
            english: 6.0,
            informatics: 8.0,
            physics: 7.0,
            chemistry: 5.0,
        },
        favorites: vec!["Toán".to_string()],
        orientation: "Kỹ thuật".to_string(),
        habits: "Thích lắp ráp và lập trình".to_string(),
        created_at: fixed_time(),
    }
}

/// Form payload equivalent to [`engineering_submission`].
pub(crate) fn engineering_input() -> SubmissionInput {
    let traits = [
        ("logic", 5),
        ("creativity", 3),
        ("communication", 3),
        ("meticulous", 3),
        ("leadership", 3),
        ("patience", 3),
    ];
    let scores = [
        ("math", 9.0),
        ("literature", 5.0),
        ("english", 6.0),
        ("informatics", 8.0),
        ("physics", 7.0),
        ("chemistry", 5.0),
    ];

    SubmissionInput {
        name: "Nguyễn Văn An".to_string(),
        email: Some("an@example.com".to_string()),
        preferences: vec!["Công nghệ".to_string()],
        custom_preference: None,
        traits: traits
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect::<BTreeMap<_, _>>(),
        scores: scores
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect::<BTreeMap<_, _>>(),
        favorites: vec!["Toán".to_string()],
        orientation: "Kỹ thuật".to_string(),
        habits: "Thích lắp ráp và lập trình".to_string(),
    }
}

/// A stored-looking recommendation with three distinct descending scores.
pub(crate) fn sample_recommendation() -> Recommendation {
    let mut submission = engineering_submission();
    submission.id = ResultId("k3x9q2ab".to_string());
    submission.name = "Trần Thị Diễm".to_string();
    submission.email = Some("diem@example.com".to_string());
    submission.custom_preference = Some("Robot và tự động hóa".to_string());

    Recommendation {
        id: submission.id.clone(),
        top: vec![
            RankedMajor {
                major_id: "software".to_string(),
                score: 0.7123456789012345,
            },
            RankedMajor {
                major_id: "ai".to_string(),
                score: 0.6987,
            },
            RankedMajor {
                major_id: "mechatronics".to_string(),
                score: 0.6512,
            },
        ],
        reasons: "Vì sao phù hợp: Bạn mạnh về tư duy logic & sáng tạo.".to_string(),
        submission,
    }
}

pub(crate) fn build_service() -> (AdvisorService<InMemoryBackend>, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::default());
    let catalog = Arc::new(MajorCatalog::bundled().expect("bundled catalog is valid"));
    let service = AdvisorService::new(catalog, backend.clone());
    (service, backend)
}

pub(crate) fn advisor_router_with_service(
    service: AdvisorService<InMemoryBackend>,
) -> axum::Router {
    advisor_router(Arc::new(service))
}

/// Backend whose writes always fail; reads see nothing.
#[derive(Debug, Default)]
pub(crate) struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk unavailable"),
        })
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
