use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::codec;
use super::domain::{now_millis, ResultId};
use super::intake::{SubmissionDraft, SubmissionInput};
use super::service::{AdvisorService, AdvisorServiceError};
use super::store::KeyValueBackend;

/// Router builder exposing the questionnaire, results and sharing endpoints.
pub fn advisor_router<B>(service: Arc<AdvisorService<B>>) -> Router
where
    B: KeyValueBackend + 'static,
{
    Router::new()
        .route("/api/v1/majors", get(majors_handler::<B>))
        .route("/api/v1/recommendations", post(submit_handler::<B>))
        .route("/api/v1/results", get(index_handler::<B>))
        .route("/api/v1/results/:result_id", get(result_handler::<B>))
        .route("/api/v1/results/:result_id/token", get(token_handler::<B>))
        .route("/api/v1/shared", get(shared_handler::<B>))
        .route("/api/v1/stats", get(stats_handler::<B>))
        .route(
            "/api/v1/draft",
            get(load_draft_handler::<B>).put(save_draft_handler::<B>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenParams {
    pub data: Option<String>,
}

pub(crate) async fn majors_handler<B>(State(service): State<Arc<AdvisorService<B>>>) -> Response
where
    B: KeyValueBackend + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog().majors())).into_response()
}

pub(crate) async fn submit_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    axum::Json(input): axum::Json<SubmissionInput>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    let result = match service.submit(input) {
        Ok(result) => result,
        Err(AdvisorServiceError::Submission(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
        Err(other) => return internal_error(other),
    };

    match codec::encode(&result) {
        Ok(token) => {
            let payload = json!({
                "result": result,
                "token": token,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => internal_error(error.into()),
    }
}

pub(crate) async fn index_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    let entries = match params.q.as_deref() {
        Some(query) => service.search(query),
        None => service.index(),
    };
    (StatusCode::OK, axum::Json(entries)).into_response()
}

pub(crate) async fn result_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    Path(result_id): Path<String>,
    Query(params): Query<TokenParams>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    let id = ResultId(result_id);
    match service.resolve(Some(&id), params.data.as_deref()) {
        Some(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        None => not_found(&id),
    }
}

pub(crate) async fn token_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    Path(result_id): Path<String>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    let id = ResultId(result_id);
    match service.share_token(&id) {
        Ok(Some(token)) => {
            let payload = json!({
                "id": id,
                "token": token,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => not_found(&id),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn shared_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    Query(params): Query<TokenParams>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    match service.resolve(None, params.data.as_deref()) {
        Some(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        None => {
            let payload = json!({
                "error": "share link is invalid or incomplete",
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn stats_handler<B>(State(service): State<Arc<AdvisorService<B>>>) -> Response
where
    B: KeyValueBackend + 'static,
{
    (StatusCode::OK, axum::Json(service.stats(now_millis()))).into_response()
}

pub(crate) async fn load_draft_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    let draft = service.load_draft().unwrap_or_default();
    (StatusCode::OK, axum::Json(draft)).into_response()
}

pub(crate) async fn save_draft_handler<B>(
    State(service): State<Arc<AdvisorService<B>>>,
    axum::Json(draft): axum::Json<SubmissionDraft>,
) -> Response
where
    B: KeyValueBackend + 'static,
{
    match service.save_draft(&draft) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => internal_error(other),
    }
}

fn not_found(id: &ResultId) -> Response {
    let payload = json!({
        "error": "result not found",
        "id": id,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn internal_error(error: AdvisorServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
