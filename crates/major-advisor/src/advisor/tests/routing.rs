use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

use crate::advisor::catalog::MajorCatalog;
use crate::advisor::codec;
use crate::advisor::router::{self, TokenParams};
use crate::advisor::service::AdvisorService;

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializes")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn submit_route_returns_result_and_token() {
    let (service, _) = build_service();
    let router = advisor_router_with_service(service);
    let body = serde_json::to_value(engineering_input()).expect("serializes");

    let response = router
        .oneshot(post_json("/api/v1/recommendations", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"]["top"][0]["majorId"], "ai");
    let token = payload["token"].as_str().expect("token present");
    let decoded = codec::decode(token).expect("token decodes");
    assert_eq!(payload["result"]["id"], json!(decoded.id));
}

#[tokio::test]
async fn submit_route_rejects_invalid_input() {
    let (service, backend) = build_service();
    let router = advisor_router_with_service(service);
    let mut body = serde_json::to_value(engineering_input()).expect("serializes");
    body["traits"]
        .as_object_mut()
        .expect("traits object")
        .remove("patience");

    let response = router
        .oneshot(post_json("/api/v1/recommendations", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .starts_with("invalid submission"));
    assert!(backend.is_empty());
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_storage_failure() {
    let catalog = Arc::new(MajorCatalog::bundled().expect("bundled catalog is valid"));
    let service = Arc::new(AdvisorService::new(catalog, Arc::new(UnavailableBackend)));

    let response = router::submit_handler::<UnavailableBackend>(
        State(service),
        axum::Json(engineering_input()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn result_route_returns_stored_result_or_not_found() {
    let (service, _) = build_service();
    let stored = service.submit(engineering_input()).expect("submission succeeds");
    let router = advisor_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/v1/results/{}", stored.id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], json!(stored.id));

    let response = router
        .oneshot(get("/api/v1/results/unknown1"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn result_handler_honours_share_token() {
    let (service, _) = build_service();
    let shared = sample_recommendation();
    let token = codec::encode(&shared).expect("encodes");

    let response = router::result_handler::<crate::advisor::backend::InMemoryBackend>(
        State(Arc::new(service)),
        Path(shared.id.0.clone()),
        Query(TokenParams { data: Some(token) }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["submission"]["name"], "Trần Thị Diễm");
}

#[tokio::test]
async fn shared_route_decodes_or_rejects() {
    let (service, _) = build_service();
    let router = advisor_router_with_service(service);
    let token = codec::encode(&sample_recommendation()).expect("encodes");

    let response = router
        .clone()
        .oneshot(get(&format!("/api/v1/shared?data={token}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get("/api/v1/shared?data=not-a-token"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_route_encodes_stored_results() {
    let (service, _) = build_service();
    let stored = service.submit(engineering_input()).expect("submission succeeds");
    let router = advisor_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get(&format!("/api/v1/results/{}/token", stored.id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let token = payload["token"].as_str().expect("token present");
    assert_eq!(codec::decode(token), Some(stored));

    let response = router
        .oneshot(get("/api/v1/results/unknown1/token"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_stats_and_catalog_routes_respond() {
    let (service, _) = build_service();
    service.submit(engineering_input()).expect("submission succeeds");
    let router = advisor_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/results?q=nguy"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let listing = read_json_body(response).await;
    assert_eq!(listing.as_array().map(Vec::len), Some(1));

    let response = router
        .clone()
        .oneshot(get("/api/v1/stats"))
        .await
        .expect("route executes");
    let stats = read_json_body(response).await;
    assert_eq!(stats["totalSubmissions"], 1);

    let response = router
        .oneshot(get("/api/v1/majors"))
        .await
        .expect("route executes");
    let majors = read_json_body(response).await;
    assert_eq!(majors[0]["id"], "software");
}

#[tokio::test]
async fn draft_routes_save_and_restore() {
    let (service, _) = build_service();
    let router = advisor_router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/draft"))
        .await
        .expect("route executes");
    let empty = read_json_body(response).await;
    assert_eq!(empty["name"], serde_json::Value::Null);

    let draft = json!({ "name": "Bình", "traits": { "logic": 4 } });
    let response = router
        .clone()
        .oneshot(
            Request::put("/api/v1/draft")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(draft.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(get("/api/v1/draft"))
        .await
        .expect("route executes");
    let restored = read_json_body(response).await;
    assert_eq!(restored["name"], "Bình");
    assert_eq!(restored["traits"]["logic"], 4);
}
