//! Router-level tests against a mocked store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use jobportal_api::{create_router, ApiConfig, AppState};
use jobportal_models::{Job, JobDraft, Salary};
use jobportal_store::MockJobStore;

fn router(mock: MockJobStore) -> Router {
    let state = AppState::with_store(ApiConfig::default(), Arc::new(mock));
    create_router(state, None)
}

fn draft() -> JobDraft {
    JobDraft {
        title: "Software Engineer".to_string(),
        company: "Tech Corp".to_string(),
        location: "New York, NY".to_string(),
        description: "A job for a software engineer.".to_string(),
        job_type: "full-time".to_string(),
        salary: Some(Salary {
            min: 80_000,
            max: 120_000,
        }),
        benefits: vec!["Health Insurance".to_string()],
        extras: Default::default(),
        created_at: None,
    }
}

fn job(job_type: &str, salary: Salary) -> Job {
    let mut d = draft();
    d.job_type = job_type.to_string();
    d.salary = Some(salary);
    d.try_into_job(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_returns_stored_posting() {
    let mut mock = MockJobStore::new();
    mock.expect_insert().times(1).returning(|_| Ok(()));

    let response = router(mock)
        .oneshot(json_request(
            "POST",
            "/api/jobs",
            json!({
                "title": "Software Engineer",
                "company": "Tech Corp",
                "location": "New York, NY",
                "description": "A job for a software engineer.",
                "job_type": "full-time",
                "salary": { "min": 80000, "max": 120000 },
                "benefits": ["Health Insurance"]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["title"], "Software Engineer");
    // Creation timestamp defaults to the start of the day
    assert!(body["created_at"].as_str().unwrap().contains("T00:00:00"));
}

#[tokio::test]
async fn test_create_missing_description_is_rejected() {
    // No expectations: reaching the store fails the test.
    let response = router(MockJobStore::new())
        .oneshot(json_request(
            "POST",
            "/api/jobs",
            json!({
                "title": "Software Engineer",
                "company": "Tech Corp",
                "location": "New York, NY",
                "job_type": "full-time",
                "salary": { "min": 80000, "max": 120000 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["detail"].as_str().unwrap().contains("description"));
}

#[tokio::test]
async fn test_list_rejects_page_zero() {
    let response = router(MockJobStore::new())
        .oneshot(get_request("/api/jobs?page=0&limit=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_skips_earlier_pages() {
    let mut mock = MockJobStore::new();
    mock.expect_find_page()
        .withf(|&skip, &limit| skip == 10 && limit == 10)
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let response = router(mock)
        .oneshot(get_request("/api/jobs?page=2&limit=10"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let mut mock = MockJobStore::new();
    mock.expect_find_by_id().returning(|_| Ok(None));

    let response = router(mock)
        .oneshot(get_request("/api/jobs/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let mut mock = MockJobStore::new();
    mock.expect_update().returning(|_, _| Ok(None));

    let response = router(mock)
        .oneshot(json_request(
            "PATCH",
            "/api/jobs/does-not-exist",
            json!({ "title": "X" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_merges_supplied_fields() {
    let mut updated = job("full-time", Salary { min: 80_000, max: 120_000 });
    updated.title = "Staff Engineer".to_string();
    let id = updated.id.clone();
    let uri = format!("/api/jobs/{}", id);

    let mut mock = MockJobStore::new();
    mock.expect_update()
        .withf(move |candidate, patch| {
            candidate == &id
                && patch.title.as_deref() == Some("Staff Engineer")
                && patch.company.is_none()
        })
        .times(1)
        .returning(move |_, _| Ok(Some(updated.clone())));
    let response = router(mock)
        .oneshot(json_request("PATCH", &uri, json!({ "title": "Staff Engineer" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Staff Engineer");
    assert_eq!(body["company"], "Tech Corp");
}

#[tokio::test]
async fn test_search_returns_ranked_order() {
    let full_time = job("full-time", Salary { min: 50_000, max: 90_000 });
    let part_time = job("part-time", Salary { min: 40_000, max: 95_000 });
    let (first, second) = (full_time.id.clone(), part_time.id.clone());

    let ranked = vec![full_time, part_time];
    let mut mock = MockJobStore::new();
    mock.expect_search()
        .withf(|query| query.salary == Some(60_000))
        .returning(move |_| Ok(ranked.clone()));

    let response = router(mock)
        .oneshot(get_request("/api/jobs/search?salary=60000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn test_search_with_no_match_is_empty() {
    let mut mock = MockJobStore::new();
    mock.expect_search()
        .withf(|query| query.salary == Some(200_000))
        .returning(|_| Ok(Vec::new()));

    let response = router(mock)
        .oneshot(get_request("/api/jobs/search?salary=200000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_delete_all_reports_count() {
    let mut mock = MockJobStore::new();
    mock.expect_delete_all().times(1).returning(|| Ok(5));

    let response = router(mock)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "deleted": 5 }));
}

#[tokio::test]
async fn test_health() {
    let response = router(MockJobStore::new())
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
