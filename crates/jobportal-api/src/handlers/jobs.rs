//! Job posting handlers.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use jobportal_models::{Job, JobDraft, JobId, JobUpdate, Salary, SearchQuery};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Query parameters for the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u64>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Job posting response body.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: String,
    pub salary: Salary,
    pub benefits: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub extras: HashMap<String, serde_json::Value>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.to_string(),
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            job_type: job.job_type,
            salary: job.salary,
            benefits: job.benefits,
            extras: job.extras,
            created_at: job.created_at.to_rfc3339(),
        }
    }
}

/// Bulk delete response body.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// POST /api/jobs
///
/// Create a job posting. Returns:
/// - 201: the stored posting, including generated id and timestamp
/// - 400: a required field is missing or empty
pub async fn create_job(
    State(state): State<AppState>,
    Json(draft): Json<JobDraft>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let job = state.jobs.create(draft).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /api/jobs?page=&limit=
///
/// One page of postings. Both parameters are 1-based and default to
/// page 1 with 10 postings.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let jobs = state.jobs.find_all(page, limit).await?;
    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// GET /api/jobs/search?salary=
///
/// Ranked search. With no salary every posting is a candidate.
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let jobs = state.jobs.search(&query).await?;
    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let id = JobId::from_string(id);
    let job = state
        .jobs
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id {id}")))?;
    Ok(Json(job.into()))
}

/// PATCH /api/jobs/:id
///
/// Merge update: only the supplied fields change.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<JobUpdate>,
) -> ApiResult<Json<JobResponse>> {
    let id = JobId::from_string(id);
    let job = state
        .jobs
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id {id}")))?;
    Ok(Json(job.into()))
}

/// DELETE /api/jobs/:id
///
/// Returns the removed posting.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let id = JobId::from_string(id);
    let job = state
        .jobs
        .delete(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No job with id {id}")))?;
    Ok(Json(job.into()))
}

/// DELETE /api/jobs
///
/// Administrative bulk removal of every posting.
pub async fn delete_all_jobs(
    State(state): State<AppState>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state.jobs.delete_all().await?;
    Ok(Json(DeletedResponse { deleted }))
}
