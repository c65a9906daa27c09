use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::search::{list_jobs, suggest_locations, suggest_titles, ListFilters};
use crate::models::job::{JobPosting, NewJobPosting};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub q: String,
    #[serde(flatten)]
    pub filters: ListFilters,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobListResponse {
    pub data: Vec<JobPosting>,
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<JobListResponse>, AppError> {
    let Query(params) = params.map_err(query_rejected)?;
    let data = list_jobs(state.jobs.as_ref(), &params.q, &params.filters).await?;
    Ok(Json(JobListResponse { data }))
}

/// GET /api/jobs/:id
///
/// Ids that are not UUIDs cannot name a posting and are reported as not found.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    let id = parse_job_id(&id)?;
    let job = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(|| job_not_found(id))?;
    Ok(Json(job))
}

/// GET /api/jobs/suggest-jobs
pub async fn handle_suggest_jobs(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(params) = params.map_err(query_rejected)?;
    Ok(Json(suggest_titles(state.jobs.as_ref(), &params.q).await?))
}

/// GET /api/jobs/suggest-locations
pub async fn handle_suggest_locations(
    State(state): State<AppState>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(params) = params.map_err(query_rejected)?;
    Ok(Json(suggest_locations(state.jobs.as_ref(), &params.q).await?))
}

/// POST /api/jobs
///
/// `postedBy` comes from the verified credential, never from the body.
pub async fn handle_create_job(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<NewJobPosting>, JsonRejection>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let Json(new_job) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let job = state.jobs.insert(new_job, &user.id).await?;
    info!("Job {} created by {}", job.id, user.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_job_id(&id)?;
    if !state.jobs.delete_by_id(id).await? {
        return Err(job_not_found(id));
    }
    info!("Job {id} deleted by {}", user.id);
    Ok(Json(json!({ "message": "Deleted" })))
}

fn parse_job_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Job {raw} not found")))
}

fn query_rejected(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn job_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {id} not found"))
}
