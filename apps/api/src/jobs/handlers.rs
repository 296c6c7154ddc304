use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::session::AdminSession;
use crate::db::page_bounds;
use crate::email::{dispatch_all, templates::job_posting_emails};
use crate::errors::AppError;
use crate::jobs::{
    count_by_status, find_posted, insert_job_posting, list_all, list_posted, update_status,
    JobFilter, JobPostingRequest, JobPostingStatus, PostingContact,
};
use crate::models::job::{JobPosting, PublicJob};
use crate::seo::structured::job_posting_json_ld;
use crate::state::AppState;
use crate::validation::{AppPath, AppQuery, ValidatedJson};

#[derive(Debug, Serialize)]
pub struct PublicJobDetail {
    pub job: PublicJob,
    /// schema.org JobPosting blob for the page's `<script type="application/ld+json">`.
    pub structured_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct AdminPostingQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// POST /api/v1/job-postings
pub async fn handle_submit_job_posting(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<JobPostingRequest>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let posting = insert_job_posting(
        &state.db,
        PostingContact {
            client_id: None,
            company_name: &req.company_name,
            contact_name: &req.contact_name,
            contact_email: &req.contact_email,
            contact_phone: req.contact_phone.as_deref(),
        },
        &req.job,
    )
    .await?;

    info!("Job posting {} received from {}", posting.id, posting.company_name);
    dispatch_all(
        &state.mailer,
        job_posting_emails(&state.config.site, state.admin_notify(), &posting),
    );

    Ok((StatusCode::CREATED, Json(posting)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<JobFilter>,
) -> Result<Json<Vec<PublicJob>>, AppError> {
    let jobs = list_posted(&state.db, &filter).await?;
    Ok(Json(jobs.into_iter().map(PublicJob::from).collect()))
}

/// GET /api/v1/jobs/:id
///
/// Postings that are not currently `posted` are indistinguishable from missing ones.
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PublicJobDetail>, AppError> {
    let posting = find_posted(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let structured_data = job_posting_json_ld(&posting, &state.config.site_url, &state.config.site);
    Ok(Json(PublicJobDetail {
        job: PublicJob::from(posting),
        structured_data,
    }))
}

/// GET /api/v1/admin/job-postings
pub async fn handle_admin_list_postings(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppQuery(query): AppQuery<AdminPostingQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobPostingStatus>)
        .transpose()
        .map_err(AppError::Validation)?;
    let (limit, offset) = page_bounds(query.limit, query.offset);
    Ok(Json(list_all(&state.db, status, limit, offset).await?))
}

/// PATCH /api/v1/admin/job-postings/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    admin: AdminSession,
    AppPath(id): AppPath<Uuid>,
    ValidatedJson(req): ValidatedJson<StatusUpdate>,
) -> Result<Json<JobPosting>, AppError> {
    let status: JobPostingStatus = req.status.parse().map_err(AppError::Validation)?;
    let posting = update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {id} not found")))?;

    info!("Admin '{}' set job posting {id} to {status}", admin.username);
    Ok(Json(posting))
}

pub async fn status_counts(state: &AppState) -> Result<Vec<StatusCount>, AppError> {
    Ok(count_by_status(&state.db)
        .await?
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect())
}
