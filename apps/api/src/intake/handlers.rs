use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::session::AdminSession;
use crate::db::page_bounds;
use crate::email::dispatch_all;
use crate::email::templates::{application_emails, contact_emails};
use crate::errors::AppError;
use crate::intake::{
    find_application, insert_application, insert_contact, list_applications, list_contacts,
    set_resume_key, ApplicationRequest, ContactRequest,
};
use crate::jobs::find_posted;
use crate::models::submission::{ContactSubmission, JobApplication};
use crate::state::AppState;
use crate::storage::ResumeFormat;
use crate::upload::read_upload_form;
use crate::validation::{AppMultipart, AppPath, AppQuery, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactSubmission>), AppError> {
    let contact = insert_contact(&state.db, &req).await?;
    info!("Contact submission {} ({})", contact.id, contact.inquiry_type);

    dispatch_all(
        &state.mailer,
        contact_emails(&state.config.site, state.admin_notify(), &contact),
    );

    Ok((StatusCode::CREATED, Json(contact)))
}

/// POST /api/v1/applications
pub async fn handle_application(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    if let Some(job_id) = req.job_posting_id {
        if find_posted(&state.db, job_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Job {job_id} not found")));
        }
    }

    let application = insert_application(&state.db, &req).await?;
    info!(
        "Application {} for '{}'",
        application.id, application.position
    );

    dispatch_all(
        &state.mailer,
        application_emails(&state.config.site, state.admin_notify(), &application),
    );

    Ok((StatusCode::CREATED, Json(application)))
}

/// POST /api/v1/applications/:id/resume
///
/// Multipart form with a `resume` file part (PDF, DOC or DOCX).
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<JobApplication>, AppError> {
    if find_application(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    let upload = read_upload_form(&mut multipart, "resume").await?.file;
    let format = ResumeFormat::sniff(upload.file_name.as_deref(), &upload.bytes).ok_or_else(
        || AppError::Validation("resume: must be a PDF, DOC or DOCX file".to_string()),
    )?;

    let key = format!("applications/{id}/{}.{}", Uuid::new_v4(), format.extension());
    state
        .resumes
        .put(&key, upload.bytes, format.content_type())
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    Ok(Json(set_resume_key(&state.db, id, &key).await?))
}

/// GET /api/v1/admin/contacts
pub async fn handle_admin_contacts(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<Vec<ContactSubmission>>, AppError> {
    let (limit, offset) = page_bounds(page.limit, page.offset);
    Ok(Json(list_contacts(&state.db, limit, offset).await?))
}

/// GET /api/v1/admin/applications
pub async fn handle_admin_applications(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppQuery(page): AppQuery<PageQuery>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let (limit, offset) = page_bounds(page.limit, page.offset);
    Ok(Json(list_applications(&state.db, limit, offset).await?))
}
