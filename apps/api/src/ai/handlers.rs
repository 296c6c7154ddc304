use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::ai::interview::{
    answer_feedback, generate_questions, AnswerFeedback, FeedbackRequest, QuestionSet,
    QuestionsRequest,
};
use crate::ai::resume::{
    analyze, enhance, load_session, save_session, truncate_resume_text, ResumeAnalysis,
    ResumeSessionDetail, ResumeTextRequest, MIN_RESUME_CHARS,
};
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::ResumeFormat;
use crate::upload::read_upload_form;
use crate::validation::{AppMultipart, AppPath, ValidatedJson};

const MAX_TARGET_ROLE_CHARS: usize = 150;

async fn enhance_and_save(
    state: &AppState,
    resume_text: &str,
    target_role: Option<&str>,
) -> Result<ResumeSessionDetail, AppError> {
    let enhancement = enhance(&state.llm, resume_text, target_role).await?;
    Ok(save_session(&state.db, resume_text, target_role, enhancement).await?)
}

/// POST /api/v1/ai/resume/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResumeTextRequest>,
) -> Result<(StatusCode, Json<ResumeSessionDetail>), AppError> {
    let detail = enhance_and_save(&state, req.resume_text.trim(), req.target_role()).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// POST /api/v1/ai/resume/enhance/upload
///
/// Multipart form: `resume` (PDF) and an optional `target_role` text part.
pub async fn handle_enhance_upload(
    State(state): State<AppState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<ResumeSessionDetail>), AppError> {
    let form = read_upload_form(&mut multipart, "resume").await?;

    if ResumeFormat::sniff(form.file.file_name.as_deref(), &form.file.bytes)
        != Some(ResumeFormat::Pdf)
    {
        return Err(AppError::Validation(
            "resume: must be a PDF file".to_string(),
        ));
    }

    let target_role = form
        .fields
        .get("target_role")
        .map(|r| r.trim())
        .filter(|r| !r.is_empty());
    if target_role.is_some_and(|r| r.chars().count() > MAX_TARGET_ROLE_CHARS) {
        return Err(AppError::Validation(
            "target_role: must be at most 150 characters".to_string(),
        ));
    }

    let bytes = form.file.bytes;
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task panicked")?
        .map_err(|e| AppError::Validation(format!("resume: could not read PDF ({e})")))?;

    let text = truncate_resume_text(extracted.trim());
    if text.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "resume: no readable text found in PDF".to_string(),
        ));
    }

    info!("Extracted {} characters from uploaded resume", text.len());

    let detail = enhance_and_save(&state, text, target_role).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/ai/resume/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ResumeSessionDetail>, AppError> {
    load_session(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume session {id} not found")))
}

/// POST /api/v1/ai/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResumeTextRequest>,
) -> Json<ResumeAnalysis> {
    Json(analyze(&state.llm, req.resume_text.trim(), req.target_role()).await)
}

/// POST /api/v1/ai/interview/questions
pub async fn handle_questions(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<QuestionsRequest>,
) -> Json<QuestionSet> {
    Json(generate_questions(&state.db, &state.llm, &req).await)
}

/// POST /api/v1/ai/interview/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FeedbackRequest>,
) -> Json<AnswerFeedback> {
    Json(answer_feedback(&state.llm, &req).await)
}
