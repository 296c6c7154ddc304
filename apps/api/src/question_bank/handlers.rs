use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::session::AdminSession;
use crate::errors::AppError;
use crate::models::interview::{Question, QuestionCategory};
use crate::question_bank::{
    category_exists, find_category_by_slug, insert_category, insert_question, list_categories,
    list_questions, slugify, CreateCategoryRequest, CreateQuestionRequest, DIFFICULTIES,
};
use crate::state::AppState;
use crate::validation::{AppPath, AppQuery, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    pub difficulty: Option<String>,
}

/// GET /api/v1/interview/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionCategory>>, AppError> {
    Ok(Json(list_categories(&state.db).await?))
}

/// GET /api/v1/interview/categories/:slug/questions
pub async fn handle_list_questions(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
    AppQuery(query): AppQuery<QuestionQuery>,
) -> Result<Json<Vec<Question>>, AppError> {
    let difficulty = query.difficulty.as_deref().map(str::trim);
    if let Some(d) = difficulty {
        if !DIFFICULTIES.contains(&d) {
            return Err(AppError::Validation(
                "difficulty: must be one of easy, medium, hard".to_string(),
            ));
        }
    }

    let category = find_category_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;

    Ok(Json(list_questions(&state.db, category.id, difficulty).await?))
}

/// POST /api/v1/admin/interview/categories
pub async fn handle_create_category(
    State(state): State<AppState>,
    admin: AdminSession,
    ValidatedJson(req): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<QuestionCategory>), AppError> {
    let slug = slugify(&req.name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "name: must contain at least one letter or digit".to_string(),
        ));
    }

    let category = insert_category(&state.db, &req, &slug)
        .await
        .map_err(|e| AppError::from_insert(e, "A category with this name already exists"))?;

    info!("Admin '{}' created question category '{}'", admin.username, category.slug);
    Ok((StatusCode::CREATED, Json(category)))
}

/// POST /api/v1/admin/interview/questions
pub async fn handle_create_question(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(req): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    if !category_exists(&state.db, req.category_id).await? {
        return Err(AppError::NotFound(format!(
            "Category {} not found",
            req.category_id
        )));
    }
    let question = insert_question(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(question)))
}
