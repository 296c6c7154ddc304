//! Interview practice question bank, grouped by category.

pub mod handlers;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::interview::{Question, QuestionCategory};
use crate::validation::{invalid, not_blank};

pub const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

fn valid_difficulty(value: &str) -> Result<(), ValidationError> {
    if DIFFICULTIES.contains(&value) {
        Ok(())
    } else {
        Err(invalid("difficulty", "must be one of easy, medium, hard"))
    }
}

/// Lowercase ASCII slug: alphanumerics kept, every other run collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 80), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub category_id: Uuid,
    #[validate(length(min = 10, max = 1000), custom(function = "not_blank"))]
    pub question: String,
    #[validate(custom(function = "valid_difficulty"))]
    pub difficulty: String,
    #[validate(length(max = 2000))]
    pub tips: Option<String>,
    #[validate(length(max = 5000))]
    pub sample_answer: Option<String>,
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<QuestionCategory>, sqlx::Error> {
    sqlx::query_as::<_, QuestionCategory>("SELECT * FROM question_categories ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_category_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<QuestionCategory>, sqlx::Error> {
    sqlx::query_as::<_, QuestionCategory>("SELECT * FROM question_categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn category_exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM question_categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn insert_category(
    pool: &PgPool,
    req: &CreateCategoryRequest,
    slug: &str,
) -> Result<QuestionCategory, sqlx::Error> {
    sqlx::query_as::<_, QuestionCategory>(
        r#"
        INSERT INTO question_categories (id, name, slug, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(slug)
    .bind(req.description.as_deref().map(str::trim))
    .fetch_one(pool)
    .await
}

pub async fn insert_question(pool: &PgPool, req: &CreateQuestionRequest) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (id, category_id, question, difficulty, tips, sample_answer)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.category_id)
    .bind(req.question.trim())
    .bind(&req.difficulty)
    .bind(req.tips.as_deref())
    .bind(req.sample_answer.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn list_questions(
    pool: &PgPool,
    category_id: Uuid,
    difficulty: Option<&str>,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT * FROM questions
        WHERE category_id = $1 AND ($2::text IS NULL OR difficulty = $2)
        ORDER BY created_at
        "#,
    )
    .bind(category_id)
    .bind(difficulty)
    .fetch_all(pool)
    .await
}

/// Random sample used when the language model is unavailable. The category
/// filter matches either the slug or the display name, case-insensitively.
pub async fn random_questions(
    pool: &PgPool,
    category: Option<&str>,
    difficulty: Option<&str>,
    count: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT q.* FROM questions q
        JOIN question_categories c ON c.id = q.category_id
        WHERE ($1::text IS NULL OR c.slug = LOWER($1) OR LOWER(c.name) = LOWER($1))
          AND ($2::text IS NULL OR q.difficulty = $2)
        ORDER BY RANDOM()
        LIMIT $3
        "#,
    )
    .bind(category)
    .bind(difficulty)
    .bind(count)
    .fetch_all(pool)
    .await
}
