//! Public intake: the contact form and job applications.

pub mod handlers;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::submission::{ContactSubmission, JobApplication};
use crate::validation::{invalid, not_blank, trim_whitespace};

pub const INQUIRY_TYPES: &[&str] = &["general", "employer", "candidate"];

fn default_inquiry_type() -> String {
    "general".to_string()
}

fn valid_inquiry_type(value: &str) -> Result<(), ValidationError> {
    if INQUIRY_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "inquiry_type",
            "must be one of general, employer, candidate",
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 150))]
    pub company: Option<String>,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(
        length(min = 10, max = 5000, message = "must be 10-5000 characters"),
        custom(function = "not_blank")
    )]
    pub message: String,
    #[serde(default = "default_inquiry_type")]
    #[validate(custom(function = "valid_inquiry_type"))]
    pub inquiry_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationRequest {
    pub job_posting_id: Option<Uuid>,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub position: String,
    #[validate(range(min = 0, max = 60, message = "must be between 0 and 60"))]
    pub experience_years: Option<i32>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
}

/// Trims optional text and maps blank values to `None`.
fn clean(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn insert_contact(pool: &PgPool, req: &ContactRequest) -> Result<ContactSubmission, sqlx::Error> {
    sqlx::query_as::<_, ContactSubmission>(
        r#"
        INSERT INTO contact_submissions
            (id, name, email, phone, company, subject, message, inquiry_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(clean(&req.phone))
    .bind(clean(&req.company))
    .bind(clean(&req.subject))
    .bind(req.message.trim())
    .bind(&req.inquiry_type)
    .fetch_one(pool)
    .await
}

pub async fn insert_application(
    pool: &PgPool,
    req: &ApplicationRequest,
) -> Result<JobApplication, sqlx::Error> {
    sqlx::query_as::<_, JobApplication>(
        r#"
        INSERT INTO job_applications
            (id, job_posting_id, full_name, email, phone, position, experience_years, cover_letter)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.job_posting_id)
    .bind(req.full_name.trim())
    .bind(req.email.trim())
    .bind(clean(&req.phone))
    .bind(req.position.trim())
    .bind(req.experience_years)
    .bind(clean(&req.cover_letter))
    .fetch_one(pool)
    .await
}

pub async fn find_application(pool: &PgPool, id: Uuid) -> Result<Option<JobApplication>, sqlx::Error> {
    sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn set_resume_key(
    pool: &PgPool,
    id: Uuid,
    key: &str,
) -> Result<JobApplication, sqlx::Error> {
    sqlx::query_as::<_, JobApplication>(
        "UPDATE job_applications SET resume_key = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(key)
    .fetch_one(pool)
    .await
}

pub async fn list_contacts(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<ContactSubmission>, sqlx::Error> {
    sqlx::query_as::<_, ContactSubmission>(
        "SELECT * FROM contact_submissions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn list_applications(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobApplication>, sqlx::Error> {
    sqlx::query_as::<_, JobApplication>(
        "SELECT * FROM job_applications ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::describe_errors;
    use serde_json::json;

    fn contact(value: serde_json::Value) -> ContactRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_well_formed_contact_passes() {
        let req = contact(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "message": "Looking for bilingual call-centre staff."
        }));
        assert!(req.validate().is_ok());
        assert_eq!(req.inquiry_type, "general");
    }

    #[test]
    fn test_malformed_contact_reports_each_field() {
        let req = contact(json!({
            "name": "",
            "email": "jane-at-example",
            "message": "hi",
            "inquiry_type": "spam"
        }));
        let described = describe_errors(&req.validate().unwrap_err());
        assert!(described.contains("email: must be a valid email address"));
        assert!(described.contains("inquiry_type: must be one of general, employer, candidate"));
        assert!(described.contains("message: must be 10-5000 characters"));
        assert!(described.contains("name:"));
    }

    #[test]
    fn test_whitespace_message_is_rejected() {
        let req = contact(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "message": "            "
        }));
        assert_eq!(req.message, "");
        let described = describe_errors(&req.validate().unwrap_err());
        assert!(described.contains("message: must be 10-5000 characters"));
        assert!(described.contains("message: must not be blank"));
    }

    #[test]
    fn test_contact_text_is_stored_trimmed() {
        let req = contact(json!({
            "name": "  Jane Doe ",
            "email": "jane@example.com",
            "message": "\n  Need two welders next week.  \n"
        }));
        assert!(req.validate().is_ok());
        assert_eq!(req.name, "Jane Doe");
        assert_eq!(req.message, "Need two welders next week.");
    }

    #[test]
    fn test_application_experience_range() {
        let req: ApplicationRequest = serde_json::from_value(json!({
            "full_name": "Sam Lee",
            "email": "sam@example.com",
            "position": "Welder",
            "experience_years": 75
        }))
        .unwrap();
        let described = describe_errors(&req.validate().unwrap_err());
        assert_eq!(described, "experience_years: must be between 0 and 60");
    }

    #[test]
    fn test_application_minimal_passes() {
        let req: ApplicationRequest = serde_json::from_value(json!({
            "full_name": "Sam Lee",
            "email": "sam@example.com",
            "position": "Welder"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.job_posting_id.is_none());
    }

    #[test]
    fn test_clean_maps_blank_to_none() {
        assert_eq!(clean(&Some("   ".into())), None);
        assert_eq!(clean(&Some(" Acme ".into())), Some("Acme"));
    }
}
