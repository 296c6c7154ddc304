//! Job postings: employer intake, the informal status pipeline, and the
//! public job board built from postings in the `posted` state.

pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::job::JobPosting;
use crate::validation::{invalid, not_blank, trim_whitespace};

/// Where a posting sits in the recruiting pipeline. Admins may move a posting
/// to any status; the usual order is the declaration order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostingStatus {
    New,
    Contacted,
    ContractPending,
    Posted,
    Closed,
}

impl JobPostingStatus {
    pub const ALL: [JobPostingStatus; 5] = [
        JobPostingStatus::New,
        JobPostingStatus::Contacted,
        JobPostingStatus::ContractPending,
        JobPostingStatus::Posted,
        JobPostingStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobPostingStatus::New => "new",
            JobPostingStatus::Contacted => "contacted",
            JobPostingStatus::ContractPending => "contract_pending",
            JobPostingStatus::Posted => "posted",
            JobPostingStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for JobPostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobPostingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("Unknown status '{s}'. Expected one of: {}", allowed.join(", "))
            })
    }
}

pub const EMPLOYMENT_TYPES: &[&str] = &["full_time", "part_time", "contract", "temporary", "temp_to_perm"];

fn valid_employment_type(value: &str) -> Result<(), ValidationError> {
    if EMPLOYMENT_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            "employment_type",
            "must be one of full_time, part_time, contract, temporary, temp_to_perm",
        ))
    }
}

/// The role itself. Shared by the public intake form and the client portal.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobDetails {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 2, max = 150), custom(function = "not_blank"))]
    pub title: String,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 2, max = 150), custom(function = "not_blank"))]
    pub location: String,
    #[validate(custom(function = "valid_employment_type"))]
    pub employment_type: String,
    #[validate(length(max = 100))]
    pub salary_range: Option<String>,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(
        length(min = 20, max = 10000, message = "must be 20-10000 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,
    #[validate(length(max = 5000))]
    pub requirements: Option<String>,
}

/// Public employer intake: who is hiring plus the role.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobPostingRequest {
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub company_name: String,
    #[serde(deserialize_with = "trim_whitespace")]
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub contact_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub contact_email: String,
    #[validate(length(max = 30))]
    pub contact_phone: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub job: JobDetails,
}

/// Employer contact fields written alongside a posting.
pub struct PostingContact<'a> {
    pub client_id: Option<Uuid>,
    pub company_name: &'a str,
    pub contact_name: &'a str,
    pub contact_email: &'a str,
    pub contact_phone: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub location: Option<String>,
    pub employment_type: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn insert_job_posting(
    pool: &PgPool,
    contact: PostingContact<'_>,
    job: &JobDetails,
) -> Result<JobPosting, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        r#"
        INSERT INTO job_postings
            (id, client_id, company_name, contact_name, contact_email, contact_phone,
             title, location, employment_type, salary_range, description, requirements, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(contact.client_id)
    .bind(contact.company_name.trim())
    .bind(contact.contact_name.trim())
    .bind(contact.contact_email.trim())
    .bind(contact.contact_phone.map(str::trim))
    .bind(job.title.trim())
    .bind(job.location.trim())
    .bind(&job.employment_type)
    .bind(trimmed(&job.salary_range))
    .bind(job.description.trim())
    .bind(trimmed(&job.requirements))
    .bind(JobPostingStatus::New.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_posted(pool: &PgPool, filter: &JobFilter) -> Result<Vec<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        r#"
        SELECT * FROM job_postings
        WHERE status = $1
          AND ($2::text IS NULL OR strpos(LOWER(location), LOWER($2)) > 0)
          AND ($3::text IS NULL OR LOWER(employment_type) = LOWER($3))
        ORDER BY updated_at DESC, created_at DESC
        "#,
    )
    .bind(JobPostingStatus::Posted.as_str())
    .bind(trimmed(&filter.location))
    .bind(trimmed(&filter.employment_type))
    .fetch_all(pool)
    .await
}

pub async fn find_posted(pool: &PgPool, id: Uuid) -> Result<Option<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>("SELECT * FROM job_postings WHERE id = $1 AND status = $2")
        .bind(id)
        .bind(JobPostingStatus::Posted.as_str())
        .fetch_optional(pool)
        .await
}

pub async fn list_all(
    pool: &PgPool,
    status: Option<JobPostingStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        r#"
        SELECT * FROM job_postings
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(status.map(JobPostingStatus::as_str))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn list_for_client(pool: &PgPool, client_id: Uuid) -> Result<Vec<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        "SELECT * FROM job_postings WHERE client_id = $1 ORDER BY created_at DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: JobPostingStatus,
) -> Result<Option<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        "UPDATE job_postings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}

/// `(status, count)` for every status, zero-filled.
pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM job_postings GROUP BY status")
            .fetch_all(pool)
            .await?;
    Ok(JobPostingStatus::ALL
        .iter()
        .map(|status| {
            let count = rows
                .iter()
                .find(|(s, _)| s == status.as_str())
                .map(|(_, c)| *c)
                .unwrap_or(0);
            (status.as_str().to_string(), count)
        })
        .collect())
}
