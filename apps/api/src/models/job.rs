use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub company_name: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public face of a posted job. Employer contact details stay internal.
#[derive(Debug, Clone, Serialize)]
pub struct PublicJob {
    pub id: Uuid,
    pub company_name: String,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub posted_at: DateTime<Utc>,
}

impl From<JobPosting> for PublicJob {
    fn from(posting: JobPosting) -> Self {
        Self {
            id: posting.id,
            company_name: posting.company_name,
            title: posting.title,
            location: posting.location,
            employment_type: posting.employment_type,
            salary_range: posting.salary_range,
            description: posting.description,
            requirements: posting.requirements,
            posted_at: posting.updated_at,
        }
    }
}
