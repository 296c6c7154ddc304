use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSessionRow {
    pub id: Uuid,
    pub target_role: Option<String>,
    pub original_text: String,
    pub summary: Option<String>,
    pub overall_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSectionRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub position: i32,
    pub section_name: String,
    pub original_text: String,
    pub enhanced_text: String,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}
