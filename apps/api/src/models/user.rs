use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// The parts of a live `sessions` row that authorization reads.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub kind: String,
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub username: String,
    pub is_admin: bool,
}
