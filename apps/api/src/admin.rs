//! Admin dashboard summary.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::session::AdminSession;
use crate::errors::AppError;
use crate::jobs::handlers::{status_counts, StatusCount};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub contacts: i64,
    pub applications: i64,
    pub clients: i64,
    pub job_postings: Vec<StatusCount>,
}

/// GET /api/v1/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<DashboardStats>, AppError> {
    let contacts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_submissions")
        .fetch_one(&state.db)
        .await?;
    let applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
        .fetch_one(&state.db)
        .await?;
    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(DashboardStats {
        contacts,
        applications,
        clients,
        job_postings: status_counts(&state).await?,
    }))
}
