pub mod health;

#[cfg(test)]
mod db_tests;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::storage::MAX_RESUME_BYTES;
use crate::{admin, ai, auth, intake, jobs, portal, question_bank, seo};

/// Multipart bodies carry the file plus boundaries and small text fields.
const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::readiness_handler))
        // SEO artifacts
        .route("/sitemap.xml", get(seo::handlers::handle_sitemap))
        .route("/robots.txt", get(seo::handlers::handle_robots))
        .route("/api/v1/seo/pages/:slug", get(seo::handlers::handle_page_meta))
        .route(
            "/api/v1/seo/organization",
            get(seo::handlers::handle_organization),
        )
        // Public intake
        .route("/api/v1/contact", post(intake::handlers::handle_contact))
        .route(
            "/api/v1/applications",
            post(intake::handlers::handle_application),
        )
        .route(
            "/api/v1/applications/:id/resume",
            post(intake::handlers::handle_resume_upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/jobs", get(jobs::handlers::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        .route(
            "/api/v1/job-postings",
            post(jobs::handlers::handle_submit_job_posting),
        )
        // Interview question bank
        .route(
            "/api/v1/interview/categories",
            get(question_bank::handlers::handle_list_categories),
        )
        .route(
            "/api/v1/interview/categories/:slug/questions",
            get(question_bank::handlers::handle_list_questions),
        )
        // AI tools
        .route("/api/v1/ai/resume/enhance", post(ai::handlers::handle_enhance))
        .route(
            "/api/v1/ai/resume/enhance/upload",
            post(ai::handlers::handle_enhance_upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/v1/ai/resume/analyze", post(ai::handlers::handle_analyze))
        .route(
            "/api/v1/ai/resume/sessions/:id",
            get(ai::handlers::handle_get_session),
        )
        .route(
            "/api/v1/ai/interview/questions",
            post(ai::handlers::handle_questions),
        )
        .route(
            "/api/v1/ai/interview/feedback",
            post(ai::handlers::handle_feedback),
        )
        // Admin auth
        .route("/api/v1/auth/login", post(auth::handlers::handle_login))
        .route("/api/v1/auth/logout", post(auth::handlers::handle_logout))
        .route("/api/v1/auth/me", get(auth::handlers::handle_me))
        // Admin back-office
        .route(
            "/api/v1/admin/contacts",
            get(intake::handlers::handle_admin_contacts),
        )
        .route(
            "/api/v1/admin/applications",
            get(intake::handlers::handle_admin_applications),
        )
        .route(
            "/api/v1/admin/job-postings",
            get(jobs::handlers::handle_admin_list_postings),
        )
        .route(
            "/api/v1/admin/job-postings/:id/status",
            patch(jobs::handlers::handle_update_status),
        )
        .route(
            "/api/v1/admin/clients",
            get(portal::handlers::handle_list_clients).post(portal::handlers::handle_create_client),
        )
        .route("/api/v1/admin/users", post(auth::handlers::handle_create_user))
        .route("/api/v1/admin/stats", get(admin::handle_stats))
        .route(
            "/api/v1/admin/interview/categories",
            post(question_bank::handlers::handle_create_category),
        )
        .route(
            "/api/v1/admin/interview/questions",
            post(question_bank::handlers::handle_create_question),
        )
        // Client portal
        .route(
            "/api/v1/client/login",
            post(portal::handlers::handle_client_login),
        )
        .route("/api/v1/client/logout", post(auth::handlers::handle_logout))
        .route("/api/v1/client/portal", get(portal::handlers::handle_portal))
        .route(
            "/api/v1/client/job-postings",
            post(portal::handlers::handle_client_job_posting),
        )
        .with_state(state)
}
