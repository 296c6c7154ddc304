use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::seo::sitemap::{robots_txt, sitemap_xml};
use crate::seo::structured::organization_json_ld;
use crate::seo::{page_meta, PageMeta};
use crate::state::AppState;
use crate::validation::AppPath;

/// GET /api/v1/seo/pages/:slug
pub async fn handle_page_meta(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<PageMeta>, AppError> {
    page_meta(&slug, &state.config.site_url, &state.config.site)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Page '{slug}' not found")))
}

/// GET /api/v1/seo/organization
pub async fn handle_organization(State(state): State<AppState>) -> Json<Value> {
    Json(organization_json_ld(&state.config.site_url, &state.config.site))
}

/// GET /sitemap.xml
pub async fn handle_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&state.config.site_url),
    )
}

/// GET /robots.txt
pub async fn handle_robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.site_url),
    )
}
