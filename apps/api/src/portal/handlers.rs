use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::session::{
    create_session, session_cookie, AdminSession, ClientSession, NewSession, SessionKind,
};
use crate::email::{dispatch_all, templates::job_posting_emails};
use crate::errors::AppError;
use crate::jobs::{insert_job_posting, list_for_client, JobDetails, PostingContact};
use crate::models::client::{Client, ClientProfile};
use crate::models::job::JobPosting;
use crate::portal::{
    access_code_matches, find_client, find_client_by_email, generate_access_code,
    insert_client, list_clients, ClientLoginRequest, CreateClientRequest,
};
use crate::state::AppState;
use crate::validation::ValidatedJson;

const BAD_ACCESS: &str = "Invalid email or access code";

#[derive(Debug, Serialize)]
pub struct PortalOverview {
    pub client: ClientProfile,
    pub job_postings: Vec<JobPosting>,
}

/// POST /api/v1/admin/clients
pub async fn handle_create_client(
    State(state): State<AppState>,
    admin: AdminSession,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let access_code = req
        .access_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_access_code);

    let client = insert_client(&state.db, &req, &access_code)
        .await
        .map_err(|e| AppError::from_insert(e, "A client with this email already exists"))?;

    info!("Admin '{}' created client {}", admin.username, client.company_name);
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/admin/clients
pub async fn handle_list_clients(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(list_clients(&state.db).await?))
}

/// POST /api/v1/client/login
pub async fn handle_client_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<ClientLoginRequest>,
) -> Result<(CookieJar, Json<ClientProfile>), AppError> {
    let client = match find_client_by_email(&state.db, &req.email).await? {
        Some(client) if access_code_matches(&client, &req.access_code) => client,
        _ => {
            warn!("Client login failed for '{}'", req.email.trim());
            return Err(AppError::Unauthorized(BAD_ACCESS.to_string()));
        }
    };

    let token = create_session(
        &state.db,
        NewSession {
            kind: SessionKind::Client,
            user_id: None,
            client_id: Some(client.id),
            username: &client.email,
            is_admin: false,
        },
        state.config.session_ttl_hours,
    )
    .await?;

    info!("Client '{}' signed in to the portal", client.company_name);
    Ok((
        jar.add(session_cookie(token, state.config.cookie_secure)),
        Json(ClientProfile::from(client)),
    ))
}

async fn current_client(state: &AppState, session: &ClientSession) -> Result<Client, AppError> {
    find_client(&state.db, session.client_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Client account no longer exists".to_string()))
}

/// GET /api/v1/client/portal
pub async fn handle_portal(
    State(state): State<AppState>,
    session: ClientSession,
) -> Result<Json<PortalOverview>, AppError> {
    let client = current_client(&state, &session).await?;
    let job_postings = list_for_client(&state.db, client.id).await?;
    Ok(Json(PortalOverview {
        client: ClientProfile::from(client),
        job_postings,
    }))
}

/// POST /api/v1/client/job-postings
///
/// Company and contact details come from the client record.
pub async fn handle_client_job_posting(
    State(state): State<AppState>,
    session: ClientSession,
    ValidatedJson(job): ValidatedJson<JobDetails>,
) -> Result<(StatusCode, Json<JobPosting>), AppError> {
    let client = current_client(&state, &session).await?;
    let posting = insert_job_posting(
        &state.db,
        PostingContact {
            client_id: Some(client.id),
            company_name: &client.company_name,
            contact_name: &client.contact_name,
            contact_email: &client.email,
            contact_phone: None,
        },
        &job,
    )
    .await?;

    info!("Client '{}' submitted job posting {}", client.company_name, posting.id);
    dispatch_all(
        &state.mailer,
        job_posting_emails(&state.config.site, state.admin_notify(), &posting),
    );

    Ok((StatusCode::CREATED, Json(posting)))
}
