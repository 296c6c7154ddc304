use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_blocking, validate_password_strength, verify_blocking};
use crate::auth::session::{
    create_session, delete_session, removal_cookie, session_cookie, token_from_jar,
    AdminSession, NewSession, SessionKind,
};
use crate::auth::{find_user_by_username, insert_user};
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::ValidatedJson;

const BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<SessionUser>), AppError> {
    let username = req.username.trim();
    let Some(user) = find_user_by_username(&state.db, username).await? else {
        warn!("Login failed: unknown username '{username}'");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    if !verify_blocking(req.password, user.password_hash.clone()).await? {
        warn!("Login failed: wrong password for '{username}'");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    if !user.is_admin {
        warn!("Login refused: '{username}' is not an admin");
        return Err(AppError::Forbidden);
    }

    let token = create_session(
        &state.db,
        NewSession {
            kind: SessionKind::Admin,
            user_id: Some(user.id),
            client_id: None,
            username: &user.username,
            is_admin: user.is_admin,
        },
        state.config.session_ttl_hours,
    )
    .await?;

    info!("Admin '{}' logged in", user.username);

    Ok((
        jar.add(session_cookie(token, state.config.cookie_secure)),
        Json(SessionUser {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }),
    ))
}

/// POST /api/v1/auth/logout and POST /api/v1/client/logout
///
/// Always succeeds; a missing or unknown cookie is not an error.
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(token) = token_from_jar(&jar) {
        delete_session(&state.db, &token).await?;
    }
    Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT))
}

/// GET /api/v1/auth/me
pub async fn handle_me(session: AdminSession) -> Json<SessionUser> {
    Json(SessionUser {
        id: session.id,
        username: session.username,
        is_admin: session.is_admin,
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 100, message = "must be 3-100 characters"))]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// POST /api/v1/admin/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    admin: AdminSession,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<SessionUser>), AppError> {
    validate_password_strength(&req.password).map_err(AppError::Validation)?;

    let hash = hash_blocking(req.password).await?;
    let user = insert_user(&state.db, req.username.trim(), &hash, req.is_admin)
        .await
        .map_err(|e| AppError::from_insert(e, "Username is already taken"))?;

    info!("Admin '{}' created user '{}'", admin.username, user.username);

    Ok((
        StatusCode::CREATED,
        Json(SessionUser {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }),
    ))
}
