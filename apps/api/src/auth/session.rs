//! Cookie-backed server-side sessions for admins and portal clients.
//!
//! The cookie carries a random token; the `sessions` table stores only its
//! SHA-256 hex digest together with the fields handlers need (user or client
//! id, username, admin flag). A row past `expires_at` is treated as absent.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::SessionRow;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Admin,
    Client,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Admin => "admin",
            SessionKind::Client => "client",
        }
    }
}

/// Fields written into a fresh session row.
pub struct NewSession<'a> {
    pub kind: SessionKind,
    pub user_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub username: &'a str,
    pub is_admin: bool,
}

/// Returns `(plaintext_token, sha256_hex_hash)`. Only the hash is persisted.
pub fn generate_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stores a new session and returns the plaintext token for the cookie.
/// Expired rows are purged on the way in.
pub async fn create_session(
    pool: &PgPool,
    session: NewSession<'_>,
    ttl_hours: i64,
) -> Result<String, sqlx::Error> {
    let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
        .execute(pool)
        .await?
        .rows_affected();
    if purged > 0 {
        debug!("Purged {purged} expired sessions");
    }

    let (token, token_hash) = generate_token();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query(
        r#"
        INSERT INTO sessions (token_hash, kind, user_id, client_id, username, is_admin, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&token_hash)
    .bind(session.kind.as_str())
    .bind(session.user_id)
    .bind(session.client_id)
    .bind(session.username)
    .bind(session.is_admin)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(token)
}

pub async fn find_session(pool: &PgPool, token: &str) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT kind, user_id, client_id, username, is_admin
        FROM sessions
        WHERE token_hash = $1 AND expires_at > NOW()
        "#,
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(hash_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// An authenticated admin. Extracting it rejects with 401 when there is no
/// live session and 403 when the session does not belong to an admin.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// An authenticated portal client.
#[derive(Debug, Clone)]
pub struct ClientSession {
    pub client_id: Uuid,
    pub email: String,
}

fn authorize_admin(row: SessionRow) -> Result<AdminSession, AppError> {
    if row.kind != SessionKind::Admin.as_str() || !row.is_admin {
        return Err(AppError::Forbidden);
    }
    let id = row
        .user_id
        .ok_or_else(|| AppError::Unauthorized("Session is not bound to a user".to_string()))?;
    Ok(AdminSession {
        id,
        username: row.username,
        is_admin: row.is_admin,
    })
}

fn authorize_client(row: SessionRow) -> Result<ClientSession, AppError> {
    if row.kind != SessionKind::Client.as_str() {
        return Err(AppError::Forbidden);
    }
    let client_id = row
        .client_id
        .ok_or_else(|| AppError::Unauthorized("Session is not bound to a client".to_string()))?;
    Ok(ClientSession {
        client_id,
        email: row.username,
    })
}

async fn load_session(parts: &Parts, state: &AppState) -> Result<SessionRow, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = token_from_jar(&jar)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    find_session(&state.db, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Session expired or invalid".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize_admin(load_session(parts, state).await?)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ClientSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize_client(load_session(parts, state).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, is_admin: bool) -> SessionRow {
        SessionRow {
            kind: kind.to_string(),
            user_id: Some(Uuid::new_v4()),
            client_id: Some(Uuid::new_v4()),
            username: "recruiter".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_token_hash_is_stable_sha256_hex() {
        let (plaintext, hash) = generate_token();
        assert_eq!(hash, hash_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_ne!(plaintext, hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token().0, generate_token().0);
    }

    #[test]
    fn test_admin_session_accepted() {
        let session = authorize_admin(row("admin", true)).unwrap();
        assert_eq!(session.username, "recruiter");
        assert!(session.is_admin);
    }

    #[test]
    fn test_non_admin_user_is_forbidden() {
        assert!(matches!(
            authorize_admin(row("admin", false)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_client_session_cannot_reach_admin() {
        assert!(matches!(
            authorize_admin(row("client", false)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_session_cannot_reach_portal() {
        assert!(matches!(
            authorize_client(row("admin", true)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_client_session_accepted() {
        let mut r = row("client", false);
        r.username = "hr@acme.example".to_string();
        let session = authorize_client(r).unwrap();
        assert_eq!(session.email, "hr@acme.example");
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("abc".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
