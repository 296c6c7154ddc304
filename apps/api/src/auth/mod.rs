//! Admin accounts and session authentication.
//!
//! - [`password`] -- Argon2id hashing.
//! - [`session`] -- cookie sessions and the `AdminSession` / `ClientSession` extractors.
//! - [`handlers`] -- login, logout, `me`, and admin user creation.

pub mod handlers;
pub mod password;
pub mod session;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::AdminCredentials;
use crate::models::user::User;

pub async fn find_user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, password_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await
}

/// Creates the configured admin account on first start. An existing username
/// is left untouched, so changing `ADMIN_PASSWORD` later has no effect.
pub async fn ensure_bootstrap_admin(pool: &PgPool, creds: &AdminCredentials) -> Result<()> {
    if find_user_by_username(pool, &creds.username).await?.is_some() {
        info!("Bootstrap admin '{}' already exists", creds.username);
        return Ok(());
    }
    password::validate_password_strength(&creds.password).map_err(anyhow::Error::msg)?;
    let hash = password::hash_blocking(creds.password.clone()).await?;
    insert_user(pool, &creds.username, &hash, true).await?;
    info!("Created bootstrap admin '{}'", creds.username);
    Ok(())
}
