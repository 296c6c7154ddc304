//! Client portal: employers sign in with their email and a shared access code
//! issued by an admin, then see and submit their own job postings.

pub mod handlers;

use rand::Rng;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::client::Client;
use crate::validation::not_blank;

pub const ACCESS_CODE_LEN: usize = 8;
/// Uppercase letters and digits without the easily confused 0/O and 1/I.
const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| ACCESS_CODE_ALPHABET[rng.gen_range(0..ACCESS_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Plain string equality, after trimming what the user typed.
pub fn access_code_matches(client: &Client, submitted: &str) -> bool {
    client.access_code == submitted.trim()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub contact_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 64, message = "must be 6-64 characters"))]
    pub access_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClientLoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 64, message = "is required"))]
    pub access_code: String,
}

pub async fn insert_client(
    pool: &PgPool,
    req: &CreateClientRequest,
    access_code: &str,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (id, company_name, contact_name, email, access_code)
        VALUES ($1, $2, $3, LOWER($4), $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.company_name.trim())
    .bind(req.contact_name.trim())
    .bind(req.email.trim())
    .bind(access_code)
    .fetch_one(pool)
    .await
}

pub async fn list_clients(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY company_name")
        .fetch_all(pool)
        .await
}

pub async fn find_client_by_email(pool: &PgPool, email: &str) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = LOWER($1)")
        .bind(email.trim())
        .fetch_optional(pool)
        .await
}

pub async fn find_client(pool: &PgPool, id: Uuid) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn client(code: &str) -> Client {
        Client {
            id: Uuid::new_v4(),
            company_name: "Acme Logistics".into(),
            contact_name: "Pat".into(),
            email: "pat@acme.example".into(),
            access_code: code.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generated_codes_use_alphabet() {
        let code = generate_access_code();
        assert_eq!(code.len(), ACCESS_CODE_LEN);
        assert!(code.bytes().all(|b| ACCESS_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_access_code_match_is_exact() {
        let c = client("K7PQ2MZX");
        assert!(access_code_matches(&c, "K7PQ2MZX"));
        assert!(access_code_matches(&c, " K7PQ2MZX\n"));
        assert!(!access_code_matches(&c, "k7pq2mzx"));
        assert!(!access_code_matches(&c, "K7PQ2MZ"));
        assert!(!access_code_matches(&c, ""));
    }

    #[test]
    fn test_custom_code_too_short_rejected() {
        let req = CreateClientRequest {
            company_name: "Acme".into(),
            contact_name: "Pat".into(),
            email: "pat@acme.example".into(),
            access_code: Some("abc".into()),
        };
        assert!(req.validate().is_err());
    }
}
