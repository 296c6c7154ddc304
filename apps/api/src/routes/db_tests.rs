//! Router tests against a real database. Each test gets a fresh, migrated
//! database from `#[sqlx::test]` (needs `DATABASE_URL` pointing at Postgres).

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use super::build_router;
use crate::ai::resume::load_session;
use crate::auth::insert_user;
use crate::auth::password::hash_password;
use crate::auth::session::{find_session, generate_token};
use crate::jobs::{insert_job_posting, update_status, JobDetails, JobPostingStatus, PostingContact};
use crate::models::job::JobPosting;
use crate::state::testing::state_with_pool;

const ADMIN_PASSWORD: &str = "correct-horse-42";

fn app(pool: &PgPool) -> Router {
    let (state, _) = state_with_pool(pool.clone());
    build_router(state)
}

async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(pool: &PgPool, req: Request<Body>) -> Response {
    app(pool).oneshot(req).await.unwrap()
}

/// `name=value` of the first `Set-Cookie` header, ready for a `Cookie` header.
fn cookie_from(response: &Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn create_user(pool: &PgPool, username: &str, is_admin: bool) {
    let hash = hash_password(ADMIN_PASSWORD).expect("hashing should succeed");
    insert_user(pool, username, &hash, is_admin)
        .await
        .expect("user creation should succeed");
}

async fn admin_cookie(pool: &PgPool) -> String {
    create_user(pool, "recruiter", true).await;
    let response = send(
        pool,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "recruiter", "password": ADMIN_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_from(&response)
}

fn job_details(location: &str) -> JobDetails {
    serde_json::from_value(json!({
        "title": "Forklift Operator",
        "location": location,
        "employment_type": "full_time",
        "description": "Day shift forklift work in a busy distribution centre."
    }))
    .unwrap()
}

async fn create_posting(pool: &PgPool, location: &str) -> JobPosting {
    insert_job_posting(
        pool,
        PostingContact {
            client_id: None,
            company_name: "Acme Logistics",
            contact_name: "Dana Smith",
            contact_email: "dana@acme.example",
            contact_phone: None,
        },
        &job_details(location),
    )
    .await
    .unwrap()
}

async fn create_posted_job(pool: &PgPool, location: &str) -> JobPosting {
    let posting = create_posting(pool, location).await;
    update_status(pool, posting.id, JobPostingStatus::Posted)
        .await
        .unwrap()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Admin auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_login_me_and_logout(pool: PgPool) {
    let cookie = admin_cookie(&pool).await;
    assert!(cookie.starts_with("session="));

    let response = send(&pool, request("GET", "/api/v1/auth/me", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["username"], "recruiter");
    assert_eq!(json["is_admin"], true);

    let response = send(&pool, request("POST", "/api/v1/auth/logout", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&pool, request("GET", "/api/v1/auth/me", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_failures_share_one_message(pool: PgPool) {
    create_user(&pool, "recruiter", true).await;

    let wrong_password = send(
        &pool,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "recruiter", "password": "not-the-password"})),
        ),
    )
    .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown_user = send(
        &pool,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "ghost", "password": ADMIN_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(unknown_user).await;

    assert_eq!(wrong_password["error"]["message"], unknown_user["error"]["message"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_admin_login_is_forbidden(pool: PgPool) {
    create_user(&pool, "viewer", false).await;
    let response = send(
        &pool,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "viewer", "password": ADMIN_PASSWORD})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_session_is_ignored(pool: PgPool) {
    let (token, token_hash) = generate_token();
    sqlx::query(
        r#"
        INSERT INTO sessions (token_hash, kind, username, is_admin, expires_at)
        VALUES ($1, 'admin', 'recruiter', TRUE, $2)
        "#,
    )
    .bind(&token_hash)
    .bind(Utc::now() - Duration::minutes(1))
    .execute(&pool)
    .await
    .unwrap();

    assert!(find_session(&pool, &token).await.unwrap().is_none());

    let cookie = format!("session={token}");
    let response = send(&pool, request("GET", "/api/v1/admin/stats", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_is_conflict(pool: PgPool) {
    let cookie = admin_cookie(&pool).await;
    let new_user = json!({"username": "second", "password": "another-pass-1"});

    let response = send(
        &pool,
        request("POST", "/api/v1/admin/users", Some(&cookie), Some(new_user.clone())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &pool,
        request("POST", "/api/v1/admin/users", Some(&cookie), Some(new_user)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Client portal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_client_lifecycle(pool: PgPool) {
    let admin = admin_cookie(&pool).await;
    let client = json!({
        "company_name": "Acme Logistics",
        "contact_name": "Dana Smith",
        "email": "Dana@Acme.example",
        "access_code": "SHIFT2024"
    });

    let response = send(
        &pool,
        request("POST", "/api/v1/admin/clients", Some(&admin), Some(client.clone())),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["email"], "dana@acme.example");

    // Same address in a different case is still the same client.
    let mut duplicate = client.clone();
    duplicate["email"] = json!("dana@acme.example");
    let response = send(
        &pool,
        request("POST", "/api/v1/admin/clients", Some(&admin), Some(duplicate)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &pool,
        request(
            "POST",
            "/api/v1/client/login",
            None,
            Some(json!({"email": "dana@acme.example", "access_code": "WRONG123"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &pool,
        request(
            "POST",
            "/api/v1/client/login",
            None,
            Some(json!({"email": "DANA@acme.example", "access_code": " SHIFT2024 "})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let client_cookie = cookie_from(&response);

    let response = send(&pool, request("GET", "/api/v1/client/portal", Some(&client_cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let portal = body_json(response).await;
    assert_eq!(portal["client"]["company_name"], "Acme Logistics");
    assert_eq!(portal["job_postings"], json!([]));

    let response = send(&pool, request("GET", "/api/v1/admin/stats", Some(&client_cookie), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Job board
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_status_update(pool: PgPool) {
    let admin = admin_cookie(&pool).await;
    let posting = create_posting(&pool, "Toronto, ON").await;
    sqlx::query("UPDATE job_postings SET updated_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(posting.id)
        .execute(&pool)
        .await
        .unwrap();

    let uri = format!("/api/v1/admin/job-postings/{}/status", posting.id);
    let response = send(
        &pool,
        request("PATCH", &uri, Some(&admin), Some(json!({"status": "posted"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "posted");
    let updated_at: DateTime<Utc> = serde_json::from_value(updated["updated_at"].clone()).unwrap();
    assert!(updated_at > Utc::now() - Duration::hours(1));

    let response = send(
        &pool,
        request("PATCH", &uri, Some(&admin), Some(json!({"status": "archived"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let missing = format!("/api/v1/admin/job-postings/{}/status", Uuid::new_v4());
    let response = send(
        &pool,
        request("PATCH", &missing, Some(&admin), Some(json!({"status": "closed"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&pool, request("GET", &format!("/api/v1/jobs/{}", posting.id), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let job = body_json(response).await;
    assert_eq!(job["structured_data"]["@type"], "JobPosting");
    assert!(job["job"].get("contact_email").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unposted_job_is_not_public(pool: PgPool) {
    let posting = create_posting(&pool, "Hamilton, ON").await;

    let response = send(&pool, request("GET", &format!("/api/v1/jobs/{}", posting.id), None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let application = json!({
        "job_posting_id": posting.id,
        "full_name": "Sam Lee",
        "email": "sam@example.com",
        "position": "Forklift Operator"
    });
    let response = send(&pool, request("POST", "/api/v1/applications", None, Some(application))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let general = json!({
        "full_name": "Sam Lee",
        "email": "sam@example.com",
        "position": "Forklift Operator"
    });
    let response = send(&pool, request("POST", "/api/v1/applications", None, Some(general))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_location_filter_matches_literal_text(pool: PgPool) {
    create_posted_job(&pool, "Toronto, ON").await;

    let count = |json: Value| json.as_array().map(Vec::len).unwrap_or_default();

    let response = send(&pool, request("GET", "/api/v1/jobs?location=toronto", None, None)).await;
    assert_eq!(count(body_json(response).await), 1);

    for wildcard in ["%25", "_", "Tor%25ON"] {
        let uri = format!("/api/v1/jobs?location={wildcard}");
        let response = send(&pool, request("GET", &uri, None, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(count(body_json(response).await), 0, "{wildcard}");
    }
}

// ---------------------------------------------------------------------------
// Intake and AI sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_contact_is_stored_trimmed(pool: PgPool) {
    let contact = json!({
        "name": "  Jane Doe ",
        "email": "jane@example.com",
        "message": "   We need six warehouse associates.   ",
        "inquiry_type": "employer"
    });
    let response = send(&pool, request("POST", "/api/v1/contact", None, Some(contact))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = body_json(response).await;
    assert_eq!(stored["name"], "Jane Doe");
    assert_eq!(stored["message"], "We need six warehouse associates.");

    let blank = json!({"name": "Jane", "email": "jane@example.com", "message": "            "});
    let response = send(&pool, request("POST", "/api/v1/contact", None, Some(blank))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_submissions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resume_sections_load_in_position_order(pool: PgPool) {
    let session_id = Uuid::new_v4();
    sqlx::query("INSERT INTO resume_sessions (id, original_text) VALUES ($1, 'resume')")
        .bind(session_id)
        .execute(&pool)
        .await
        .unwrap();
    for (position, name) in [(2, "Skills"), (0, "Summary"), (1, "Experience")] {
        sqlx::query(
            r#"
            INSERT INTO resume_sections
                (id, session_id, position, section_name, original_text, enhanced_text)
            VALUES ($1, $2, $3, $4, '', 'text')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(position)
        .bind(name)
        .execute(&pool)
        .await
        .unwrap();
    }

    let detail = load_session(&pool, session_id).await.unwrap().unwrap();
    let names: Vec<&str> = detail.sections.iter().map(|s| s.section_name.as_str()).collect();
    assert_eq!(names, ["Summary", "Experience", "Skills"]);

    let uri = format!("/api/v1/ai/resume/sessions/{session_id}");
    let response = send(&pool, request("GET", &uri, None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["sections"][0]["section_name"], "Summary");

    assert!(load_session(&pool, Uuid::new_v4()).await.unwrap().is_none());
}
