use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Public origin of the marketing site, without trailing slash.
    pub site_url: String,
    pub site: SiteProfile,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub email: EmailConfig,
    pub bootstrap_admin: Option<AdminCredentials>,
}

/// Business details rendered into SEO metadata and outgoing emails.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `None` means outgoing mail is logged instead of sent.
    pub sendgrid_api_key: Option<String>,
    pub from_address: String,
    pub admin_notify: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let site_url = optional_env("SITE_URL")
            .unwrap_or_else(|| "https://www.example-staffing.ca".to_string())
            .trim_end_matches('/')
            .to_string();

        let from_address = optional_env("EMAIL_FROM")
            .unwrap_or_else(|| format!("no-reply@{}", site_host(&site_url)));

        let bootstrap_admin = match (optional_env("ADMIN_USERNAME"), optional_env("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            site: SiteProfile {
                name: optional_env("SITE_NAME").unwrap_or_else(|| "Staffing Agency".to_string()),
                phone: optional_env("SITE_PHONE").unwrap_or_default(),
                email: optional_env("SITE_EMAIL").unwrap_or_else(|| from_address.clone()),
                city: optional_env("SITE_CITY").unwrap_or_else(|| "Toronto".to_string()),
                region: optional_env("SITE_REGION").unwrap_or_else(|| "ON".to_string()),
                country: optional_env("SITE_COUNTRY").unwrap_or_else(|| "CA".to_string()),
            },
            site_url,
            session_ttl_hours: parse_env("SESSION_TTL_HOURS", 24i64)?,
            cookie_secure: parse_env("COOKIE_SECURE", true)?,
            email: EmailConfig {
                sendgrid_api_key: optional_env("SENDGRID_API_KEY"),
                from_address,
                admin_notify: optional_env("ADMIN_NOTIFY_EMAIL"),
            },
            bootstrap_admin,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn site_host(site_url: &str) -> &str {
    let without_scheme = site_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(site_url);
    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    host.strip_prefix("www.").unwrap_or(host)
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests. Nothing here is ever dialed.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/agency_test".to_string(),
            s3_bucket: "test-bucket".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            aws_access_key_id: "test".to_string(),
            aws_secret_access_key: "test".to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            site_url: "https://www.example-staffing.ca".to_string(),
            site: SiteProfile {
                name: "Example Staffing".to_string(),
                phone: "+1-416-555-0100".to_string(),
                email: "hello@example-staffing.ca".to_string(),
                city: "Toronto".to_string(),
                region: "ON".to_string(),
                country: "CA".to_string(),
            },
            session_ttl_hours: 24,
            cookie_secure: false,
            email: EmailConfig {
                sendgrid_api_key: None,
                from_address: "no-reply@example-staffing.ca".to_string(),
                admin_notify: Some("admin@example-staffing.ca".to_string()),
            },
            bootstrap_admin: None,
        }
    }
}
