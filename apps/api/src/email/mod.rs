//! Transactional email.
//!
//! Handlers never wait on mail delivery: [`dispatch`] spawns the send and
//! logs failures. With no `SENDGRID_API_KEY` configured, [`LogMailer`] is used
//! and messages are only written to the log.

pub mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EmailConfig;

const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// SendGrid v3 mail-send client.
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    from_address: String,
    from_name: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_address: String, from_name: String) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
            from_address,
            from_name,
        })
    }

    fn payload(&self, email: &OutgoingEmail) -> serde_json::Value {
        let mut body = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": self.from_address, "name": self.from_name },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html }
            ]
        });
        if let Some(reply_to) = &email.reply_to {
            body["reply_to"] = json!({ "email": reply_to });
        }
        body
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let response = self
            .client
            .post(SENDGRID_API_URL)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// Writes messages to the log instead of sending them.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            "Email delivery disabled; message not sent"
        );
        Ok(())
    }
}

pub fn build_mailer(config: &EmailConfig, site_name: &str) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.sendgrid_api_key {
        Some(key) => Ok(Arc::new(SendGridMailer::new(
            key.clone(),
            config.from_address.clone(),
            site_name.to_string(),
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

/// Sends in the background. Failures are logged and never reach the caller.
pub fn dispatch(mailer: Arc<dyn Mailer>, email: OutgoingEmail) {
    tokio::spawn(async move {
        match mailer.send(&email).await {
            Ok(()) => info!(to = %email.to, subject = %email.subject, "Email sent"),
            Err(e) => warn!(to = %email.to, subject = %email.subject, "Could not send email: {e}"),
        }
    });
}

/// Dispatches every email in the batch.
pub fn dispatch_all(mailer: &Arc<dyn Mailer>, emails: Vec<OutgoingEmail>) {
    for email in emails {
        dispatch(Arc::clone(mailer), email);
    }
}
