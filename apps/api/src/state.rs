use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::LlmClient;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub resumes: ResumeStore,
    pub llm: LlmClient,
    /// SendGrid in production, a logging mailer when no API key is configured.
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}

impl AppState {
    /// Address for internal notifications, if configured.
    pub fn admin_notify(&self) -> Option<&str> {
        self.config.email.admin_notify.as_deref()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use aws_config::{BehaviorVersion, Region};
    use sqlx::postgres::PgPoolOptions;

    use crate::email::testing::RecordingMailer;

    /// State whose pool never connects until a query is issued. Suitable for
    /// routes that answer before touching the database.
    pub fn lazy_state() -> (AppState, Arc<RecordingMailer>) {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        state_with_pool(db)
    }

    /// State over a real (per-test) database pool, with recorded email.
    pub fn state_with_pool(db: PgPool) -> (AppState, Arc<RecordingMailer>) {
        let config = Config::for_tests();
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let recorder = Arc::new(RecordingMailer::default());
        let state = AppState {
            db,
            resumes: ResumeStore::new(
                aws_sdk_s3::Client::from_conf(s3_config),
                config.s3_bucket.clone(),
            ),
            llm: LlmClient::new(config.anthropic_api_key.clone()).expect("llm client"),
            mailer: recorder.clone(),
            config,
        };
        (state, recorder)
    }
}
