//! Resume file storage on S3 / MinIO.

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// Upper bound for uploaded resume files.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("S3 upload failed: {0}")]
    Upload(String),
}

/// Resume formats accepted by the upload endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

impl ResumeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::Doc => "doc",
            ResumeFormat::Docx => "docx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::Doc => "application/msword",
            ResumeFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Identifies the format from the file's leading bytes, using the file
    /// name only to tell DOCX apart from other ZIP containers.
    pub fn sniff(file_name: Option<&str>, bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF") {
            return Some(ResumeFormat::Pdf);
        }
        if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
            return Some(ResumeFormat::Doc);
        }
        let is_docx_name = file_name
            .map(|n| n.to_ascii_lowercase().ends_with(".docx"))
            .unwrap_or(false);
        if bytes.starts_with(b"PK\x03\x04") && is_docx_name {
            return Some(ResumeFormat::Docx);
        }
        None
    }
}

#[derive(Clone)]
pub struct ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ResumeStore {
    /// Constructs a store configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "agency-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        Self::new(aws_sdk_s3::Client::new(&s3_config), config.s3_bucket.clone())
    }

    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
