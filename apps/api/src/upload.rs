//! Reading a file (plus any plain text fields) out of a multipart request.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::errors::AppError;
use crate::storage::MAX_RESUME_BYTES;

pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct UploadForm {
    pub file: Upload,
    /// Non-file parts, by name. Later duplicates overwrite earlier ones.
    pub fields: HashMap<String, String>,
}

/// Reads the whole form. The part named `file_field` is required; a second
/// part with the same name is ignored.
pub async fn read_upload_form(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<UploadForm, AppError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == file_field {
            if file.is_some() {
                continue;
            }
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;
            check_size(bytes.len())?;
            file = Some(Upload {
                file_name,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            fields.insert(name, value);
        }
    }

    let file = file.ok_or_else(|| AppError::Validation(format!("{file_field}: file is required")))?;
    if file.bytes.is_empty() {
        return Err(AppError::Validation(format!("{file_field}: file is empty")));
    }
    Ok(UploadForm { file, fields })
}

fn check_size(len: usize) -> Result<(), AppError> {
    if len > MAX_RESUME_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File exceeds the {} MiB limit",
            MAX_RESUME_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}
