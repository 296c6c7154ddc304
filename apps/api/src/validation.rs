//! Request-boundary validation: a JSON extractor that runs `validator` rules
//! and turns both malformed JSON and rule failures into 400 responses, plus
//! path, query and multipart wrappers whose rejections use the same envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// Like `Json<T>`, but rejects with `AppError::Validation` and checks `T::validate()`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| AppError::Validation(describe_errors(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// `Path<T>` whose rejection is an `AppError`, so a bad id gets the JSON error body.
#[derive(Debug)]
pub struct AppPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(AppPath(value))
    }
}

/// `Query<T>` whose rejection is an `AppError`.
#[derive(Debug)]
pub struct AppQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(AppQuery(value))
    }
}

/// `Multipart` whose rejection is an `AppError`. An oversized body stays a 413.
pub struct AppMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::Validation(rejection.body_text())
            }
        })?;
        Ok(AppMultipart(multipart))
    }
}

/// Flattens field errors into `field: message; field: message`, sorted by field.
/// Nested structs (including `#[serde(flatten)]` ones) report their own field names.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut parts = Vec::new();
    collect_errors(errors, &mut parts);
    parts.sort();
    parts.join("; ")
}

fn collect_errors(errors: &ValidationErrors, parts: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    parts.push(format!("{field}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(inner, parts),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_errors(inner, parts);
                }
            }
        }
    }
}

/// Builds a validator error with a human-readable message.
pub fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Serde helper: strips surrounding whitespace while deserializing, so the
/// length rules that run afterwards see the same text that gets stored.
pub fn trim_whitespace<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "must not be blank"));
    }
    Ok(())
}
