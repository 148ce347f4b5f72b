//! Error types for the catalog server

use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

/// Field name → messages, keyed the way clients send the fields (camelCase)
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Machine-readable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    DbFailure = 3,
    BadValue = 18,
    NoSuchData = 20,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let key = camel_case(&field.to_string());
            let messages = fields.entry(key.clone()).or_default();
            for err in errs.iter() {
                let message = match err.message.as_ref() {
                    Some(m) => m.to_string(),
                    None => default_message(&key, err),
                };
                messages.push(message);
            }
        }
        AppError::Validation(fields)
    }
}

/// Body deserialization failures: type mismatches on a field become field errors,
/// anything else (malformed JSON, wrong content type) a bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if let JsonRejection::JsonDataError(err) = &rejection {
            if let Some(key) = rejected_field(&err.body_text()) {
                let label = if key.contains('.') { key.clone() } else { words(&key) };
                return AppError::invalid_field(&key, format!("The {} field is invalid.", label));
            }
        }
        AppError::BadRequest(rejection.to_string())
    }
}

/// Field path of a JSON data error, in error-key form: `authors_id[0]` -> `authorsId.0`.
/// The rejection text reads `<summary>: <path>: <serde message>`; a root-level
/// failure has the path `.` or none at all.
fn rejected_field(text: &str) -> Option<String> {
    let (_, detail) = text.split_once(": ")?;
    let (path, _) = detail.split_once(": ")?;
    if path.is_empty() || path == "." || path.contains(char::is_whitespace) {
        return None;
    }
    Some(camel_case(&path.replace('[', ".").replace(']', "")))
}

/// Human message for a validator error code, e.g. "The last name field is required."
fn default_message(key: &str, err: &ValidationError) -> String {
    let label = words(key);
    match &*err.code {
        "required" => format!("The {} field is required.", label),
        "length" => match (err.params.get("max"), err.params.get("min")) {
            (Some(max), _) => format!(
                "The {} field must not be greater than {} characters.",
                label, max
            ),
            (None, Some(min)) => format!("The {} field must have at least {} items.", label, min),
            (None, None) => format!("The {} field has an invalid length.", label),
        },
        "url" => format!("The {} field must be a valid URL.", label),
        "date" => format!("The {} field must be a valid date.", label),
        _ => format!("The {} field is invalid.", label),
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// "lastName" -> "last name"
fn words(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            out.push(' ');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Field-keyed validation messages (validation failures only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg, None),
            AppError::Validation(errors) => {
                tracing::warn!(fields = ?errors.keys().collect::<Vec<_>>(), "Validation failed");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorCode::BadValue,
                    "The given data was invalid.".to_string(),
                    Some(errors),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
