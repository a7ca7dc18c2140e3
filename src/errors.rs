use std::collections::BTreeMap;

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::{ValidationError, ValidationErrors};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    NotFound,
    InvalidPage,
    Unauthorized,
    Forbidden,
    InternalServerError,
    BadRequest(String),
    ValidationFailed(ValidationErrors),
    DatabaseError(sqlx::Error),
    InvalidHashFormat(argon2::password_hash::Error),
    Io(std::io::Error),
}

impl Error {
    /// A validation failure carrying a single field-level message.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(message.into());

        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        Self::ValidationFailed(errors)
    }
}

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::ValidationFailed(ref errors) => {
                let body = Json(json!({ "errors": field_messages(errors) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
            Self::InvalidPage => (StatusCode::NOT_FOUND, "Invalid page."),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided or are invalid",
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action",
            ),
            Self::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Self::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Self::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            Self::InvalidHashFormat(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid hash format")
            }
            Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error"),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        error!("Database error: {:?}", err);
        Self::DatabaseError(err)
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        error!("Invalid hash format");
        Self::InvalidHashFormat(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        error!("Storage error: {:?}", err);
        Self::Io(err)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed(errors)
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        Self::BadRequest(rejection.body_text())
    }
}
