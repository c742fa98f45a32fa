// HTTP API Error Types
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::database::DatabaseError;
use crate::database::models::student;
use crate::validation::{self, ValidationErrors};

/// Message shown to clients for any failure that is not one of the typed variants
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Typed failure raised anywhere in the request pipeline.
///
/// Handlers only ever return these; `middleware::error_handler` is the one place
/// that turns them into HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("request validation failed: {0}")]
    RequestValidation(ValidationErrors),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 500 Internal Server Error, message is safe to show
    #[error("{0}")]
    Server(String),

    // 500 Internal Server Error, source is logged but never shown
    #[error("unexpected failure: {0}")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// One entry of the `errors` array in every error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::RequestValidation(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Server(_) => 500,
            ApiError::Unexpected(_) => 500,
        }
    }

    /// Client-facing message list
    pub fn serialize_errors(&self) -> Vec<ErrorMessage> {
        match self {
            ApiError::RequestValidation(errors) => errors
                .iter()
                .map(|e| ErrorMessage {
                    message: e.message.clone(),
                    field: Some(e.field.clone()),
                })
                .collect(),
            ApiError::NotFound(msg) | ApiError::Conflict(msg) | ApiError::Server(msg) => {
                vec![ErrorMessage::new(msg.as_str())]
            }
            ApiError::Unexpected(_) => vec![ErrorMessage::new(GENERIC_ERROR_MESSAGE)],
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        ApiError::Server(message.into())
    }

    pub fn unexpected(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ApiError::Unexpected(Box::new(err))
    }

    pub fn student_not_found(id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("Student with id {} not found.", id))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::RequestValidation(errors)
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateKey { field, value } => {
                let label = student::field_for_column(&field)
                    .and_then(validation::rule_for)
                    .map(|rule| rule.label);
                let message = match (label, value) {
                    (Some(label), Some(value)) => format!(
                        "Student with {} {} already exists.",
                        label.to_lowercase(),
                        value
                    ),
                    _ => "Student already exists.".to_string(),
                };
                ApiError::Conflict(message)
            }
            other => ApiError::unexpected(other),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ApiError::server("Please specify Database environment variables inside \".env\" file.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(ApiError::RequestValidation(ValidationErrors::default()).status_code(), 400);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::conflict("x").status_code(), 409);
        assert_eq!(ApiError::server("x").status_code(), 500);
        assert_eq!(
            ApiError::unexpected(std::io::Error::other("disk on fire")).status_code(),
            500
        );
    }

    #[test]
    fn validation_errors_serialize_one_entry_per_field() {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new("firstName", "First name should be at least 3 characters."));
        errors.push(FieldError::new("id", "Invalid request parameter: Please provide a valid student id."));

        let serialized = ApiError::from(errors).serialize_errors();
        assert_eq!(serialized.len(), 2);
        assert_eq!(serialized[0].field.as_deref(), Some("firstName"));
        assert_eq!(serialized[1].message, "Invalid request parameter: Please provide a valid student id.");
    }

    #[test]
    fn unexpected_errors_hide_their_source() {
        let err = ApiError::unexpected(std::io::Error::other("connection reset by peer"));
        assert_eq!(err.serialize_errors(), vec![ErrorMessage::new(GENERIC_ERROR_MESSAGE)]);
    }

    #[test]
    fn duplicate_national_code_becomes_conflict() {
        let err: ApiError = DatabaseError::DuplicateKey {
            field: "national_code".to_string(),
            value: Some("123456123".to_string()),
        }
        .into();

        assert_eq!(err.status_code(), 409);
        assert_eq!(
            err.serialize_errors()[0].message,
            "Student with national code 123456123 already exists."
        );
    }

    #[test]
    fn duplicate_without_detail_uses_generic_conflict() {
        let err: ApiError = DatabaseError::DuplicateKey {
            field: "unknown".to_string(),
            value: None,
        }
        .into();
        assert_eq!(err.serialize_errors()[0].message, "Student already exists.");
    }

    #[test]
    fn other_database_errors_are_unexpected() {
        let err: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, ApiError::Unexpected(_)));
        assert_eq!(err.serialize_errors()[0].message, GENERIC_ERROR_MESSAGE);
    }
}
