//! Error translation: the only place that turns a failure into an HTTP response.
//!
//! Handlers return [`ApiError`]; persistence failures were classified into it by
//! `From<DatabaseError>`. Routes that do not exist and handler panics end up here
//! too, so every non-2xx body has the same `{ "errors": [...] }` shape.

use std::any::Any;

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::{ApiError, ErrorMessage, GENERIC_ERROR_MESSAGE};

pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found.";

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorMessage>,
}

/// Render a typed failure as a status code plus `{ "errors": [...] }`
pub fn render(err: ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &err {
        ApiError::RequestValidation(errors) => {
            tracing::debug!("Request validation failed: {}", errors)
        }
        ApiError::NotFound(msg) | ApiError::Conflict(msg) => tracing::debug!("{}", msg),
        ApiError::Server(msg) => tracing::error!("Server error: {}", msg),
        ApiError::Unexpected(source) => tracing::error!("Unhandled failure: {}", source),
    }

    let body = ErrorBody {
        errors: err.serialize_errors(),
    };
    (status, Json(body)).into_response()
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        render(self)
    }
}

/// Catch-all for unknown paths and unsupported methods
pub async fn fallback(method: Method, uri: Uri) -> ApiError {
    tracing::debug!("No route for {} {}", method, uri);
    ApiError::not_found(ROUTE_NOT_FOUND_MESSAGE)
}

/// Used by `CatchPanicLayer`; the panic payload is logged, never returned
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    let body = ErrorBody {
        errors: vec![ErrorMessage::new(GENERIC_ERROR_MESSAGE)],
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
