use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::ApiError;
use crate::validation::{FieldError, INVALID_ID_MESSAGE};

/// Raw `:id` path segment.
///
/// A segment axum cannot decode (e.g. `%FF`) is reported as an invalid id in the
/// usual error shape instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct PathId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(PathId(id)),
            Err(rejection) => {
                tracing::debug!("Rejected id path segment: {}", rejection.body_text());
                Err(ApiError::RequestValidation(
                    FieldError::new("id", INVALID_ID_MESSAGE).into(),
                ))
            }
        }
    }
}
