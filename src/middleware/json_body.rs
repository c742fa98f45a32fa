use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::validation::FieldError;

/// Request body parsed as a JSON object.
///
/// An empty body counts as `{}` so the field rules, not the parser, report what is
/// missing. Malformed or non-object bodies are a 400 in the usual error shape.
#[derive(Debug, Clone)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| body_error(rejection.body_text()))?;

        parse_object(&bytes).map(JsonObject)
    }
}

fn body_error(message: impl Into<String>) -> ApiError {
    ApiError::RequestValidation(FieldError::new("body", message).into())
}

pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(body_error("Request body must be a JSON object.")),
        Err(e) => {
            tracing::debug!("Rejected malformed JSON body: {}", e);
            Err(body_error("Request body must be valid JSON."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_an_empty_object() {
        assert!(parse_object(b"").unwrap().is_empty());
        assert!(parse_object(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn parses_objects() {
        let map = parse_object(br#"{"firstName":"Sara"}"#).unwrap();
        assert_eq!(map.get("firstName").and_then(Value::as_str), Some("Sara"));
    }

    #[test]
    fn rejects_arrays_and_garbage() {
        let bodies: [&[u8]; 3] = [b"[1,2]", b"\"text\"", b"{not json"];
        for body in bodies {
            let err = parse_object(body).unwrap_err();
            assert_eq!(err.status_code(), 400);
        }
    }
}
