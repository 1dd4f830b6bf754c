//! JSON object request bodies with field-level rejection messages.

use crate::error::{AppError, FieldErrors};
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde_json::{Map, Value};

/// Request body that must be a JSON object.
#[derive(Clone, Debug, Default)]
pub struct Payload(pub Map<String, Value>);

impl Payload {
    /// Parse a raw body. An empty body is an empty object; a non-empty body must be declared JSON.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload::default());
        }
        if !is_json_content_type(headers) {
            return Err(AppError::UnsupportedMediaType(
                "Unsupported media type in request. Expected \"application/json\".".into(),
            ));
        }
        let value: Value =
            serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Payload(map)),
            other => Err(AppError::Validation(FieldErrors::single(
                FieldErrors::NON_FIELD,
                format!("Invalid data. Expected a dictionary, but got {}.", json_kind(&other)),
            ))),
        }
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
