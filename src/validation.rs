use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// Checks `fields` in order and fails on the first one that is absent or null.
pub fn require_fields(payload: &Value, fields: &[&'static str]) -> Result<(), AppError> {
    let map = payload
        .as_object()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".into()))?;
    for &field in fields {
        match map.get(field) {
            None | Some(Value::Null) => return Err(AppError::MissingField(field)),
            Some(_) => {}
        }
    }
    Ok(())
}

pub fn parse_body<T: DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
