//! HTTP façade over the shared stores.
//!
//! `v1` serves the flat verb endpoints, `v2` the resource endpoints (mounted
//! under both `/api/v2` and `/Services/REST/v2`), and `entities` the legacy
//! properties-string shape. All of them read and write the same
//! [`EmulatorStore`](crate::store::EmulatorStore).

pub mod auth;
pub mod entities;
pub mod extract;
pub mod v1;
pub mod v2;
pub mod views;

use crate::error::ApiError;
use crate::rdata;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use tracing::debug;

pub type JsonObject = Map<String, Value>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        debug!("Request failed with {}: {}", status, self);

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Parse a request body that must be a JSON object
pub(crate) fn parse_object(body: &[u8]) -> Result<JsonObject, ApiError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::validation("Request body must be a JSON object")),
    }
}

/// Interpret an id sent either as a JSON number or a numeric string
pub(crate) fn as_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an optional TTL field; `null` counts as absent
pub(crate) fn optional_ttl(body: &JsonObject, field: &str) -> Result<Option<u32>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_id(value)
            .and_then(|ttl| u32::try_from(ttl).ok())
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("Invalid {}: {}", field, value))),
    }
}

/// Read an optional string-ish field
pub(crate) fn optional_text(body: &JsonObject, field: &str) -> Option<String> {
    body.get(field).map(rdata::scalar_to_string)
}

/// Parse an integer path segment; anything else does not address a resource
pub(crate) fn path_id(raw: &str, not_found: impl FnOnce() -> ApiError) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| not_found())
}

/// Identifier handed back by the simulated deployment endpoints
pub(crate) fn deployment_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
