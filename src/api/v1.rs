//! Legacy v1 endpoints under `/Services/REST/v1`.

use super::auth::{AuthenticatedSession, basic_credentials, require_session};
use super::extract::QueryParams;
use super::views::{self, LegacyRecordView};
use super::{as_id, deployment_id, optional_text, optional_ttl, parse_object};
use crate::error::{ApiError, Result};
use crate::rdata;
use crate::records::{DEFAULT_TTL, NewRecord, RecordPatch};
use crate::store::EmulatorStore;
use crate::zones::Zone;
use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tracing::info;

pub fn routes(store: EmulatorStore) -> Router<EmulatorStore> {
    Router::new()
        .route("/logout", get(logout))
        .route("/getZonesByHint", get(zones_by_hint))
        .route("/getHostRecordsByHint", get(host_records_by_hint))
        .route("/addHostRecord", post(add_host_record))
        .route("/update", put(update_record))
        .route("/delete", delete(delete_record))
        .route("/quickDeploy", post(quick_deploy))
        .route_layer(middleware::from_fn_with_state(store, require_session))
        .route("/login", get(login))
}

pub async fn login(State(store): State<EmulatorStore>, headers: HeaderMap) -> Result<Json<Value>> {
    let (username, password) = basic_credentials(&headers)?;
    let session = store.sessions.create_session(&username, &password)?;
    info!("v1 login for {}", session.owner);

    Ok(Json(json!({
        "token": session.token,
        "expires": session.expires_at,
    })))
}

/// Shared by the v1 and v2 logout verbs
pub async fn logout(
    State(store): State<EmulatorStore>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Json<Value> {
    store.sessions.invalidate(&session.token);
    info!("Logged out {}", session.owner);

    Json(json!({ "message": "Logged out successfully" }))
}

pub async fn zones_by_hint(
    State(store): State<EmulatorStore>,
    query: QueryParams,
) -> Json<Vec<Zone>> {
    Json(store.zones.find_by_hint(query.get("hint").unwrap_or_default()))
}

pub async fn host_records_by_hint(
    State(store): State<EmulatorStore>,
    query: QueryParams,
) -> Json<Vec<LegacyRecordView>> {
    let records = store
        .records
        .find_by_hint(query.get("hint").unwrap_or_default());
    Json(views::collect(&records))
}

pub async fn add_host_record(
    State(store): State<EmulatorStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    let body = parse_object(&body)?;

    for field in ["name", "type", "rdata", "parentId"] {
        if !body.contains_key(field) {
            return Err(ApiError::validation(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    let zone = body
        .get("parentId")
        .and_then(as_id)
        .and_then(|id| store.zones.find_by_id(id))
        .ok_or_else(|| ApiError::validation("Invalid zone ID"))?;

    let record = store.records.create(NewRecord {
        owner_name: optional_text(&body, "name").unwrap_or_default(),
        record_type: optional_text(&body, "type").unwrap_or_default(),
        rdata: body.get("rdata").map(rdata::normalize).unwrap_or_default(),
        zone_id: zone.id,
        ttl: optional_ttl(&body, "ttl")?.unwrap_or(DEFAULT_TTL),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": record.id, "message": "Record created successfully" })),
    ))
}

pub async fn update_record(State(store): State<EmulatorStore>, body: Bytes) -> Result<Json<Value>> {
    let body = parse_object(&body)?;

    let id = body
        .get("id")
        .ok_or_else(|| ApiError::validation("Record ID is required"))?;
    let id = as_id(id).ok_or_else(ApiError::record_not_found)?;

    store.records.update(
        id,
        RecordPatch {
            owner_name: optional_text(&body, "name"),
            record_type: optional_text(&body, "type"),
            rdata: body.get("rdata").map(rdata::normalize),
            ttl: optional_ttl(&body, "ttl")?,
        },
    )?;

    Ok(Json(json!({ "message": "Record updated successfully" })))
}

pub async fn delete_record(
    State(store): State<EmulatorStore>,
    query: QueryParams,
) -> Result<Json<Value>> {
    let object_id = query
        .non_empty("objectId")
        .ok_or_else(|| ApiError::validation("objectId parameter is required"))?
        .trim();
    if !is_integer(object_id) {
        return Err(ApiError::validation("Invalid objectId"));
    }

    // Negative or oversized integers are well-formed but address no record
    let id = object_id
        .parse::<u64>()
        .map_err(|_| ApiError::record_not_found())?;
    store.records.delete(id)?;
    Ok(Json(json!({ "message": "Record deleted successfully" })))
}

/// Optional sign followed by one or more ASCII digits
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Deployment is simulated; only the request shape is checked
pub async fn quick_deploy(body: Bytes) -> Result<Json<Value>> {
    let body = parse_object(&body)?;
    if !body.contains_key("entityId") {
        return Err(ApiError::validation("entityId is required"));
    }

    Ok(Json(json!({
        "message": "Configuration deployed successfully",
        "deploymentId": deployment_id(),
    })))
}
