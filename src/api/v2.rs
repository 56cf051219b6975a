//! Resource-oriented v2 endpoints.
//!
//! The same router is mounted under `/api/v2` and `/Services/REST/v2`, so
//! the alias paths cannot drift from the primary ones.

use super::auth::{basic_credentials, require_session};
use super::extract::{PathSegment, QueryParams};
use super::views::{self, RecordView, ZoneView};
use super::{as_id, deployment_id, entities, optional_text, optional_ttl, parse_object, path_id, v1};
use crate::error::{ApiError, AuthError, Result};
use crate::rdata;
use crate::records::{DEFAULT_TTL, NewRecord, RecordFilter, RecordPatch};
use crate::store::EmulatorStore;
use axum::{
    Json, Router,
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
        .route("/sessions/{token}", delete(delete_session))
        .route("/zones", get(list_zones))
        .route("/records", get(list_records).post(create_record))
        .route("/records/{id}", put(update_record).delete(delete_record))
        .route("/zones/{id}/deploy", post(deploy_zone))
        .route(
            "/zones/{id}/entities",
            get(entities::list_entities).post(entities::create_entity),
        )
        .route(
            "/entities/{id}",
            put(entities::update_entity).delete(entities::delete_entity),
        )
        .route("/getZonesByHint", get(v1::zones_by_hint))
        .route("/quickDeploy", post(v1::quick_deploy))
        .route("/logout", get(v1::logout))
        .route_layer(middleware::from_fn_with_state(store, require_session))
        .route("/sessions", post(create_session))
}

/// Credentials from a JSON body, falling back to Basic auth
fn session_credentials(headers: &HeaderMap, body: &[u8]) -> std::result::Result<(String, String), AuthError> {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        if let (Some(username), Some(password)) = (map.get("username"), map.get("password")) {
            return Ok((
                rdata::scalar_to_string(username),
                rdata::scalar_to_string(password),
            ));
        }
    }

    basic_credentials(headers).map_err(|e| match e {
        AuthError::BasicRequired => AuthError::Required,
        other => other,
    })
}

pub async fn create_session(
    State(store): State<EmulatorStore>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let (username, password) = session_credentials(&headers, &body)?;
    let session = store.sessions.create_session(&username, &password)?;
    info!("v2 session opened for {}", session.owner);

    Ok(Json(json!({
        "token": session.token,
        "id": "session",
        "type": "session",
        "username": session.owner,
        "expires": session.expires_at,
    })))
}

pub async fn delete_session(
    State(store): State<EmulatorStore>,
    PathSegment(token): PathSegment,
) -> StatusCode {
    if store.sessions.invalidate(&token) {
        info!("Closed v2 session");
    }
    StatusCode::NO_CONTENT
}

pub async fn list_zones(
    State(store): State<EmulatorStore>,
    query: QueryParams,
) -> Json<Vec<ZoneView>> {
    let zones = match query.non_empty("name") {
        Some(name) => store.zones.find_by_exact_name(name).into_iter().collect(),
        None => store.zones.all().to_vec(),
    };
    Json(views::collect(&zones))
}

pub async fn list_records(
    State(store): State<EmulatorStore>,
    query: QueryParams,
) -> Json<Vec<RecordView>> {
    let zone_id = match query.non_empty("zone") {
        Some(zone) => match zone.parse::<u64>() {
            Ok(id) => Some(id),
            // No zone carries a non-numeric id
            Err(_) => return Json(Vec::new()),
        },
        None => None,
    };

    let filter = RecordFilter {
        zone_id,
        fqdn: query.non_empty("name").map(str::to_string),
        record_type: query.non_empty("type").map(str::to_string),
    };
    let records = store.records.find_by_filter(&filter);
    Json(views::collect(&records))
}

pub async fn create_record(
    State(store): State<EmulatorStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    let body = parse_object(&body)?;
    if !["name", "type", "zoneId"].iter().all(|k| body.contains_key(*k)) {
        return Err(ApiError::validation(
            "Missing required fields: name, type, zoneId",
        ));
    }

    let zone = body
        .get("zoneId")
        .and_then(as_id)
        .and_then(|id| store.zones.find_by_id(id))
        .ok_or_else(|| ApiError::validation("Invalid zone ID"))?;

    let fqdn = optional_text(&body, "name").unwrap_or_default();
    let record = store.records.create(NewRecord {
        owner_name: zone.owner_label(&fqdn).to_string(),
        record_type: optional_text(&body, "type").unwrap_or_default(),
        rdata: body.get("rdata").map(rdata::normalize).unwrap_or_default(),
        zone_id: zone.id,
        ttl: optional_ttl(&body, "ttl")?.unwrap_or(DEFAULT_TTL),
    })?;

    // The name is echoed as sent, even when it was not under the zone
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": record.id,
            "name": fqdn,
            "type": record.record_type,
            "rdata": record.rdata,
            "ttl": record.ttl,
            "zoneId": record.zone_id,
        })),
    ))
}

pub async fn update_record(
    State(store): State<EmulatorStore>,
    PathSegment(id): PathSegment,
    body: Bytes,
) -> Result<Json<RecordView>> {
    let id = path_id(&id, ApiError::record_not_found)?;
    if store.records.get(id).is_none() {
        return Err(ApiError::record_not_found());
    }

    let body = parse_object(&body)?;
    let record = store.records.update(
        id,
        RecordPatch {
            rdata: body.get("rdata").map(rdata::normalize),
            ttl: optional_ttl(&body, "ttl")?,
            record_type: optional_text(&body, "type"),
            ..Default::default()
        },
    )?;

    Ok(Json(RecordView::from(&record)))
}

pub async fn delete_record(
    State(store): State<EmulatorStore>,
    PathSegment(id): PathSegment,
) -> Result<StatusCode> {
    let id = path_id(&id, ApiError::record_not_found)?;
    store.records.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn deploy_zone(
    State(store): State<EmulatorStore>,
    PathSegment(id): PathSegment,
) -> Result<Json<Value>> {
    let zone_not_found = || ApiError::not_found("Zone not found");
    let zone = path_id(&id, zone_not_found)
        .ok()
        .and_then(|id| store.zones.find_by_id(id))
        .ok_or_else(zone_not_found)?;

    info!("Deployed zone {}", zone.name);
    Ok(Json(json!({
        "message": format!("Zone {} deployed successfully", zone.id),
        "deploymentId": deployment_id(),
        "status": "completed",
    })))
}
