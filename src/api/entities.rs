//! Legacy entity endpoints that carry rdata and ttl in a properties string.

use super::extract::PathSegment;
use super::views::{self, EntityView, LegacyRecordView};
use super::{JsonObject, optional_text, parse_object, path_id};
use crate::error::{ApiError, Result};
use crate::rdata::LegacyProperties;
use crate::records::{DEFAULT_TTL, NewRecord, RecordPatch};
use crate::store::EmulatorStore;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};

fn properties(body: &JsonObject) -> Result<LegacyProperties> {
    let raw = body
        .get("properties")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::validation("properties must be a string"))?;
    LegacyProperties::parse(raw)
}

pub async fn list_entities(
    State(store): State<EmulatorStore>,
    PathSegment(zone_id): PathSegment,
) -> Result<Json<Value>> {
    let zone_id = path_id(&zone_id, || ApiError::not_found("Zone not found"))?;
    let entities: Vec<EntityView> = views::collect(&store.records.find_by_zone(zone_id));

    Ok(Json(json!({ "data": entities })))
}

pub async fn create_entity(
    State(store): State<EmulatorStore>,
    PathSegment(zone_id): PathSegment,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    let zone_id = path_id(&zone_id, || ApiError::not_found("Zone not found"))?;
    let body = parse_object(&body)?;
    if !["name", "type", "properties"].iter().all(|k| body.contains_key(*k)) {
        return Err(ApiError::validation("Missing required fields"));
    }

    let zone = store
        .zones
        .find_by_id(zone_id)
        .ok_or_else(|| ApiError::validation("Invalid zone ID"))?;
    let props = properties(&body)?;

    let record = store.records.create(NewRecord {
        owner_name: optional_text(&body, "name").unwrap_or_default(),
        record_type: optional_text(&body, "type").unwrap_or_default(),
        rdata: props.rdata,
        zone_id: zone.id,
        ttl: props.ttl.unwrap_or(DEFAULT_TTL),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": record.id,
            "name": record.owner_name,
            "type": record.record_type,
        })),
    ))
}

pub async fn update_entity(
    State(store): State<EmulatorStore>,
    PathSegment(id): PathSegment,
    body: Bytes,
) -> Result<Json<LegacyRecordView>> {
    let id = path_id(&id, ApiError::record_not_found)?;
    if store.records.get(id).is_none() {
        return Err(ApiError::record_not_found());
    }

    let body = parse_object(&body)?;
    let props = properties(&body)?;
    let record = store.records.update(
        id,
        RecordPatch {
            owner_name: optional_text(&body, "name"),
            rdata: Some(props.rdata),
            ttl: props.ttl,
            ..Default::default()
        },
    )?;

    Ok(Json(LegacyRecordView::from(&record)))
}

pub async fn delete_entity(
    State(store): State<EmulatorStore>,
    PathSegment(id): PathSegment,
) -> Result<StatusCode> {
    let id = path_id(&id, ApiError::record_not_found)?;
    store.records.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
