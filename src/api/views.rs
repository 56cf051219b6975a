//! Response shapes of the two API generations.

use crate::rdata::LegacyProperties;
use crate::records::Record;
use crate::zones::Zone;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Zone as listed by the v2 `/zones` endpoint
#[derive(Debug, Serialize)]
pub struct ZoneView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: &'static str,
    pub properties: &'static str,
}

impl From<&Zone> for ZoneView {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name.clone(),
            zone_type: "Zone",
            properties: "",
        }
    }
}

/// v2 record: the name is the FQDN
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub rdata: String,
    pub ttl: u32,
    #[serde(rename = "zoneId")]
    pub zone_id: u64,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.fqdn(),
            record_type: record.record_type.clone(),
            rdata: record.rdata.clone(),
            ttl: record.ttl,
            zone_id: record.zone_id,
        }
    }
}

/// v1 and debug record: owner label plus the zone it lives in
#[derive(Debug, Serialize)]
pub struct LegacyRecordView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub rdata: String,
    pub ttl: u32,
    pub zone: String,
    #[serde(rename = "parentId")]
    pub parent_id: u64,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl From<&Record> for LegacyRecordView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.owner_name.clone(),
            record_type: record.record_type.clone(),
            rdata: record.rdata.clone(),
            ttl: record.ttl,
            zone: record.zone_name.clone(),
            parent_id: record.zone_id,
            created: record.created_at,
            updated: record.updated_at,
        }
    }
}

/// Entity listing item with rdata and ttl folded into a properties string
#[derive(Debug, Serialize)]
pub struct EntityView {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub properties: String,
}

impl From<&Record> for EntityView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.owner_name.clone(),
            record_type: record.record_type.clone(),
            properties: LegacyProperties::encode(&record.rdata, record.ttl),
        }
    }
}

pub fn collect<'a, T, V>(items: impl IntoIterator<Item = &'a T>) -> Vec<V>
where
    T: 'a,
    V: From<&'a T>,
{
    items.into_iter().map(V::from).collect()
}
