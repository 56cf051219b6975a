use crate::error::{ApiError, Result};
use crate::zones::ZoneCatalog;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_TTL: u32 = 3600;

/// A DNS record held by the emulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    /// Leaf label relative to the zone, not the FQDN
    pub owner_name: String,
    pub record_type: String,
    pub rdata: String,
    pub ttl: u32,
    pub zone_id: u64,
    /// Zone name captured when the record was created
    pub zone_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.owner_name, self.zone_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub owner_name: String,
    pub record_type: String,
    pub rdata: String,
    pub zone_id: u64,
    pub ttl: u32,
}

/// Fields to change on an existing record; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub owner_name: Option<String>,
    pub record_type: Option<String>,
    pub rdata: Option<String>,
    pub ttl: Option<u32>,
}

/// AND-ed record query; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub zone_id: Option<u64>,
    /// Exact, case-sensitive FQDN
    pub fqdn: Option<String>,
    /// Case-insensitive record type
    pub record_type: Option<String>,
}

impl RecordFilter {
    fn matches(&self, record: &Record) -> bool {
        self.zone_id.is_none_or(|id| record.zone_id == id)
            && self.fqdn.as_deref().is_none_or(|fqdn| record.fqdn() == fqdn)
            && self
                .record_type
                .as_deref()
                .is_none_or(|t| record.record_type.eq_ignore_ascii_case(t))
    }
}

#[derive(Debug)]
struct RecordTable {
    records: BTreeMap<u64, Record>,
    last_id: u64,
}

/// Mutable record table.
///
/// Ids come from a counter that only moves forward, so deleted ids are
/// never handed out again and iteration order equals creation order.
#[derive(Debug)]
pub struct RecordStore {
    zones: Arc<ZoneCatalog>,
    table: RwLock<RecordTable>,
}

impl RecordStore {
    pub fn new(zones: Arc<ZoneCatalog>, id_base: u64) -> Self {
        Self {
            zones,
            table: RwLock::new(RecordTable {
                records: BTreeMap::new(),
                last_id: id_base,
            }),
        }
    }

    pub fn create(&self, new: NewRecord) -> Result<Record> {
        let zone = self
            .zones
            .find_by_id(new.zone_id)
            .ok_or_else(|| ApiError::not_found(format!("Zone {} not found", new.zone_id)))?;

        let mut table = self.table.write();
        table.last_id += 1;
        let record = Record {
            id: table.last_id,
            owner_name: new.owner_name,
            record_type: new.record_type,
            rdata: new.rdata,
            ttl: new.ttl,
            zone_id: zone.id,
            zone_name: zone.name,
            created_at: Utc::now(),
            updated_at: None,
        };
        table.records.insert(record.id, record.clone());

        debug!("Created record {} ({})", record.id, record.fqdn());
        Ok(record)
    }

    pub fn get(&self, id: u64) -> Option<Record> {
        self.table.read().records.get(&id).cloned()
    }

    pub fn update(&self, id: u64, patch: RecordPatch) -> Result<Record> {
        let mut table = self.table.write();
        let record = table
            .records
            .get_mut(&id)
            .ok_or_else(ApiError::record_not_found)?;

        if let Some(owner_name) = patch.owner_name {
            record.owner_name = owner_name;
        }
        if let Some(record_type) = patch.record_type {
            record.record_type = record_type;
        }
        if let Some(rdata) = patch.rdata {
            record.rdata = rdata;
        }
        if let Some(ttl) = patch.ttl {
            record.ttl = ttl;
        }
        record.updated_at = Some(Utc::now());

        debug!("Updated record {}", id);
        Ok(record.clone())
    }

    pub fn delete(&self, id: u64) -> Result<Record> {
        let removed = self
            .table
            .write()
            .records
            .remove(&id)
            .ok_or_else(ApiError::record_not_found)?;

        debug!("Deleted record {}", id);
        Ok(removed)
    }

    /// Case-insensitive substring match against each record's FQDN
    pub fn find_by_hint(&self, hint: &str) -> Vec<Record> {
        let hint = hint.to_lowercase();
        self.collect(|record| record.fqdn().to_lowercase().contains(&hint))
    }

    pub fn find_by_filter(&self, filter: &RecordFilter) -> Vec<Record> {
        self.collect(|record| filter.matches(record))
    }

    pub fn find_by_zone(&self, zone_id: u64) -> Vec<Record> {
        self.collect(|record| record.zone_id == zone_id)
    }

    pub fn all(&self) -> Vec<Record> {
        self.collect(|_| true)
    }

    pub fn len(&self) -> usize {
        self.table.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().records.is_empty()
    }

    fn collect(&self, predicate: impl Fn(&Record) -> bool) -> Vec<Record> {
        self.table
            .read()
            .records
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}
