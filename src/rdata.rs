//! Derivation of the flat `rdata` string stored on every record.
//!
//! Clients send rdata in three shapes: a structured object
//! (`{"address": "10.0.0.1"}`), a bare scalar, or the legacy entity
//! properties string (`linkedRecordName=foo.example.com|ttl=300`).

use crate::error::ApiError;
use serde_json::Value;
use std::collections::HashMap;

/// Keys of a structured rdata object, in priority order
const STRUCTURED_KEYS: [&str; 3] = ["address", "cname", "text"];

/// Normalize a JSON rdata value into its stored string form
pub fn normalize(value: &Value) -> String {
    match value {
        Value::Object(map) => STRUCTURED_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| is_truthy(v))
            .map(scalar_to_string)
            .unwrap_or_else(|| value.to_string()),
        other => scalar_to_string(other),
    }
}

/// String form of a JSON value: strings verbatim, everything else as JSON text
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Result of decoding a legacy properties string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyProperties {
    pub rdata: String,
    pub ttl: Option<u32>,
}

impl LegacyProperties {
    /// Decode `key1=value1|key2=value2`.
    ///
    /// rdata comes from `linkedRecordName`, then `addresses`, then `rdata`
    /// (with surrounding escaped quotes trimmed). A `ttl` key overrides the
    /// record TTL.
    pub fn parse(properties: &str) -> Result<Self, ApiError> {
        let mut pairs = HashMap::new();
        for segment in properties.split('|') {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                ApiError::validation(format!("Malformed properties segment: '{}'", segment))
            })?;
            pairs.insert(key, value);
        }

        let non_empty = |key: &str| pairs.get(key).copied().filter(|v| !v.is_empty());
        let rdata = non_empty("linkedRecordName")
            .or_else(|| non_empty("addresses"))
            .map(str::to_string)
            .unwrap_or_else(|| {
                pairs
                    .get("rdata")
                    .copied()
                    .unwrap_or_default()
                    .trim_matches(|c| c == '\\' || c == '"')
                    .to_string()
            });

        let ttl = pairs
            .get("ttl")
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| ApiError::validation(format!("Invalid ttl in properties: '{}'", raw)))
            })
            .transpose()?;

        Ok(Self { rdata, ttl })
    }

    /// Encode a record back into the properties shape served by entity listings
    pub fn encode(rdata: &str, ttl: u32) -> String {
        format!("rdata={}|ttl={}", rdata, ttl)
    }
}
