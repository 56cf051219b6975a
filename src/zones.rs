use serde::Serialize;

/// A DNS zone known to the emulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub id: u64,
    pub name: String,
}

impl Zone {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Split a fully-qualified name into the owner label relative to this zone.
    ///
    /// Names outside the zone are returned unchanged and end up stored as a
    /// literal dotted owner label.
    pub fn owner_label<'a>(&self, fqdn: &'a str) -> &'a str {
        fqdn.strip_suffix(self.name.as_str())
            .and_then(|prefix| prefix.strip_suffix('.'))
            .unwrap_or(fqdn)
    }
}

/// Fixed registry of zones, seeded at startup.
///
/// Lookups preserve the seed order; there are no mutation operations.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Case-insensitive substring match against zone names
    pub fn find_by_hint(&self, hint: &str) -> Vec<Zone> {
        let hint = hint.to_lowercase();
        self.zones
            .iter()
            .filter(|zone| zone.name.to_lowercase().contains(&hint))
            .cloned()
            .collect()
    }

    /// Exact, case-sensitive name match
    pub fn find_by_exact_name(&self, name: &str) -> Option<Zone> {
        self.zones.iter().find(|zone| zone.name == name).cloned()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Zone> {
        self.zones.iter().find(|zone| zone.id == id).cloned()
    }

    pub fn all(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
