use crate::config::EmulatorConfig;
use crate::records::RecordStore;
use crate::session::SessionStore;
use crate::zones::ZoneCatalog;
use std::sync::Arc;

/// All emulator state, constructed once and shared with every handler
#[derive(Debug, Clone)]
pub struct EmulatorStore {
    pub sessions: Arc<SessionStore>,
    pub zones: Arc<ZoneCatalog>,
    pub records: Arc<RecordStore>,
}

impl EmulatorStore {
    pub fn new(config: &EmulatorConfig) -> Self {
        let zones = Arc::new(ZoneCatalog::new(config.zones.clone()));
        Self {
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            records: Arc::new(RecordStore::new(zones.clone(), config.record_id_base)),
            zones,
        }
    }
}

impl Default for EmulatorStore {
    fn default() -> Self {
        Self::new(&EmulatorConfig::default())
    }
}
