use crate::error::ConfigError;
use crate::zones::Zone;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Address the HTTP API listens on
    pub bind_addr: SocketAddr,

    /// Lifetime of a session token from the moment it is issued
    pub session_ttl: Duration,

    /// How often the background sweep evicts expired sessions
    pub sweep_interval: Duration,

    /// Record ids are assigned starting at `record_id_base + 1`
    pub record_id_base: u64,

    /// Zones available to clients, in lookup order
    pub zones: Vec<Zone>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            session_ttl: Duration::from_secs(3600), // 1 hour
            sweep_interval: Duration::from_secs(60),
            record_id_base: 200_000,
            zones: default_zones(),
        }
    }
}

/// Seed zones the tooling under test expects to find
pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new(100001, "queue.core.windows.net"),
        Zone::new(100002, "privatelink.queue.core.windows.net"),
        Zone::new(100003, "example.com"),
    ]
}

impl EmulatorConfig {
    /// Create an EmulatorConfig from environment variables
    /// Returns Err if any provided value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bind_addr) = std::env::var("BAMSIM_BIND_ADDR") {
            config.bind_addr = parse_bind_addr(&bind_addr)?;
        }

        if let Ok(ttl) = std::env::var("BAMSIM_SESSION_TTL_SECS") {
            config.session_ttl = parse_session_ttl(&ttl)?;
        }

        if let Ok(interval) = std::env::var("BAMSIM_SWEEP_INTERVAL_SECS") {
            config.sweep_interval = parse_sweep_interval(&interval)?;
        }

        if let Ok(base) = std::env::var("BAMSIM_RECORD_ID_BASE") {
            config.record_id_base = base
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidRecordIdBase(base.clone()))?;
        }

        if let Ok(zones) = std::env::var("BAMSIM_ZONES") {
            config.zones = parse_zones(&zones)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidSessionTtl(
                "Session TTL must be greater than 0".to_string(),
            ));
        }
        let expiry = chrono::Duration::from_std(self.session_ttl)
            .ok()
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl));
        if expiry.is_none() {
            return Err(ConfigError::InvalidSessionTtl(format!(
                "Session TTL of {}s puts expiry beyond the representable date range",
                self.session_ttl.as_secs()
            )));
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::InvalidSweepInterval(
                "Sweep interval must be greater than 0".to_string(),
            ));
        }

        for (i, zone) in self.zones.iter().enumerate() {
            let duplicate = self.zones[..i]
                .iter()
                .any(|other| other.id == zone.id || other.name == zone.name);
            if duplicate {
                return Err(ConfigError::InvalidZone(format!(
                    "duplicate zone {}:{}",
                    zone.id, zone.name
                )));
            }
        }

        Ok(())
    }
}

pub fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBindAddress(value.to_string()))
}

pub fn parse_session_ttl(value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSessionTtl(value.to_string()))?;
    Ok(Duration::from_secs(secs))
}

pub fn parse_sweep_interval(value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidSweepInterval(value.to_string()))?;
    Ok(Duration::from_secs(secs))
}

/// Parse a zone list of the form `id:name,id:name`
pub fn parse_zones(value: &str) -> Result<Vec<Zone>, ConfigError> {
    let zones: Vec<Zone> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (id, name) = entry
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidZone(entry.to_string()))?;
            let id = id
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidZone(entry.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidZone(entry.to_string()));
            }
            Ok(Zone::new(id, name))
        })
        .collect::<Result<_, _>>()?;

    if zones.is_empty() {
        return Err(ConfigError::InvalidZone(
            "No zones provided".to_string(),
        ));
    }
    Ok(zones)
}
