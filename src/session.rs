use crate::error::AuthError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};
use uuid::Uuid;

/// An issued session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub owner: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Token table shared by request handlers and the background sweep.
///
/// Every operation runs under a single lock acquisition, so a token is
/// checked and evicted in one step.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_ttl(chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX))
    }

    /// Create a store with a signed TTL; a negative TTL issues already-expired tokens
    pub fn with_ttl(ttl: chrono::Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a token for any non-empty credential pair
    pub fn create_session(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            owner: username.to_string(),
            // Saturates instead of overflowing for TTLs past the calendar range
            expires_at: Utc::now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.sessions
            .lock()
            .insert(session.token.clone(), session.clone());

        debug!("Issued session for {}", username);
        Ok(session)
    }

    pub fn validate(&self, token: &str) -> Result<Session, AuthError> {
        let mut sessions = self.sessions.lock();

        let session = sessions.get(token).ok_or(AuthError::Missing)?;
        if session.is_expired_at(Utc::now()) {
            sessions.remove(token);
            debug!("Rejected expired session");
            return Err(AuthError::Expired);
        }

        Ok(session.clone())
    }

    /// Remove a token; returns whether it was present
    pub fn invalidate(&self, token: &str) -> bool {
        self.sessions.lock().remove(token).is_some()
    }

    /// Evict every expired session, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

/// Periodically evict expired sessions until a shutdown signal arrives
pub fn spawn_session_sweeper(
    sessions: Arc<SessionStore>,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Session sweeper received shutdown signal");
                    break;
                }

                _ = ticker.tick() => {
                    let evicted = sessions.sweep_expired();
                    if evicted > 0 {
                        info!("Evicted {} expired sessions", evicted);
                    }
                }
            }
        }
    })
}
