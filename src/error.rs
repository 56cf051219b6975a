use thiserror::Error;

/// Reasons a request fails the authentication gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid authentication header")]
    InvalidHeader,

    #[error("Basic authentication required")]
    BasicRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Required,

    #[error("Authentication failed")]
    Malformed,
}

/// Errors surfaced to API clients
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Canonical "unknown record" error shared by every record endpoint
    pub fn record_not_found() -> Self {
        ApiError::NotFound("Record not found".to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),

    #[error("Invalid sweep interval: {0}")]
    InvalidSweepInterval(String),

    #[error("Invalid record id base: {0}")]
    InvalidRecordIdBase(String),

    #[error("Invalid zone definition: {0}")]
    InvalidZone(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
