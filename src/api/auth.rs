//! Credential extraction and the session gate in front of protected routes.

use crate::error::{ApiError, AuthError};
use crate::session::Session;
use crate::store::EmulatorStore;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;

const BAM_TOKEN_PREFIX: &str = "BAMAuthToken: ";
const BEARER_PREFIX: &str = "Bearer ";
const BASIC_PREFIX: &str = "Basic ";

/// Session of the caller, attached to the request by [`require_session`]
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

fn authorization(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Extract the token from either `BAMAuthToken: <token>` or `Bearer <token>`
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = authorization(headers);
    value
        .strip_prefix(BAM_TOKEN_PREFIX)
        .or_else(|| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::InvalidHeader)
}

/// Decode `Basic base64(user:pass)` into its two parts
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AuthError> {
    let encoded = authorization(headers)
        .strip_prefix(BASIC_PREFIX)
        .ok_or(AuthError::BasicRequired)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::Malformed)?;
    let (username, password) = decoded.split_once(':').ok_or(AuthError::Malformed)?;

    Ok((username.to_string(), password.to_string()))
}

/// Middleware rejecting requests without a live session
pub async fn require_session(
    State(store): State<EmulatorStore>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = token_from_headers(request.headers())
        .and_then(|token| store.sessions.validate(token))
        .inspect_err(|e| debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e))?;

    request
        .extensions_mut()
        .insert(AuthenticatedSession(session));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_token_schemes() {
        assert_eq!(token_from_headers(&headers("BAMAuthToken: abc")), Ok("abc"));
        assert_eq!(token_from_headers(&headers("Bearer xyz")), Ok("xyz"));
        assert_eq!(
            token_from_headers(&headers("Token abc")),
            Err(AuthError::InvalidHeader)
        );
        assert_eq!(
            token_from_headers(&HeaderMap::new()),
            Err(AuthError::InvalidHeader)
        );
    }

    #[test]
    fn test_basic_credentials() {
        let encoded = STANDARD.encode("alice:se:cret");
        assert_eq!(
            basic_credentials(&headers(&format!("Basic {}", encoded))),
            Ok(("alice".to_string(), "se:cret".to_string()))
        );

        assert_eq!(
            basic_credentials(&headers("Bearer abc")),
            Err(AuthError::BasicRequired)
        );
        assert_eq!(
            basic_credentials(&headers("Basic !!!")),
            Err(AuthError::Malformed)
        );
        let no_colon = STANDARD.encode("alice");
        assert_eq!(
            basic_credentials(&headers(&format!("Basic {}", no_colon))),
            Err(AuthError::Malformed)
        );
    }
}
