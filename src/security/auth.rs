//! Shared-secret authentication for the ISE route.
//!
//! Callers present the plugin token in `X-Plugin-Key` or `X-Token`.
//! `X-Plugin-Key` is checked first; only an empty value falls through to
//! `X-Token`. Values are compared byte for byte, so a non-UTF-8 value is a
//! mismatch. An unset configured token rejects everything.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Primary token header.
pub const PLUGIN_KEY_HEADER: &str = "x-plugin-key";
/// Fallback token header.
pub const TOKEN_HEADER: &str = "x-token";

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,
}

/// Validates the caller's shared secret.
#[derive(Clone)]
pub struct Authenticator {
    /// `None` when no token is configured.
    token: Option<Arc<str>>,
}

impl Authenticator {
    pub fn new(token: &str) -> Self {
        let token = (!token.is_empty()).then(|| Arc::from(token));
        Self { token }
    }

    /// The token presented by the caller: the first non-empty header.
    pub fn presented_token(headers: &HeaderMap) -> Option<&HeaderValue> {
        [PLUGIN_KEY_HEADER, TOKEN_HEADER]
            .into_iter()
            .filter_map(|name| headers.get(name))
            .find(|value| !value.is_empty())
    }

    /// Check the request headers against the configured token.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let expected = self.token.as_deref().ok_or(AuthError::Unauthorized)?;
        match Self::presented_token(headers) {
            Some(presented) if presented.as_bytes() == expected.as_bytes() => Ok(()),
            _ => Err(AuthError::Unauthorized),
        }
    }
}

/// Middleware guarding the ISE route. Rejects before the body is read.
pub async fn require_plugin_token(
    State(authenticator): State<Authenticator>,
    request: Request,
    next: Next,
) -> Response {
    match authenticator.authenticate(request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with missing or invalid token");
            e.into_response()
        }
    }
}
