//! ISE request/response types and error definitions.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Fallback content type when the upstream omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Form body sent upstream. Exactly these two fields, values as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IseForm {
    pub audio: String,
    pub text: String,
}

/// Response from the upstream, relayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

/// Network-level failures talking to the upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, DNS, TLS or body read failure.
    #[error("{0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// A signed header could not be encoded as an HTTP header value.
    #[error("invalid value for header {0}")]
    InvalidHeader(&'static str),
}

/// Errors produced while handling an ISE request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Request body could not be read.
    #[error("Invalid JSON")]
    InvalidJson,

    /// `audio` or `text` absent, null, empty, or not a string.
    #[error("Missing 'audio' (base64) or 'text'")]
    MissingFields,

    /// Base64 audio longer than the configured cap.
    #[error("audio too large")]
    AudioTooLarge { len: usize, limit: usize },

    /// Inbound body exceeded `limits.max_body_bytes`.
    #[error("request body too large")]
    BodyTooLarge,

    /// Upstream unreachable.
    #[error("Upstream request failed")]
    Upstream(#[from] UpstreamError),

    /// Upstream parameters could not be serialized.
    #[error("Internal error")]
    Signing(#[from] serde_json::Error),
}

impl ProxyError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidJson | ProxyError::MissingFields => StatusCode::BAD_REQUEST,
            ProxyError::AudioTooLarge { .. } | ProxyError::BodyTooLarge => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic detail included in the response body, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            ProxyError::Upstream(e) => Some(e.to_string()),
            _ => None,
        }
    }
}
