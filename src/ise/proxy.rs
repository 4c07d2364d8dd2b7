//! The signing proxy: validate, sign, forward, relay.

use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::ise::request::IseRequest;
use crate::ise::signing::{sign, unix_now, Credentials};
use crate::ise::types::{ProxyError, UpstreamResponse};
use crate::ise::upstream::{UpstreamClient, UpstreamRequest};
use crate::security::AudioLimit;

/// Stateless handler for `POST /iflytek/ise`. Shared across requests via
/// `Arc`; callers must authenticate before invoking `handle`.
pub struct SigningProxy {
    credentials: Credentials,
    audio_limit: AudioLimit,
    upstream: Arc<dyn UpstreamClient>,
}

impl SigningProxy {
    pub fn new(
        credentials: Credentials,
        audio_limit: AudioLimit,
        upstream: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            credentials,
            audio_limit,
            upstream,
        }
    }

    /// Build from configuration with the given upstream client.
    pub fn from_config(config: &ProxyConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        Self::new(
            Credentials::new(&config.upstream.app_id, &config.upstream.api_key),
            AudioLimit::new(config.limits.max_audio_bytes),
            upstream,
        )
    }

    /// Handle one raw request body. Upstream error statuses are returned as
    /// `Ok`; only failures to reach the upstream are errors.
    pub async fn handle(&self, raw_body: &[u8]) -> Result<UpstreamResponse, ProxyError> {
        let request = IseRequest::from_json_body(raw_body)?;
        self.audio_limit.check(&request.audio)?;

        let headers = sign(&self.credentials, &request.params(), unix_now())?;
        tracing::debug!(
            language = ?request.language,
            category = ?request.category,
            audio_len = request.audio.len(),
            cur_time = %headers.cur_time,
            "Forwarding signed request"
        );

        let upstream_request = UpstreamRequest {
            headers,
            form: request.into_form(),
        };

        match self.upstream.post_form(upstream_request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::warn!(error = %e, "Upstream request failed");
                Err(ProxyError::Upstream(e))
            }
        }
    }
}
