//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and cross-field
//! constraints. All errors are collected, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.url '{0}' is not an http(s) URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("timeouts.request_secs ({request_secs}) must exceed upstream.timeout_secs ({upstream_secs})")]
    RequestTimeoutTooShort { request_secs: u64, upstream_secs: u64 },

    #[error("limits.max_body_bytes ({body}) is set but limits.max_audio_bytes ({audio}) is unlimited or larger")]
    BodyLimitBelowAudioLimit { body: usize, audio: usize },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match reqwest::Url::parse(&config.upstream.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.url.clone())),
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    // The 502 path must be reachable before the outer timeout fires.
    if config.timeouts.request_secs <= config.upstream.timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            upstream_secs: config.upstream.timeout_secs,
        });
    }

    // A body cap must never reject audio the audio cap accepts.
    if let Some(body) = config.limits.body_limit() {
        let audio = config.limits.max_audio_bytes;
        if audio == 0 || audio > body {
            errors.push(ValidationError::BodyLimitBelowAudioLimit { body, audio });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Names of credentials that are unset. Missing credentials do not block
/// startup, but every request will then fail auth or carry a bad signature.
pub fn missing_credentials(config: &ProxyConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.upstream.app_id.is_empty() {
        missing.push("upstream.app_id (IFLYTEK_APPID)");
    }
    if config.upstream.api_key.is_empty() {
        missing.push("upstream.api_key (IFLYTEK_APIKEY)");
    }
    if config.auth.token.is_empty() {
        missing.push("auth.token (PLUGIN_TOKEN)");
    }
    missing
}
