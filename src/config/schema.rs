//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default iFlytek ISE endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.xfyun.cn/v1/service/v2/ise";

/// Root configuration for the ISE proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream speech-assessment API and its credentials.
    pub upstream: UpstreamConfig,

    /// Shared-secret authentication for callers.
    pub auth: AuthConfig,

    /// Payload limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Runtime sizing.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// ISE endpoint URL.
    pub url: String,

    /// iFlytek application id, sent as `X-Appid`.
    pub app_id: String,

    /// iFlytek API key, used only for the checksum.
    pub api_key: String,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            app_id: String::new(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}

/// Caller authentication.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret expected in `X-Plugin-Key` or `X-Token`.
    /// Empty means every request is rejected.
    pub token: String,
}

/// Payload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum length of the base64 `audio` string in bytes (0 = unlimited).
    pub max_audio_bytes: usize,

    /// Maximum inbound request body size in bytes (0 = no cap).
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_audio_bytes: 0,
            max_body_bytes: 0,
        }
    }
}

impl LimitsConfig {
    /// The inbound body cap, if one is configured.
    pub fn body_limit(&self) -> Option<usize> {
        (self.max_body_bytes > 0).then_some(self.max_body_bytes)
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 75 }
    }
}

/// Runtime sizing.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Tokio worker threads (0 = max(2, available CPUs)).
    pub workers: usize,
}

impl ServerConfig {
    /// Resolve the worker thread count.
    pub fn worker_threads(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        cpus.max(2)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.upstream.url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.timeout_secs, 60);
        assert_eq!(config.limits.max_audio_bytes, 0);
        assert!(config.auth.token.is_empty());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            app_id = "app"

            [limits]
            max_audio_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.app_id, "app");
        assert_eq!(config.upstream.timeout_secs, 60);
        assert_eq!(config.limits.max_audio_bytes, 1024);
        assert_eq!(config.limits.body_limit(), None);
        assert_eq!(config.listener.port, 8000);
    }

    #[test]
    fn test_body_limit_is_opt_in() {
        let mut limits = LimitsConfig::default();
        assert_eq!(limits.body_limit(), None);

        limits.max_body_bytes = 4096;
        assert_eq!(limits.body_limit(), Some(4096));
    }

    #[test]
    fn test_worker_threads() {
        let explicit = ServerConfig { workers: 3 };
        assert_eq!(explicit.worker_threads(), 3);
        assert!(ServerConfig::default().worker_threads() >= 2);
    }
}
