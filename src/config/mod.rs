//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env (optional, loaded into the process environment)
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (IFLYTEK_APPID, PLUGIN_TOKEN, PORT, ...)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer::new at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults to allow minimal configs
//! - Missing credentials only warn; startup continues

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_env_file, ConfigError};
pub use schema::{
    AuthConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, ServerConfig,
    TimeoutConfig, UpstreamConfig,
};
