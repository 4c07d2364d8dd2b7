//! Authenticated signing proxy for the iFlytek speech-evaluation (ISE) API.

pub mod config;
pub mod http;
pub mod ise;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use ise::SigningProxy;
pub use lifecycle::Shutdown;
