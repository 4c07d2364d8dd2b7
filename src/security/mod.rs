//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request on /iflytek/ise:
//!     → auth.rs (shared-secret check, before the body is read)
//!     → limits.rs (audio size cap, after the body is parsed)
//!     → Pass to the signing proxy
//! ```
//!
//! # Design Decisions
//! - Fail closed: an unset token rejects every request
//! - Header priority is X-Plugin-Key, then X-Token

pub mod auth;
pub mod limits;

pub use auth::{require_plugin_token, AuthError, Authenticator};
pub use limits::AudioLimit;
