//! Speech-evaluation (ISE) forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! raw JSON body
//!     → request.rs (lenient parse, defaults, required fields)
//!     → security::limits (audio size cap)
//!     → signing.rs (X-Param, X-CurTime, X-CheckSum)
//!     → upstream.rs (form-encoded POST, 60s timeout)
//!     → UpstreamResponse (status, content-type, body) relayed verbatim
//! ```
//!
//! # Design Decisions
//! - No state across requests; `SigningProxy` is shared read-only
//! - No retries: one upstream failure is one proxy failure
//! - Upstream 4xx/5xx are relayed, not translated

pub mod proxy;
pub mod request;
pub mod signing;
pub mod types;
pub mod upstream;

pub use proxy::SigningProxy;
pub use request::IseRequest;
pub use signing::{Credentials, IseParams, SignedHeaders};
pub use types::{IseForm, ProxyError, UpstreamError, UpstreamResponse};
pub use upstream::{HttpUpstream, UpstreamClient, UpstreamRequest};
