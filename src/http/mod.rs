//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign/propagate x-request-id)
//!     → security::auth (shared-secret check on /iflytek/ise)
//!     → ise::SigningProxy (validate, sign, forward)
//!     → response.rs (relay upstream response or map error to JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeUuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, HEALTH_ROUTE, ISE_ROUTE};
