//! HTTP middleware stack for the advisor.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, holds the selection slot)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
