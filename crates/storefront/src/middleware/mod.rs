//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record in span, Sentry scope, and response)
//! 4. Session layer (tower-sessions over a bounded `moka` store)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{CartSessionStore, SESSION_COOKIE_NAME, create_session_layer};
