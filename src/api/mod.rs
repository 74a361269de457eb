//! HTTP API layer.
//!
//! Maps the tracker operations onto a small axum router: sleep start/end/
//! status, meal logging, record listing and deletion, range filtering, and
//! trailing-window statistics. All responses are JSON; failures come back
//! as `{"error": "..."}` with 400/404/500 per the error taxonomy.

/// API error taxonomy and response mapping.
pub mod error;

/// Endpoint handlers and request/response types.
pub mod handlers;

/// Router construction and server lifecycle.
pub mod server;
