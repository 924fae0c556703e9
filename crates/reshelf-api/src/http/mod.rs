//! HTTP surface modules (router, handlers, middleware).

/// Shared header names.
pub mod constants;
/// `{success:false, error}` responses and status mapping.
pub mod errors;
/// Route handlers grouped by collaborator.
pub mod handlers;
/// Health and metrics endpoints.
pub mod health;
/// Router construction and server host.
pub mod router;
/// Metrics middleware for HTTP requests.
pub mod telemetry;
