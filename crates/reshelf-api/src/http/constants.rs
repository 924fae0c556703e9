//! Header names used across the HTTP surface.

/// Request correlation header, assigned when absent and echoed on every response.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
