//! Validated acquisition request.

use crate::error::{AcquireError, AcquireResult};

/// Links to forward and the server that should receive them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireRequest {
    /// Links in caller order; blank entries are kept and skipped at submission.
    pub magnet_links: Vec<String>,
    /// Trimmed server address.
    pub server_addr: String,
}

impl AcquireRequest {
    /// Validate the raw request fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty link list or a blank server address.
    pub fn new(magnet_links: Vec<String>, server_addr: &str) -> AcquireResult<Self> {
        if magnet_links.is_empty() {
            return Err(AcquireError::InvalidInput {
                field: "magnet_links",
                reason: "empty",
            });
        }
        let server_addr = server_addr.trim();
        if server_addr.is_empty() {
            return Err(AcquireError::InvalidInput {
                field: "server_addr",
                reason: "blank",
            });
        }
        Ok(Self {
            magnet_links,
            server_addr: server_addr.to_string(),
        })
    }
}
