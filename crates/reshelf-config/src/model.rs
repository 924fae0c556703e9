//! Typed configuration models.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::{
    DEFAULT_ACQUIRE_SUBMIT_PATH, DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_BIND_ADDR,
    DEFAULT_BUILD_SHA, DEFAULT_HTTP_PORT, DEFAULT_LOG_LEVEL,
};

/// Log output format requested through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatChoice {
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

/// Settings for forwarding links to the download server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireSettings {
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Path appended to the caller-supplied server address.
    pub submit_path: String,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            submit_path: DEFAULT_ACQUIRE_SUBMIT_PATH.to_string(),
        }
    }
}

/// Fully validated server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listener IP address.
    pub bind_addr: IpAddr,
    /// Listener port.
    pub http_port: u16,
    /// Default tracing filter directive.
    pub log_level: String,
    /// Explicit log format; `None` lets telemetry infer one from the build.
    pub log_format: Option<LogFormatChoice>,
    /// Build identifier attached to logs and `/health`.
    pub build_sha: String,
    /// Absolute roots that filesystem operations may touch; empty allows all.
    pub allow_paths: Vec<PathBuf>,
    /// Treat every mutating filesystem request as a preview.
    pub force_preview: bool,
    /// Download-server submission settings.
    pub acquire: AcquireSettings,
}

impl ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            http_port: DEFAULT_HTTP_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: None,
            build_sha: DEFAULT_BUILD_SHA.to_string(),
            allow_paths: Vec::new(),
            force_preview: false,
            acquire: AcquireSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_socket_addr_listens_on_all_interfaces() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
        assert!(config.allow_paths.is_empty());
        assert_eq!(config.acquire.submit_path, "/api/v2/torrents/add");
    }
}
