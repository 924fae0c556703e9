//! Fallback values applied when an environment variable is unset.

use std::net::{IpAddr, Ipv4Addr};

/// Listener address when `RESHELF_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
/// Listener port when `RESHELF_HTTP_PORT` is unset.
pub const DEFAULT_HTTP_PORT: u16 = 5000;
/// Log filter when `RESHELF_LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Build identifier when `RESHELF_BUILD_SHA` is unset.
pub const DEFAULT_BUILD_SHA: &str = "dev";
/// Per-request timeout for download-server submission.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
/// qBittorrent Web API endpoint for adding torrents by URL.
pub const DEFAULT_ACQUIRE_SUBMIT_PATH: &str = "/api/v2/torrents/add";
