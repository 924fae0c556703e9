//! Load [`ServerConfig`] from environment variables.

use tracing::debug;

use crate::defaults::DEFAULT_LOG_LEVEL;
use crate::error::ConfigResult;
use crate::model::ServerConfig;
use crate::validate::{
    parse_bool, parse_ip, parse_log_format, parse_paths, parse_port, parse_seconds,
    parse_url_path,
};

/// Listener IP address.
pub const ENV_BIND_ADDR: &str = "RESHELF_BIND_ADDR";
/// Listener port.
pub const ENV_HTTP_PORT: &str = "RESHELF_HTTP_PORT";
/// Default tracing filter.
pub const ENV_LOG_LEVEL: &str = "RESHELF_LOG_LEVEL";
/// `json` or `pretty`.
pub const ENV_LOG_FORMAT: &str = "RESHELF_LOG_FORMAT";
/// Build identifier.
pub const ENV_BUILD_SHA: &str = "RESHELF_BUILD_SHA";
/// Comma-separated allow-list of absolute roots.
pub const ENV_ALLOW_PATHS: &str = "RESHELF_ALLOW_PATHS";
/// Force preview mode for mutating operations.
pub const ENV_FORCE_PREVIEW: &str = "RESHELF_FORCE_PREVIEW";
/// Download-server request timeout in seconds.
pub const ENV_ACQUIRE_TIMEOUT_SECS: &str = "RESHELF_ACQUIRE_TIMEOUT_SECS";
/// Path appended to the download server address.
pub const ENV_ACQUIRE_SUBMIT_PATH: &str = "RESHELF_ACQUIRE_SUBMIT_PATH";

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` naming the first variable that fails to parse.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset and blank variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` naming the first variable that fails to parse.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = read(ENV_BIND_ADDR) {
            config.bind_addr = parse_ip(ENV_BIND_ADDR, &raw)?;
        }
        if let Some(raw) = read(ENV_HTTP_PORT) {
            config.http_port = parse_port(ENV_HTTP_PORT, &raw)?;
        }
        config.log_level = read(ENV_LOG_LEVEL).map_or_else(
            || DEFAULT_LOG_LEVEL.to_string(),
            |raw| raw.trim().to_string(),
        );
        if let Some(raw) = read(ENV_LOG_FORMAT) {
            config.log_format = Some(parse_log_format(ENV_LOG_FORMAT, &raw)?);
        }
        if let Some(raw) = read(ENV_BUILD_SHA) {
            config.build_sha = raw.trim().to_string();
        }
        if let Some(raw) = read(ENV_ALLOW_PATHS) {
            config.allow_paths = parse_paths(ENV_ALLOW_PATHS, &raw)?;
        }
        if let Some(raw) = read(ENV_FORCE_PREVIEW) {
            config.force_preview = parse_bool(ENV_FORCE_PREVIEW, &raw)?;
        }
        if let Some(raw) = read(ENV_ACQUIRE_TIMEOUT_SECS) {
            config.acquire.timeout = parse_seconds(ENV_ACQUIRE_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = read(ENV_ACQUIRE_SUBMIT_PATH) {
            config.acquire.submit_path = parse_url_path(ENV_ACQUIRE_SUBMIT_PATH, &raw)?;
        }

        debug!(
            addr = %config.socket_addr(),
            allow_paths = config.allow_paths.len(),
            force_preview = config.force_preview,
            "loaded server configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::error::ConfigError;
    use crate::model::LogFormatChoice;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() -> anyhow::Result<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config, ServerConfig::default());
        Ok(())
    }

    #[test]
    fn every_variable_is_applied() -> anyhow::Result<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ENV_BIND_ADDR, "127.0.0.1"),
            (ENV_HTTP_PORT, "8088"),
            (ENV_LOG_LEVEL, "reshelf_fsops=debug"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_BUILD_SHA, "abc123"),
            (ENV_ALLOW_PATHS, "/srv/media,/mnt/nas"),
            (ENV_FORCE_PREVIEW, "yes"),
            (ENV_ACQUIRE_TIMEOUT_SECS, "5"),
            (ENV_ACQUIRE_SUBMIT_PATH, "command/download"),
        ]))?;
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8088");
        assert_eq!(config.log_level, "reshelf_fsops=debug");
        assert_eq!(config.log_format, Some(LogFormatChoice::Json));
        assert_eq!(config.build_sha, "abc123");
        assert_eq!(
            config.allow_paths,
            vec![PathBuf::from("/srv/media"), PathBuf::from("/mnt/nas")]
        );
        assert!(config.force_preview);
        assert_eq!(config.acquire.timeout, Duration::from_secs(5));
        assert_eq!(config.acquire.submit_path, "/command/download");
        Ok(())
    }

    #[test]
    fn blank_values_fall_back_to_defaults() -> anyhow::Result<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (ENV_HTTP_PORT, "  "),
            (ENV_LOG_LEVEL, ""),
        ]))?;
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.log_level, "info");
        Ok(())
    }

    #[test]
    fn invalid_port_names_the_variable() {
        let err = ServerConfig::from_lookup(lookup_from(&[(ENV_HTTP_PORT, "abc")]));
        assert!(matches!(
            err,
            Err(ConfigError::InvalidField {
                field: ENV_HTTP_PORT,
                ..
            })
        ));
    }
}
