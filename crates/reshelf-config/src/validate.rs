//! Parsing helpers for raw environment values.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::model::LogFormatChoice;

/// Parse a boolean flag (`1/true/yes/on`, `0/false/no/off`, case-insensitive).
///
/// # Errors
///
/// Returns `InvalidField` for any other value.
pub fn parse_bool(field: &'static str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(field, "not_a_boolean", raw)),
    }
}

/// Parse a non-zero TCP port.
///
/// # Errors
///
/// Returns `InvalidField` when the value is not an integer in `1..=65535`.
pub fn parse_port(field: &'static str, raw: &str) -> ConfigResult<u16> {
    let port = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::invalid(field, "not_a_port", raw))?;
    if port == 0 {
        return Err(ConfigError::invalid(field, "must_be_non_zero", raw));
    }
    Ok(port)
}

/// Parse an IP address.
///
/// # Errors
///
/// Returns `InvalidField` when the value is not an IPv4 or IPv6 address.
pub fn parse_ip(field: &'static str, raw: &str) -> ConfigResult<IpAddr> {
    raw.trim()
        .parse::<IpAddr>()
        .map_err(|_| ConfigError::invalid(field, "not_an_ip_address", raw))
}

/// Parse a log format name.
///
/// # Errors
///
/// Returns `InvalidField` for anything other than `json` or `pretty`.
pub fn parse_log_format(field: &'static str, raw: &str) -> ConfigResult<LogFormatChoice> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormatChoice::Json),
        "pretty" => Ok(LogFormatChoice::Pretty),
        _ => Err(ConfigError::invalid(field, "unknown_log_format", raw)),
    }
}

/// Parse a positive number of seconds.
///
/// # Errors
///
/// Returns `InvalidField` when the value is not a positive integer.
pub fn parse_seconds(field: &'static str, raw: &str) -> ConfigResult<Duration> {
    let seconds = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(field, "not_a_number", raw))?;
    if seconds == 0 {
        return Err(ConfigError::invalid(field, "must_be_positive", raw));
    }
    Ok(Duration::from_secs(seconds))
}

/// Parse a comma-separated list of absolute paths, ignoring blank segments.
///
/// # Errors
///
/// Returns `InvalidField` when any segment is a relative path.
pub fn parse_paths(field: &'static str, raw: &str) -> ConfigResult<Vec<PathBuf>> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let path = PathBuf::from(segment);
            if path.is_absolute() {
                Ok(path)
            } else {
                Err(ConfigError::invalid(field, "path_not_absolute", segment))
            }
        })
        .collect()
}

/// Normalise an HTTP path so it starts with exactly one `/`.
///
/// # Errors
///
/// Returns `InvalidField` when the value is blank or contains whitespace.
pub fn parse_url_path(field: &'static str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(field, "blank", raw));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid(field, "contains_whitespace", raw));
    }
    Ok(format!("/{}", trimmed.trim_start_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn parse_bool_accepts_common_spellings() -> TestResult {
        for raw in ["1", "TRUE", " yes ", "On"] {
            assert!(parse_bool("FLAG", raw)?);
        }
        for raw in ["0", "false", "No", "off"] {
            assert!(!parse_bool("FLAG", raw)?);
        }
        assert!(parse_bool("FLAG", "maybe").is_err());
        Ok(())
    }

    #[test]
    fn parse_port_rejects_zero_and_garbage() -> TestResult {
        assert_eq!(parse_port("PORT", "8080")?, 8080);
        assert!(matches!(
            parse_port("PORT", "0"),
            Err(ConfigError::InvalidField {
                reason: "must_be_non_zero",
                ..
            })
        ));
        assert!(parse_port("PORT", "70000").is_err());
        assert!(parse_port("PORT", "http").is_err());
        Ok(())
    }

    #[test]
    fn parse_paths_requires_absolute_segments() -> TestResult {
        let paths = parse_paths("ALLOW", "/srv/media, ,/mnt/nas")?;
        assert_eq!(paths, vec![PathBuf::from("/srv/media"), PathBuf::from("/mnt/nas")]);
        assert!(parse_paths("ALLOW", "")?.is_empty());
        let err = parse_paths("ALLOW", "/srv,relative/dir");
        assert!(matches!(
            err,
            Err(ConfigError::InvalidField {
                reason: "path_not_absolute",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn parse_url_path_adds_leading_slash() -> TestResult {
        assert_eq!(parse_url_path("PATH", "api/v2/torrents/add")?, "/api/v2/torrents/add");
        assert_eq!(parse_url_path("PATH", "//add")?, "/add");
        assert!(parse_url_path("PATH", "  ").is_err());
        assert!(parse_url_path("PATH", "/a b").is_err());
        Ok(())
    }

    #[test]
    fn parse_log_format_and_seconds() -> TestResult {
        assert_eq!(parse_log_format("FMT", "JSON")?, LogFormatChoice::Json);
        assert!(parse_log_format("FMT", "xml").is_err());
        assert_eq!(parse_seconds("SECS", "15")?, Duration::from_secs(15));
        assert!(parse_seconds("SECS", "0").is_err());
        assert!(parse_ip("ADDR", "::1").is_ok());
        assert!(parse_ip("ADDR", "localhost").is_err());
        Ok(())
    }
}
