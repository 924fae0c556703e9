//! # Design
//!
//! - Centralize startup errors raised while wiring the server.
//! - Keep messages constant and carry the failing operation as a field.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: reshelf_config::ConfigError,
    },
    /// Telemetry could not be initialised.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: reshelf_telemetry::TelemetryError,
    },
    /// The download-server client could not be built.
    #[error("acquisition client setup failed")]
    Acquire {
        /// Operation identifier.
        operation: &'static str,
        /// Source acquisition error.
        source: reshelf_acquire::AcquireError,
    },
    /// The HTTP server failed to start or stopped unexpectedly.
    #[error("api server failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source server error.
        source: reshelf_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: reshelf_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: reshelf_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn acquire(
        operation: &'static str,
        source: reshelf_acquire::AcquireError,
    ) -> Self {
        Self::Acquire { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: reshelf_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn helpers_build_variants_with_sources() {
        let config = AppError::config(
            "config.load",
            reshelf_config::ConfigError::InvalidField {
                field: "RESHELF_HTTP_PORT",
                reason: "not_a_number",
                value: Some("abc".to_string()),
            },
        );
        assert!(matches!(
            config,
            AppError::Config {
                operation: "config.load",
                ..
            }
        ));
        assert_eq!(config.to_string(), "configuration operation failed");
        assert!(config.source().is_some());

        let acquire = AppError::acquire(
            "acquire.client",
            reshelf_acquire::AcquireError::InvalidInput {
                field: "magnet_links",
                reason: "empty",
            },
        );
        assert_eq!(acquire.to_string(), "acquisition client setup failed");

        let api = AppError::api_server(
            "api_server.serve",
            reshelf_api::ApiServerError::Serve {
                source: std::io::Error::other("listener closed"),
            },
        );
        assert_eq!(api.to_string(), "api server failed");
        assert!(api.source().is_some());
    }
}
