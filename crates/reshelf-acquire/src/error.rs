//! # Design
//!
//! - Constant messages; the offending field or value travels as context.
//! - `detail()` is the text surfaced verbatim to API callers.

use thiserror::Error;

/// Result type for acquisition requests.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Failures that abort an acquisition request as a whole.
///
/// Per-link transport or status failures are log lines, never errors.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// A request field failed validation.
    #[error("acquire invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// The server address is not an absolute `http`/`https` URL.
    #[error("acquire invalid server address")]
    InvalidServer {
        /// Address as supplied.
        value: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// The HTTP client could not be constructed.
    #[error("acquire client construction failed")]
    Client {
        /// Underlying client error.
        source: reqwest::Error,
    },
}

impl AcquireError {
    /// Operator-facing description including the failing context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidInput { field, reason } => match *reason {
                "empty" => format!("{field} must be a non-empty list"),
                "blank" => format!("{field} is required"),
                reason => format!("invalid {field} ({reason})"),
            },
            Self::InvalidServer { value, reason } => {
                format!("invalid server_addr ({reason}): {value}")
            }
            Self::Client { source } => format!("failed to build HTTP client: {source}"),
        }
    }
}
