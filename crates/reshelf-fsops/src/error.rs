//! # Design
//!
//! - Constant-message errors for the maintenance operations.
//! - Failing field, path or pattern travels as context, never inside the message.
//! - `detail()` renders the operator-facing text returned in `{success:false, error}`.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsOpsResult<T> = Result<T, FsOpsError>;

/// Errors that abort a whole operation.
///
/// Per-item failures never surface here; the executor records them as log lines.
#[derive(Debug, Error)]
pub enum FsOpsError {
    /// Request validation failures, raised before any IO.
    #[error("fsops invalid input")]
    InvalidInput {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// The root folder does not exist.
    #[error("fsops path not found")]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },
    /// A root or target path exists but is not a directory.
    #[error("fsops path is not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// The move target is absent and creation was not requested.
    #[error("fsops target folder missing")]
    TargetMissing {
        /// Absent target folder.
        path: PathBuf,
    },
    /// A path lies outside every configured allow-list root.
    #[error("fsops path not allowed")]
    PathNotAllowed {
        /// Rejected path.
        path: PathBuf,
    },
    /// IO failures while inspecting the tree ahead of planning.
    #[error("fsops io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A rename matcher expression failed to compile.
    #[error("fsops pattern failure")]
    Pattern {
        /// Expression that failed to compile.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
}

impl FsOpsError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn invalid(
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            reason,
            value,
        }
    }

    /// Path the error refers to, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::TargetMissing { path }
            | Self::PathNotAllowed { path }
            | Self::Io { path, .. } => Some(path),
            Self::InvalidInput { .. } | Self::Pattern { .. } => None,
        }
    }

    /// Operator-facing description including the failing context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidInput {
                field,
                reason,
                value,
            } => match (*reason, value) {
                ("blank", _) => format!("{field} is required"),
                ("not_absolute", Some(value)) => {
                    format!("{field} must be an absolute path: {value}")
                }
                (reason, Some(value)) => format!("invalid {field} ({reason}): {value}"),
                (reason, None) => format!("invalid {field} ({reason})"),
            },
            Self::NotFound { path } => format!("folder not found: {}", path.display()),
            Self::NotADirectory { path } => format!("not a directory: {}", path.display()),
            Self::TargetMissing { path } => {
                format!("target folder does not exist: {}", path.display())
            }
            Self::PathNotAllowed { path } => format!("path not permitted: {}", path.display()),
            Self::Io {
                operation,
                path,
                source,
            } => format!("{operation} failed for {}: {source}", path.display()),
            Self::Pattern { pattern, source } => format!("invalid pattern {pattern}: {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn helpers_build_variants_with_sources() {
        let io_err = FsOpsError::io("list", "/data", io::Error::other("denied"));
        assert!(matches!(io_err, FsOpsError::Io { .. }));
        assert!(io_err.source().is_some());
        assert_eq!(io_err.to_string(), "fsops io failure");
        assert_eq!(io_err.path(), Some(Path::new("/data")));

        let Err(regex_err) = regex::Regex::new("(") else {
            panic!("expected regex error");
        };
        let pattern_err = FsOpsError::Pattern {
            pattern: "(",
            source: regex_err,
        };
        assert!(pattern_err.source().is_some());
        assert!(pattern_err.path().is_none());
    }

    #[test]
    fn detail_names_field_and_path() {
        assert_eq!(
            FsOpsError::invalid("keyword", "blank", None).detail(),
            "keyword is required"
        );
        assert_eq!(
            FsOpsError::invalid("root_folder", "not_absolute", Some("docs".to_string())).detail(),
            "root_folder must be an absolute path: docs"
        );
        assert_eq!(
            FsOpsError::TargetMissing {
                path: PathBuf::from("/docs/archive"),
            }
            .detail(),
            "target folder does not exist: /docs/archive"
        );
        assert_eq!(
            FsOpsError::invalid("custom_pattern", "unknown_token", Some("{x}".to_string()))
                .detail(),
            "invalid custom_pattern (unknown_token): {x}"
        );
    }
}
