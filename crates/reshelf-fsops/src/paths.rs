//! Lexical path helpers and the optional allow-list policy.

use std::path::{Component, Path, PathBuf};

use crate::error::{FsOpsError, FsOpsResult};

/// Remove `.` components and resolve `..` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && !path.is_absolute() {
                    normalized.push(Component::ParentDir.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve `raw` against `root` when relative; normalize either way.
#[must_use]
pub fn resolve_against(root: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        normalize(raw)
    } else {
        normalize(&root.join(raw))
    }
}

/// Roots that filesystem operations may touch. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    roots: Vec<PathBuf>,
}

impl AllowList {
    /// Build an allow-list from absolute roots.
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().map(|root| normalize(&root)).collect(),
        }
    }

    /// Whether no restriction is configured.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.roots.is_empty()
    }

    /// Reject paths outside every configured root.
    ///
    /// # Errors
    ///
    /// Returns `PathNotAllowed` when a restriction exists and `path` is not under any root.
    pub fn check(&self, path: &Path) -> FsOpsResult<()> {
        if self.is_unrestricted() {
            return Ok(());
        }
        let candidate = normalize(path);
        if self.roots.iter().any(|root| candidate.starts_with(root)) {
            Ok(())
        } else {
            Err(FsOpsError::PathNotAllowed { path: candidate })
        }
    }
}
