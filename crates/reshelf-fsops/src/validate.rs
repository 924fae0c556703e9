//! Field validation shared by the typed request constructors.

use std::path::{Path, PathBuf};

use crate::error::{FsOpsError, FsOpsResult};
use crate::paths::{normalize, resolve_against};

/// Trimmed value, or `InvalidInput{reason: "blank"}`.
pub(crate) fn required<'a>(field: &'static str, raw: &'a str) -> FsOpsResult<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FsOpsError::invalid(field, "blank", None))
    } else {
        Ok(trimmed)
    }
}

/// Required, absolute, lexically normalized path.
pub(crate) fn absolute_path(field: &'static str, raw: &str) -> FsOpsResult<PathBuf> {
    let trimmed = required(field, raw)?;
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(FsOpsError::invalid(
            field,
            "not_absolute",
            Some(trimmed.to_string()),
        ));
    }
    Ok(normalize(path))
}

/// Required path; relative values resolve against `root`.
pub(crate) fn target_path(field: &'static str, root: &Path, raw: &str) -> FsOpsResult<PathBuf> {
    let trimmed = required(field, raw)?;
    Ok(resolve_against(root, Path::new(trimmed)))
}

/// Reject text that would escape the folder when used inside a file name.
pub(crate) fn name_fragment(field: &'static str, value: &str) -> FsOpsResult<()> {
    if value.contains(['/', '\\', '\0']) {
        return Err(FsOpsError::invalid(
            field,
            "path_separator",
            Some(value.to_string()),
        ));
    }
    Ok(())
}
