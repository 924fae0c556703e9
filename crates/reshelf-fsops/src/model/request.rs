//! Typed requests. Constructors validate every field before any IO happens.

use std::path::PathBuf;

use super::report::ExecutionReport;
use crate::error::FsOpsResult;
use crate::rename::RenameRule;
use crate::validate::{absolute_path, required, target_path};

/// List the immediate subdirectories of `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSubfoldersRequest {
    /// Absolute, normalized root folder.
    pub root: PathBuf,
}

impl ListSubfoldersRequest {
    /// Validate the raw `root_folder` field.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank or relative root.
    pub fn new(root_folder: &str) -> FsOpsResult<Self> {
        Ok(Self {
            root: absolute_path("root_folder", root_folder)?,
        })
    }
}

/// Flags accepted by a keyword move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Create the target folder when it is absent.
    pub create_if_not_exists: bool,
    /// Consider files below the immediate children.
    pub recursive: bool,
    /// Describe the plan without applying it.
    pub preview: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            create_if_not_exists: true,
            recursive: false,
            preview: true,
        }
    }
}

/// Relocate files whose names contain a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Absolute, normalized root folder.
    pub root: PathBuf,
    /// Trimmed keyword.
    pub keyword: String,
    /// Target folder, resolved against `root` when relative.
    pub target: PathBuf,
    /// Behaviour flags.
    pub options: MoveOptions,
}

impl MoveRequest {
    /// Validate the raw request fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank or relative root, a blank keyword,
    /// or a blank target.
    pub fn new(
        root_folder: &str,
        keyword: &str,
        target_folder: &str,
        options: MoveOptions,
    ) -> FsOpsResult<Self> {
        let root = absolute_path("root_folder", root_folder)?;
        let keyword = required("keyword", keyword)?.to_string();
        let target = target_path("target_folder", &root, target_folder)?;
        Ok(Self {
            root,
            keyword,
            target,
            options,
        })
    }
}

/// Rename every regular file directly inside `folder`.
#[derive(Debug, Clone)]
pub struct RenameRequest {
    /// Absolute, normalized folder.
    pub folder: PathBuf,
    /// Name derivation rule.
    pub rule: RenameRule,
    /// Describe the plan without applying it.
    pub preview: bool,
}

impl RenameRequest {
    /// Validate the folder and compile the rename rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad folder, prefix, or pattern.
    pub fn new(
        folder_path: &str,
        prefix: &str,
        custom_pattern: &str,
        preview: bool,
    ) -> FsOpsResult<Self> {
        let folder = absolute_path("folder_path", folder_path)?;
        let rule = RenameRule::new(prefix, custom_pattern)?;
        Ok(Self {
            folder,
            rule,
            preview,
        })
    }
}

/// Remove empty directories whose names contain a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    /// Absolute, normalized root folder.
    pub root: PathBuf,
    /// Trimmed keyword.
    pub keyword: String,
    /// Consider directories below the immediate children.
    pub recursive: bool,
    /// Describe the plan without applying it.
    pub preview: bool,
}

impl DeleteRequest {
    /// Validate the raw request fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank or relative root or a blank keyword.
    pub fn new(
        root_folder: &str,
        keyword: &str,
        recursive: bool,
        preview: bool,
    ) -> FsOpsResult<Self> {
        Ok(Self {
            root: absolute_path("root_folder", root_folder)?,
            keyword: required("keyword", keyword)?.to_string(),
            recursive,
            preview,
        })
    }
}

/// Closed set of operations the service dispatches.
#[derive(Debug, Clone)]
pub enum FsRequest {
    /// See [`ListSubfoldersRequest`].
    ListSubfolders(ListSubfoldersRequest),
    /// See [`MoveRequest`].
    MoveByKeyword(MoveRequest),
    /// See [`RenameRequest`].
    RenameBatch(RenameRequest),
    /// See [`DeleteRequest`].
    DeleteEmptyFolders(DeleteRequest),
}

impl FsRequest {
    /// Label used for spans and `fsops_operations_total{operation}`.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::ListSubfolders(_) => "list_subfolders",
            Self::MoveByKeyword(_) => "move_by_keyword",
            Self::RenameBatch(_) => "rename_batch",
            Self::DeleteEmptyFolders(_) => "delete_empty_folders",
        }
    }
}

/// What a dispatched request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsResponse {
    /// Sorted subfolder names.
    Subfolders(Vec<String>),
    /// Log lines and counters of a mutating operation.
    Report(ExecutionReport),
}

impl FsResponse {
    /// Subfolder names, when this answers a listing.
    #[must_use]
    pub fn into_subfolders(self) -> Option<Vec<String>> {
        match self {
            Self::Subfolders(names) => Some(names),
            Self::Report(_) => None,
        }
    }

    /// Execution report, when this answers a mutating operation.
    #[must_use]
    pub fn into_report(self) -> Option<ExecutionReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Subfolders(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsOpsError;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn move_request_trims_and_resolves_target() -> TestResult {
        let request = MoveRequest::new(" /docs ", " report ", "archive", MoveOptions::default())?;
        assert_eq!(request.root, PathBuf::from("/docs"));
        assert_eq!(request.keyword, "report");
        assert_eq!(request.target, PathBuf::from("/docs/archive"));
        assert!(request.options.preview);
        assert!(request.options.create_if_not_exists);
        Ok(())
    }

    #[test]
    fn move_request_validates_fields_in_order() {
        let cases = [
            ("", "k", "t", "root_folder"),
            ("docs", "k", "t", "root_folder"),
            ("/docs", "  ", "t", "keyword"),
            ("/docs", "k", "", "target_folder"),
        ];
        for (root, keyword, target, expected) in cases {
            let result = MoveRequest::new(root, keyword, target, MoveOptions::default());
            assert!(
                matches!(result, Err(FsOpsError::InvalidInput { field, .. }) if field == expected),
                "expected {expected} to fail"
            );
        }
    }

    #[test]
    fn rename_request_requires_prefix_or_pattern() -> TestResult {
        assert!(matches!(
            RenameRequest::new("/media", " ", "", true),
            Err(FsOpsError::InvalidInput {
                field: "prefix",
                ..
            })
        ));
        let request = RenameRequest::new("/media", "", "E{n}", false)?;
        assert_eq!(request.rule.prefix(), "");
        assert!(!request.preview);
        Ok(())
    }

    #[test]
    fn delete_request_rejects_blank_keyword() {
        assert!(DeleteRequest::new("/docs", "old", false, true).is_ok());
        assert!(matches!(
            DeleteRequest::new("/docs", "", false, true),
            Err(FsOpsError::InvalidInput {
                field: "keyword",
                reason: "blank",
                ..
            })
        ));
    }

    #[test]
    fn operation_labels_are_stable() -> TestResult {
        let request = FsRequest::ListSubfolders(ListSubfoldersRequest::new("/")?);
        assert_eq!(request.operation(), "list_subfolders");
        let request = FsRequest::DeleteEmptyFolders(DeleteRequest::new("/", "x", true, true)?);
        assert_eq!(request.operation(), "delete_empty_folders");
        Ok(())
    }

    #[test]
    fn response_accessors_match_variant() {
        let listing = FsResponse::Subfolders(vec!["a".to_string()]);
        assert_eq!(listing.clone().into_subfolders(), Some(vec!["a".to_string()]));
        assert!(listing.into_report().is_none());
    }
}
