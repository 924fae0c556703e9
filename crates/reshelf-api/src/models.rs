//! JSON request and response bodies of the HTTP surface.
//!
//! Every request field defaults, so missing
//! values reach the typed constructors and fail with a field-specific message.

use reshelf_acquire::{AcquireRequest, AcquireResult};
use reshelf_fsops::{
    DeleteRequest, FsOpsResult, ListSubfoldersRequest, MoveOptions, MoveRequest, RenameRequest,
    ReportSummary,
};
use serde::{Deserialize, Serialize};

/// Prefix applied by batch rename when the caller sends none.
pub const DEFAULT_RENAME_PREFIX: &str = "NewFile_";

const fn default_true() -> bool {
    true
}

fn default_prefix() -> String {
    DEFAULT_RENAME_PREFIX.to_string()
}

/// Body of `POST /api/download`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadBody {
    /// Links to forward.
    #[serde(default)]
    pub magnet_links: Vec<String>,
    /// Download server base address.
    #[serde(default)]
    pub server_addr: String,
}

impl DownloadBody {
    /// Validate into an acquisition request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty links or a blank server address.
    pub fn into_request(self) -> AcquireResult<AcquireRequest> {
        AcquireRequest::new(self.magnet_links, &self.server_addr)
    }
}

/// Query string or body of `/api/list_subfolders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubfoldersBody {
    /// Folder whose children are listed.
    #[serde(default)]
    pub root_folder: String,
}

impl ListSubfoldersBody {
    /// Validate into a typed request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank or relative root.
    pub fn to_request(&self) -> FsOpsResult<ListSubfoldersRequest> {
        ListSubfoldersRequest::new(&self.root_folder)
    }
}

/// Body of `POST /api/move_files`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveFilesBody {
    /// Folder searched for matching files.
    #[serde(default)]
    pub root_folder: String,
    /// Substring the file names must contain.
    #[serde(default)]
    pub keyword: String,
    /// Destination folder; relative values resolve against `root_folder`.
    #[serde(default)]
    pub target_folder: String,
    /// Create the destination when it is absent.
    #[serde(default = "default_true")]
    pub create_if_not_exists: bool,
    /// Search below the immediate children.
    #[serde(default)]
    pub recursive: bool,
    /// Report without applying.
    #[serde(default = "default_true")]
    pub preview: bool,
}

impl MoveFilesBody {
    /// Validate into a typed request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first invalid field.
    pub fn to_request(&self) -> FsOpsResult<MoveRequest> {
        MoveRequest::new(
            &self.root_folder,
            &self.keyword,
            &self.target_folder,
            MoveOptions {
                create_if_not_exists: self.create_if_not_exists,
                recursive: self.recursive,
                preview: self.preview,
            },
        )
    }
}

/// Body of `POST /api/rename_files`.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameFilesBody {
    /// Folder whose files are renamed.
    #[serde(default)]
    pub folder_path: String,
    /// Literal prefix of every new name.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Optional template using `{n}`, `{name}` and `{num}`.
    #[serde(default)]
    pub custom_pattern: String,
    /// Report without applying.
    #[serde(default = "default_true")]
    pub preview: bool,
}

impl RenameFilesBody {
    /// Validate into a typed request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad folder, prefix, or pattern.
    pub fn to_request(&self) -> FsOpsResult<RenameRequest> {
        RenameRequest::new(
            &self.folder_path,
            &self.prefix,
            &self.custom_pattern,
            self.preview,
        )
    }
}

/// Body of `POST /api/delete_empty_folders`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEmptyFoldersBody {
    /// Folder searched for matching directories.
    #[serde(default)]
    pub root_folder: String,
    /// Substring the directory names must contain.
    #[serde(default)]
    pub keyword: String,
    /// Search below the immediate children.
    #[serde(default)]
    pub recursive: bool,
    /// Report without applying.
    #[serde(default = "default_true")]
    pub preview: bool,
}

impl DeleteEmptyFoldersBody {
    /// Validate into a typed request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank or relative root or a blank keyword.
    pub fn to_request(&self) -> FsOpsResult<DeleteRequest> {
        DeleteRequest::new(
            &self.root_folder,
            &self.keyword,
            self.recursive,
            self.preview,
        )
    }
}

/// `{success:true, logs}` with counters for filesystem operations.
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable lines in execution order.
    pub logs: Vec<String>,
    /// Counters; absent for acquisition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,
}

impl LogsResponse {
    /// Successful response carrying log lines.
    #[must_use]
    pub const fn new(logs: Vec<String>, summary: Option<ReportSummary>) -> Self {
        Self {
            success: true,
            logs,
            summary,
        }
    }
}

/// `{success:true, subfolders}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubfoldersResponse {
    /// Always `true`.
    pub success: bool,
    /// Sorted subdirectory names.
    pub subfolders: Vec<String>,
}

/// `{success:false, error}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Operator-facing message.
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Build identifier.
    pub build_sha: String,
}
