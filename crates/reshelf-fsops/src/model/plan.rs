use std::path::PathBuf;

use serde::Serialize;

use super::entry::WalkIssue;

/// Maintenance operation a plan was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Keyword-driven relocation.
    Move,
    /// Batch rename inside one folder.
    Rename,
    /// Empty-directory pruning.
    Delete,
}

impl OperationKind {
    /// Metric and log label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Rename => "rename",
            Self::Delete => "delete",
        }
    }
}

/// Why a candidate produced no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Destination exists or is claimed by an earlier action.
    Collision,
    /// Derived name equals the current name.
    Unchanged,
    /// Directory still holds something.
    NotEmpty,
    /// Directory contents could not be read.
    Unreadable,
    /// `{num}` template but the name carries no digits.
    NoNumber,
    /// Base name is not valid UTF-8 and cannot be templated.
    InvalidName,
    /// Derived name is `.` or `..`.
    ReservedName,
}

impl SkipReason {
    /// Metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collision => "collision",
            Self::Unchanged => "unchanged",
            Self::NotEmpty => "not_empty",
            Self::Unreadable => "unreadable",
            Self::NoNumber => "no_number",
            Self::InvalidName => "invalid_name",
            Self::ReservedName => "reserved_name",
        }
    }

    /// Text used in `[SKIP]` lines.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Collision => "destination exists",
            Self::Unchanged => "name unchanged",
            Self::NotEmpty => "not empty",
            Self::Unreadable => "unreadable",
            Self::NoNumber => "no number found",
            Self::InvalidName => "name is not valid UTF-8",
            Self::ReservedName => "derived name is reserved",
        }
    }
}

/// One intended step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create the move target folder.
    CreateDir {
        /// Folder to create.
        path: PathBuf,
    },
    /// Relocate a file into the target folder.
    Move {
        /// Existing file.
        source: PathBuf,
        /// Destination path, absent at plan time.
        dest: PathBuf,
    },
    /// Rename a file within its folder.
    Rename {
        /// Existing file.
        source: PathBuf,
        /// Destination path, absent at plan time.
        dest: PathBuf,
    },
    /// Remove an empty directory.
    Delete {
        /// Directory to remove.
        path: PathBuf,
    },
    /// Candidate left untouched.
    Skip {
        /// Candidate path.
        path: PathBuf,
        /// Destination that would have been used, when there was one.
        dest: Option<PathBuf>,
        /// Reason for skipping.
        reason: SkipReason,
    },
}

impl Action {
    /// Metric label for `fsops_actions_total{kind}`.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::CreateDir { .. } => "create_dir",
            Self::Move { .. } => "move",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
            Self::Skip { .. } => "skip",
        }
    }
}

/// Ordered list of intended actions derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Operation the plan belongs to.
    pub operation: OperationKind,
    /// Number of candidates the predicate accepted.
    pub matched: usize,
    /// Actions in execution order.
    pub actions: Vec<Action>,
    /// Walk failures carried through to the report.
    pub issues: Vec<WalkIssue>,
}
