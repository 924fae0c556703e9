use std::ffi::OsString;
use std::fs::FileType;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a discovered entry, taken from `symlink_metadata` (links are never followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link, whatever it points at.
    Symlink,
    /// Sockets, fifos, devices.
    Other,
}

impl EntryKind {
    /// Classify a non-followed file type.
    #[must_use]
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// One entry discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path (root joined with the relative components).
    pub path: PathBuf,
    /// Base name.
    pub name: OsString,
    /// Entry kind.
    pub kind: EntryKind,
    /// Discovery depth; 1 is an immediate child of the root.
    pub depth: usize,
}

impl Entry {
    /// Lossy UTF-8 view of the base name for matching and log lines.
    #[must_use]
    pub fn display_name(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Whether the entry is a directory (symlinks to directories are not).
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A directory or entry the walker could not read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkIssue {
    /// Path that failed.
    pub path: PathBuf,
    /// Underlying error text.
    pub message: String,
}

/// Ordered result of a single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Root the walk started from.
    pub root: PathBuf,
    /// Whether the walk descended below depth 1.
    pub recursive: bool,
    /// Entries in traversal order.
    pub entries: Vec<Entry>,
    /// Read failures encountered along the way.
    pub issues: Vec<WalkIssue>,
}

impl Snapshot {
    /// Whether the walker failed to read `path` itself.
    #[must_use]
    pub fn is_unreadable(&self, path: &Path) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    /// Whether the walker failed on some child of `path`.
    #[must_use]
    pub fn has_unreadable_child(&self, path: &Path) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.path.parent() == Some(path))
    }
}

/// Delete-time emptiness of a matching directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emptiness {
    /// Nothing remains once matching empty children are removed.
    Empty,
    /// Holds a file, link, non-matching directory or non-empty child.
    NotEmpty,
    /// Contents could not be listed.
    Unreadable,
}

/// An entry paired with the outcome of the active predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Entry under consideration.
    pub entry: Entry,
    /// Whether the keyword matched the base name.
    pub matched: bool,
    /// Emptiness for matching directories considered by delete.
    pub emptiness: Option<Emptiness>,
}
