//! Deterministic directory traversal.
//!
//! Within each directory, non-directories come first in lexical order, then
//! each subdirectory in lexical order followed immediately by its contents.
//! Symbolic links are reported, never followed.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, FilterEntry, WalkDir};

use crate::error::{FsOpsError, FsOpsResult};
use crate::model::{Entry, EntryKind, Snapshot, WalkIssue};

type PruneFilter = Box<dyn FnMut(&DirEntry) -> bool + Send>;

/// Lazy, non-restartable walk over a root directory.
pub struct TreeWalker {
    root: PathBuf,
    recursive: bool,
    inner: FilterEntry<walkdir::IntoIter, PruneFilter>,
}

impl TreeWalker {
    /// Walk `root`, descending below depth 1 only when `recursive`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `NotADirectory` for an unusable root.
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> FsOpsResult<Self> {
        Self::with_pruned(root, recursive, Vec::new())
    }

    /// Walk `root`, never yielding the `pruned` directories or anything below them.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `NotADirectory` for an unusable root.
    pub fn with_pruned(
        root: impl Into<PathBuf>,
        recursive: bool,
        pruned: Vec<PathBuf>,
    ) -> FsOpsResult<Self> {
        let root = root.into();
        ensure_directory(&root)?;

        let mut walk = WalkDir::new(&root)
            .follow_links(false)
            .min_depth(1)
            .sort_by(files_before_directories);
        if !recursive {
            walk = walk.max_depth(1);
        }
        let filter: PruneFilter = Box::new(move |entry: &DirEntry| {
            !pruned.iter().any(|path| entry.path() == path)
        });

        Ok(Self {
            root,
            recursive,
            inner: walk.into_iter().filter_entry(filter),
        })
    }

    /// Drain the walk into a snapshot.
    #[must_use]
    pub fn snapshot(self) -> Snapshot {
        let root = self.root.clone();
        let recursive = self.recursive;
        let mut entries = Vec::new();
        let mut issues = Vec::new();
        for item in self {
            match item {
                Ok(entry) => entries.push(entry),
                Err(issue) => issues.push(issue),
            }
        }
        Snapshot {
            root,
            recursive,
            entries,
            issues,
        }
    }
}

impl Iterator for TreeWalker {
    type Item = Result<Entry, WalkIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(match item {
            Ok(dir_entry) => Ok(Entry {
                path: dir_entry.path().to_path_buf(),
                name: dir_entry.file_name().to_os_string(),
                kind: EntryKind::from_file_type(dir_entry.file_type()),
                depth: dir_entry.depth(),
            }),
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| self.root.clone(), Path::to_path_buf);
                let message = err
                    .io_error()
                    .map_or_else(|| err.to_string(), ToString::to_string);
                warn!(error = %message, path = %path.display(), "failed to read directory entry");
                Err(WalkIssue { path, message })
            }
        })
    }
}

/// Require `path` to exist and be a directory (following a symlinked root).
///
/// # Errors
///
/// Returns `NotFound`, `NotADirectory`, or `Io` for other metadata failures.
pub fn ensure_directory(path: &Path) -> FsOpsResult<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(FsOpsError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(FsOpsError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(FsOpsError::io("walker.inspect_root", path, err)),
    }
}

fn files_before_directories(left: &DirEntry, right: &DirEntry) -> Ordering {
    left.file_type()
        .is_dir()
        .cmp(&right.file_type().is_dir())
        .then_with(|| left.file_name().cmp(right.file_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshelf_test_support::TempTree;

    type TestResult = anyhow::Result<()>;

    fn relative(snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .entries
            .iter()
            .map(|entry| {
                entry
                    .path
                    .strip_prefix(&snapshot.root)
                    .map_or_else(|_| entry.path.display().to_string(), |p| p.display().to_string())
            })
            .collect()
    }

    fn sample_tree() -> anyhow::Result<TempTree> {
        let tree = TempTree::new()?;
        tree.file("b.txt", "b")?;
        tree.file("a.txt", "a")?;
        tree.file("alpha/z.txt", "z")?;
        tree.file("alpha/inner/deep.txt", "d")?;
        tree.dir("beta")?;
        Ok(tree)
    }

    #[test]
    fn recursive_walk_is_files_first_depth_first() -> TestResult {
        let tree = sample_tree()?;
        let snapshot = TreeWalker::new(tree.path(), true)?.snapshot();
        assert_eq!(
            relative(&snapshot),
            vec![
                "a.txt",
                "b.txt",
                "alpha",
                "alpha/z.txt",
                "alpha/inner",
                "alpha/inner/deep.txt",
                "beta",
            ]
        );
        assert!(snapshot.issues.is_empty());
        assert_eq!(snapshot.entries[4].depth, 2);
        Ok(())
    }

    #[test]
    fn non_recursive_walk_stays_at_depth_one() -> TestResult {
        let tree = sample_tree()?;
        let snapshot = TreeWalker::new(tree.path(), false)?.snapshot();
        assert_eq!(relative(&snapshot), vec!["a.txt", "b.txt", "alpha", "beta"]);
        assert!(snapshot.entries.iter().all(|entry| entry.depth == 1));
        Ok(())
    }

    #[test]
    fn pruned_directory_and_subtree_are_skipped() -> TestResult {
        let tree = sample_tree()?;
        let pruned = vec![tree.join("alpha")];
        let snapshot = TreeWalker::with_pruned(tree.path(), true, pruned)?.snapshot();
        assert_eq!(relative(&snapshot), vec!["a.txt", "b.txt", "beta"]);
        Ok(())
    }

    #[test]
    fn invalid_roots_are_rejected() -> TestResult {
        let tree = sample_tree()?;
        assert!(matches!(
            TreeWalker::new(tree.join("missing"), false),
            Err(FsOpsError::NotFound { .. })
        ));
        assert!(matches!(
            TreeWalker::new(tree.join("a.txt"), false),
            Err(FsOpsError::NotADirectory { .. })
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_reported_not_followed() -> TestResult {
        let tree = sample_tree()?;
        std::os::unix::fs::symlink(tree.join("alpha"), tree.join("link"))?;
        let snapshot = TreeWalker::new(tree.path(), true)?.snapshot();
        let link = snapshot
            .entries
            .iter()
            .find(|entry| entry.name == "link")
            .ok_or_else(|| anyhow::anyhow!("link not yielded"))?;
        assert_eq!(link.kind, EntryKind::Symlink);
        assert!(!relative(&snapshot).iter().any(|path| path.starts_with("link/")));
        Ok(())
    }
}
