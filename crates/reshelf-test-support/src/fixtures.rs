//! Temporary directory fixtures for filesystem suites.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A scratch directory tree removed when dropped.
#[derive(Debug)]
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    /// Create an empty scratch tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        Ok(Self { dir })
    }

    /// Absolute root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Resolve a relative path inside the tree.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file (creating parent directories) and return its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parents or the file cannot be written.
    pub fn file(&self, relative: impl AsRef<Path>, contents: &str) -> Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Create a directory (and parents) and return its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn dir(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(path)
    }

    /// Whether a relative path exists (without following a final symlink).
    #[must_use]
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        fs::symlink_metadata(self.join(relative)).is_ok()
    }

    /// Read a file inside the tree as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.join(relative);
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
    }

    /// Sorted entry names directly under a relative directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn names(&self, relative: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = self.join(relative);
        let mut names = Vec::new();
        for entry in
            fs::read_dir(&path).with_context(|| format!("failed to list {}", path.display()))?
        {
            let entry = entry.with_context(|| format!("failed to list {}", path.display()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_dir_helpers_build_nested_tree() -> Result<()> {
        let tree = TempTree::new()?;
        tree.file("a/b/c.txt", "hello")?;
        tree.dir("a/empty")?;

        assert!(tree.exists("a/b/c.txt"));
        assert_eq!(tree.read("a/b/c.txt")?, "hello");
        assert_eq!(tree.names("a")?, vec!["b".to_string(), "empty".to_string()]);
        assert!(!tree.exists("missing"));
        Ok(())
    }
}
