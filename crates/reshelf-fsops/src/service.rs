//! Operation facade: validate, guard, walk, plan, execute.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reshelf_telemetry::Metrics;
use tracing::{debug, info, info_span, warn};

use crate::error::{FsOpsError, FsOpsResult};
use crate::executor::Executor;
use crate::matcher::{directory_candidates, file_candidates};
use crate::model::{
    DeleteRequest, ExecutionReport, FsRequest, FsResponse, ListSubfoldersRequest, MoveRequest,
    RenameRequest,
};
use crate::paths::AllowList;
use crate::plan::{TargetListing, plan_delete, plan_move, plan_rename};
use crate::walker::{TreeWalker, ensure_directory};

/// Batch filesystem maintenance over caller-supplied folders.
#[derive(Clone)]
pub struct FsOpsService {
    metrics: Metrics,
    executor: Executor,
    allow: AllowList,
    force_preview: bool,
}

impl FsOpsService {
    /// Construct an unrestricted service reporting into `metrics`.
    #[must_use]
    pub fn new(metrics: Metrics) -> Self {
        Self {
            executor: Executor::new(metrics.clone()),
            metrics,
            allow: AllowList::default(),
            force_preview: false,
        }
    }

    /// Restrict every root and target to the given folders. Empty keeps the service unrestricted.
    #[must_use]
    pub fn with_allow_paths(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.allow = AllowList::new(roots);
        self
    }

    /// Run every mutating request as a preview regardless of its own flag.
    #[must_use]
    pub const fn with_force_preview(mut self, force: bool) -> Self {
        self.force_preview = force;
        self
    }

    /// Dispatch a typed request.
    ///
    /// # Errors
    ///
    /// Propagates the error of the dispatched operation.
    pub fn run(&self, request: FsRequest) -> FsOpsResult<FsResponse> {
        debug!(operation = request.operation(), "dispatching fsops request");
        match request {
            FsRequest::ListSubfolders(request) => {
                self.list_subfolders(&request).map(FsResponse::Subfolders)
            }
            FsRequest::MoveByKeyword(request) => {
                self.move_by_keyword(&request).map(FsResponse::Report)
            }
            FsRequest::RenameBatch(request) => self.rename_batch(&request).map(FsResponse::Report),
            FsRequest::DeleteEmptyFolders(request) => {
                self.delete_empty_folders(&request).map(FsResponse::Report)
            }
        }
    }

    /// Names of the immediate subdirectories of the root, lexically sorted.
    ///
    /// # Errors
    ///
    /// Returns `PathNotAllowed`, `NotFound`, `NotADirectory`, or `Io` when the
    /// root cannot be listed.
    pub fn list_subfolders(&self, request: &ListSubfoldersRequest) -> FsOpsResult<Vec<String>> {
        let root = request.root.as_path();
        let _span = info_span!("fsops", operation = "list_subfolders", root = %root.display())
            .entered();
        let result = self.read_subfolders(root);
        match &result {
            Ok(names) => info!(count = names.len(), "listed subfolders"),
            Err(err) => warn!(error = %err, detail = %err.detail(), "list subfolders failed"),
        }
        self.record("list_subfolders", result.is_ok());
        result
    }

    /// Move files whose names contain the keyword into the target folder.
    ///
    /// # Errors
    ///
    /// Returns `PathNotAllowed`, `NotFound`, `NotADirectory`, or
    /// `TargetMissing` before any mutation; per-file failures are log lines.
    pub fn move_by_keyword(&self, request: &MoveRequest) -> FsOpsResult<ExecutionReport> {
        let preview = self.effective_preview(request.options.preview);
        let _span = info_span!(
            "fsops",
            operation = "move_by_keyword",
            root = %request.root.display(),
            target = %request.target.display(),
            preview
        )
        .entered();
        let result = self.plan_and_move(request, preview);
        self.finish("move_by_keyword", result)
    }

    /// Rename the regular files directly inside the folder.
    ///
    /// # Errors
    ///
    /// Returns `PathNotAllowed`, `NotFound`, or `NotADirectory` for the folder.
    pub fn rename_batch(&self, request: &RenameRequest) -> FsOpsResult<ExecutionReport> {
        let preview = self.effective_preview(request.preview);
        let _span = info_span!(
            "fsops",
            operation = "rename_batch",
            root = %request.folder.display(),
            preview
        )
        .entered();
        let result = self.allow.check(&request.folder).and_then(|()| {
            let snapshot = TreeWalker::new(&request.folder, false)?.snapshot();
            let plan = plan_rename(&snapshot, &request.rule);
            Ok(self.executor.execute(&plan, preview))
        });
        self.finish("rename_batch", result)
    }

    /// Remove empty directories whose names contain the keyword.
    ///
    /// # Errors
    ///
    /// Returns `PathNotAllowed`, `NotFound`, or `NotADirectory` for the root.
    pub fn delete_empty_folders(&self, request: &DeleteRequest) -> FsOpsResult<ExecutionReport> {
        let preview = self.effective_preview(request.preview);
        let _span = info_span!(
            "fsops",
            operation = "delete_empty_folders",
            root = %request.root.display(),
            recursive = request.recursive,
            preview
        )
        .entered();
        let result = self.allow.check(&request.root).and_then(|()| {
            let snapshot = TreeWalker::new(&request.root, request.recursive)?.snapshot();
            let candidates = directory_candidates(&snapshot, &request.keyword);
            let plan = plan_delete(&snapshot, &candidates);
            Ok(self.executor.execute(&plan, preview))
        });
        self.finish("delete_empty_folders", result)
    }

    fn plan_and_move(&self, request: &MoveRequest, preview: bool) -> FsOpsResult<ExecutionReport> {
        let root = request.root.as_path();
        let target = request.target.as_path();
        self.allow.check(root)?;
        self.allow.check(target)?;
        ensure_directory(root)?;
        let listing = inspect_target(target, request.options.create_if_not_exists)?;

        let pruned = if target.starts_with(root) && target != root {
            vec![target.to_path_buf()]
        } else {
            Vec::new()
        };
        let snapshot = TreeWalker::with_pruned(root, request.options.recursive, pruned)?.snapshot();
        let candidates = file_candidates(&snapshot, &request.keyword);
        let plan = plan_move(&snapshot, &candidates, target, &listing);
        Ok(self.executor.execute(&plan, preview))
    }

    fn read_subfolders(&self, root: &Path) -> FsOpsResult<Vec<String>> {
        self.allow.check(root)?;
        ensure_directory(root)?;
        let entries =
            fs::read_dir(root).map_err(|err| FsOpsError::io("list_subfolders.read_dir", root, err))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|err| FsOpsError::io("list_subfolders.read_dir", root, err))?;
            let is_dir = entry
                .file_type()
                .map_err(|err| FsOpsError::io("list_subfolders.file_type", entry.path(), err))?
                .is_dir();
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    const fn effective_preview(&self, requested: bool) -> bool {
        requested || self.force_preview
    }

    fn finish(
        &self,
        operation: &'static str,
        result: FsOpsResult<ExecutionReport>,
    ) -> FsOpsResult<ExecutionReport> {
        match &result {
            Ok(report) => {
                let summary = &report.summary;
                info!(
                    matched = summary.matched,
                    created = summary.created,
                    moved = summary.moved,
                    renamed = summary.renamed,
                    deleted = summary.deleted,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    preview = summary.preview,
                    "fsops operation completed"
                );
            }
            Err(err) => warn!(error = %err, detail = %err.detail(), "fsops operation rejected"),
        }
        self.record(operation, result.is_ok());
        result
    }

    fn record(&self, operation: &str, ok: bool) {
        self.metrics
            .inc_fsops_operation(operation, if ok { "ok" } else { "error" });
    }
}

fn inspect_target(target: &Path, create_if_missing: bool) -> FsOpsResult<TargetListing> {
    match fs::metadata(target) {
        Ok(metadata) if metadata.is_dir() => {
            let entries = fs::read_dir(target)
                .map_err(|err| FsOpsError::io("move.read_target", target, err))?;
            let mut listing = TargetListing {
                exists: true,
                ..TargetListing::default()
            };
            for entry in entries {
                let entry = entry.map_err(|err| FsOpsError::io("move.read_target", target, err))?;
                listing.names.insert(entry.file_name());
            }
            Ok(listing)
        }
        Ok(_) => Err(FsOpsError::NotADirectory {
            path: target.to_path_buf(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            if create_if_missing {
                Ok(TargetListing::default())
            } else {
                Err(FsOpsError::TargetMissing {
                    path: target.to_path_buf(),
                })
            }
        }
        Err(err) => Err(FsOpsError::io("move.inspect_target", target, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MoveOptions;
    use reshelf_test_support::TempTree;

    type TestResult = anyhow::Result<()>;

    fn service() -> anyhow::Result<(FsOpsService, Metrics)> {
        let metrics = Metrics::new()?;
        Ok((FsOpsService::new(metrics.clone()), metrics))
    }

    fn root_str(tree: &TempTree) -> String {
        tree.path().display().to_string()
    }

    #[test]
    fn list_subfolders_sorts_and_ignores_files() -> TestResult {
        let tree = TempTree::new()?;
        tree.dir("zeta")?;
        tree.dir("alpha")?;
        tree.file("notes.txt", "n")?;
        let (service, metrics) = service()?;
        let names = service.list_subfolders(&ListSubfoldersRequest::new(&root_str(&tree))?)?;
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(metrics.fsops_operation_count("list_subfolders", "ok"), 1);
        Ok(())
    }

    #[test]
    fn missing_target_without_create_is_rejected() -> TestResult {
        let tree = TempTree::new()?;
        tree.file("report.txt", "r")?;
        let (service, metrics) = service()?;
        let options = MoveOptions {
            create_if_not_exists: false,
            preview: false,
            ..MoveOptions::default()
        };
        let request = MoveRequest::new(&root_str(&tree), "report", "archive", options)?;
        let err = service
            .move_by_keyword(&request)
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected failure"))?;
        assert!(matches!(err, FsOpsError::TargetMissing { .. }));
        assert!(tree.exists("report.txt"));
        assert_eq!(metrics.fsops_operation_count("move_by_keyword", "error"), 1);
        Ok(())
    }

    #[test]
    fn target_that_is_a_file_is_rejected() -> TestResult {
        let tree = TempTree::new()?;
        tree.file("archive", "not a folder")?;
        let (service, _) = service()?;
        let request =
            MoveRequest::new(&root_str(&tree), "report", "archive", MoveOptions::default())?;
        assert!(matches!(
            service.move_by_keyword(&request),
            Err(FsOpsError::NotADirectory { .. })
        ));
        Ok(())
    }

    #[test]
    fn allow_list_guards_root_and_target() -> TestResult {
        let tree = TempTree::new()?;
        tree.dir("inside")?;
        tree.file("outside/report.txt", "r")?;
        let (service, _) = service()?;
        let service = service.with_allow_paths([tree.join("inside")]);

        let request = MoveRequest::new(
            &tree.join("outside").display().to_string(),
            "report",
            &tree.join("inside").display().to_string(),
            MoveOptions::default(),
        )?;
        assert!(matches!(
            service.move_by_keyword(&request),
            Err(FsOpsError::PathNotAllowed { .. })
        ));

        let request = ListSubfoldersRequest::new(&tree.join("inside/../outside").display().to_string())?;
        assert!(matches!(
            service.list_subfolders(&request),
            Err(FsOpsError::PathNotAllowed { .. })
        ));
        Ok(())
    }

    #[test]
    fn forced_preview_overrides_request_flag() -> TestResult {
        let tree = TempTree::new()?;
        tree.dir("old")?;
        let (service, _) = service()?;
        let service = service.with_force_preview(true);
        let request = DeleteRequest::new(&root_str(&tree), "old", false, false)?;
        let report = service.delete_empty_folders(&request)?;
        assert!(report.summary.preview);
        assert_eq!(report.summary.deleted, 1);
        assert!(tree.exists("old"));
        Ok(())
    }

    #[test]
    fn target_inside_root_is_not_walked() -> TestResult {
        let tree = TempTree::new()?;
        tree.file("report_1.txt", "1")?;
        tree.file("archive/report_0.txt", "0")?;
        let (service, _) = service()?;
        let options = MoveOptions {
            recursive: true,
            preview: false,
            ..MoveOptions::default()
        };
        let request = MoveRequest::new(&root_str(&tree), "report", "archive", options)?;
        let report = service.move_by_keyword(&request)?;
        assert_eq!(report.summary.matched, 1);
        assert_eq!(report.summary.moved, 1);
        assert_eq!(
            tree.names("archive")?,
            vec!["report_0.txt".to_string(), "report_1.txt".to_string()]
        );
        Ok(())
    }

    #[test]
    fn run_dispatches_by_variant() -> TestResult {
        let tree = TempTree::new()?;
        tree.dir("child")?;
        let (service, _) = service()?;
        let response = service.run(FsRequest::ListSubfolders(ListSubfoldersRequest::new(
            &root_str(&tree),
        )?))?;
        assert_eq!(response, FsResponse::Subfolders(vec!["child".to_string()]));
        Ok(())
    }
}
