//! Apply or preview a plan, one log line per action.
//!
//! Actions run sequentially in plan order. A failing action is logged and the
//! batch continues; nothing is rolled back.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use reshelf_telemetry::Metrics;
use tracing::debug;

use crate::model::{
    Action, ActionOutcome, ExecutionReport, OperationKind, Plan, ReportSummary, SkipReason,
};

/// Runs plans and records per-action metrics.
#[derive(Clone)]
pub struct Executor {
    metrics: Metrics,
}

impl Executor {
    /// Create an executor reporting into `metrics`.
    #[must_use]
    pub const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    /// Execute `plan`, or describe it without mutation when `preview` is set.
    #[must_use]
    pub fn execute(&self, plan: &Plan, preview: bool) -> ExecutionReport {
        let mut logs = Vec::with_capacity(plan.issues.len() + plan.actions.len() + 1);
        let mut outcomes = Vec::with_capacity(plan.actions.len());
        let mut summary = ReportSummary {
            matched: plan.matched,
            preview,
            ..ReportSummary::default()
        };

        for issue in &plan.issues {
            logs.push(format!(
                "[WARN] unable to read {}: {}",
                issue.path.display(),
                issue.message
            ));
        }

        for action in &plan.actions {
            let (line, outcome) = if preview {
                preview_action(action)
            } else {
                apply_action(action)
            };
            tally(&mut summary, action, &outcome);
            self.metrics
                .inc_fsops_action(action.kind_label(), outcome.as_str());
            debug!(
                kind = action.kind_label(),
                outcome = outcome.as_str(),
                line = %line,
                "fsops action processed"
            );
            logs.push(line);
            outcomes.push(outcome);
        }

        logs.push(summary_line(plan.operation, &summary));
        ExecutionReport {
            operation: plan.operation,
            logs,
            outcomes,
            summary,
        }
    }
}

fn preview_action(action: &Action) -> (String, ActionOutcome) {
    let line = match action {
        Action::CreateDir { path } => format!("[PREVIEW] would create folder {}", path.display()),
        Action::Move { source, dest } => format!(
            "[PREVIEW] would move {} -> {}",
            source.display(),
            dest.display()
        ),
        Action::Rename { source, dest } => format!(
            "[PREVIEW] would rename {} -> {}",
            base_name(source),
            base_name(dest)
        ),
        Action::Delete { path } => format!("[PREVIEW] would delete {}", path.display()),
        Action::Skip { path, dest, reason } => {
            return (skip_line(path, dest.as_deref(), *reason), ActionOutcome::Skipped);
        }
    };
    (line, ActionOutcome::Previewed)
}

fn apply_action(action: &Action) -> (String, ActionOutcome) {
    match action {
        Action::CreateDir { path } => match fs::create_dir_all(path) {
            Ok(()) => (format!("[CREATED] {}", path.display()), ActionOutcome::Applied),
            Err(err) => failed(format!("create folder {}", path.display()), &err),
        },
        Action::Move { source, dest } => {
            let subject = format!("{} -> {}", source.display(), dest.display());
            match relocate(source, dest) {
                Ok(()) => (format!("[MOVED] {subject}"), ActionOutcome::Applied),
                Err(err) => failed(format!("move {subject}"), &err),
            }
        }
        Action::Rename { source, dest } => {
            let subject = format!("{} -> {}", base_name(source), base_name(dest));
            match rename_in_place(source, dest) {
                Ok(()) => (format!("[RENAMED] {subject}"), ActionOutcome::Applied),
                Err(err) => failed(format!("rename {subject}"), &err),
            }
        }
        Action::Delete { path } => match remove_if_empty(path) {
            Ok(true) => (format!("[DELETED] {}", path.display()), ActionOutcome::Applied),
            Ok(false) => (
                format!("[SKIP] {}: no longer empty", path.display()),
                ActionOutcome::Skipped,
            ),
            Err(err) => failed(format!("delete {}", path.display()), &err),
        },
        Action::Skip { path, dest, reason } => {
            (skip_line(path, dest.as_deref(), *reason), ActionOutcome::Skipped)
        }
    }
}

fn failed(subject: String, err: &io::Error) -> (String, ActionOutcome) {
    (
        format!("[FAILED] {subject}: {err}"),
        ActionOutcome::Failed(err.to_string()),
    )
}

fn skip_line(path: &Path, dest: Option<&Path>, reason: SkipReason) -> String {
    match (reason, dest) {
        (SkipReason::Collision, Some(dest)) => format!(
            "[SKIP] {}: {} ({})",
            path.display(),
            reason.describe(),
            dest.display()
        ),
        _ => format!("[SKIP] {}: {}", path.display(), reason.describe()),
    }
}

fn summary_line(operation: OperationKind, summary: &ReportSummary) -> String {
    let (verb, past, count) = match operation {
        OperationKind::Move => ("move", "moved", summary.moved),
        OperationKind::Rename => ("rename", "renamed", summary.renamed),
        OperationKind::Delete => ("delete", "deleted", summary.deleted),
    };
    if summary.preview {
        format!(
            "[SUMMARY] (preview) matched {}, would {verb} {count}, skipped {}",
            summary.matched, summary.skipped
        )
    } else {
        format!(
            "[SUMMARY] matched {}, {past} {count}, skipped {}, failed {}",
            summary.matched, summary.skipped, summary.failed
        )
    }
}

fn tally(summary: &mut ReportSummary, action: &Action, outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Applied | ActionOutcome::Previewed => match action {
            Action::CreateDir { .. } => summary.created += 1,
            Action::Move { .. } => summary.moved += 1,
            Action::Rename { .. } => summary.renamed += 1,
            Action::Delete { .. } => summary.deleted += 1,
            Action::Skip { .. } => summary.skipped += 1,
        },
        ActionOutcome::Skipped => summary.skipped += 1,
        ActionOutcome::Failed(_) => summary.failed += 1,
    }
}

fn base_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), OsStr::to_string_lossy)
}

fn ensure_vacant(dest: &Path) -> io::Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

fn relocate(source: &Path, dest: &Path) -> io::Result<()> {
    ensure_vacant(dest)?;
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            if let Err(copy_err) = fs::copy(source, dest) {
                let _ = fs::remove_file(dest);
                return Err(copy_err);
            }
            fs::remove_file(source)
        }
        Err(err) => Err(err),
    }
}

fn rename_in_place(source: &Path, dest: &Path) -> io::Result<()> {
    ensure_vacant(dest)?;
    fs::rename(source, dest)
}

fn remove_if_empty(path: &Path) -> io::Result<bool> {
    if fs::read_dir(path)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(path)?;
    Ok(true)
}
