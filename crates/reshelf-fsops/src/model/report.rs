use serde::Serialize;

use super::plan::OperationKind;

/// Result of a single action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mutation performed.
    Applied,
    /// Preview only; nothing touched.
    Previewed,
    /// Planned or execution-time skip.
    Skipped,
    /// Mutation attempted and failed.
    Failed(String),
}

impl ActionOutcome {
    /// Metric label for `fsops_actions_total{outcome}`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Previewed => "previewed",
            Self::Skipped => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Counters reported alongside the log lines.
///
/// In preview mode `created`/`moved`/`renamed`/`deleted` count what would happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Candidates accepted by the predicate.
    pub matched: usize,
    /// Folders created.
    pub created: usize,
    /// Files moved.
    pub moved: usize,
    /// Files renamed.
    pub renamed: usize,
    /// Directories removed.
    pub deleted: usize,
    /// Actions skipped.
    pub skipped: usize,
    /// Actions that failed.
    pub failed: usize,
    /// Whether the run was a preview.
    pub preview: bool,
}

/// Everything an operation reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Operation executed.
    pub operation: OperationKind,
    /// Human-readable lines: walk warnings, one per action, then a summary.
    pub logs: Vec<String>,
    /// Outcomes in plan order.
    pub outcomes: Vec<ActionOutcome>,
    /// Counters.
    pub summary: ReportSummary,
}

impl ExecutionReport {
    /// Number of actions that changed (or would change) the filesystem.
    #[must_use]
    pub const fn changed(&self) -> usize {
        self.summary.created + self.summary.moved + self.summary.renamed + self.summary.deleted
    }
}
