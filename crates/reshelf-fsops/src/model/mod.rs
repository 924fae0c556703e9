//! Domain models for the maintenance operations.
//!
//! # Design
//! - Everything here is created and dropped within one request.
//! - No IO handles; entries carry paths and the walker re-derives parents.

mod entry;
mod plan;
mod report;
mod request;

pub use entry::{Candidate, Emptiness, Entry, EntryKind, Snapshot, WalkIssue};
pub use plan::{Action, OperationKind, Plan, SkipReason};
pub use report::{ActionOutcome, ExecutionReport, ReportSummary};
pub use request::{
    DeleteRequest, FsRequest, FsResponse, ListSubfoldersRequest, MoveOptions, MoveRequest,
    RenameRequest,
};
