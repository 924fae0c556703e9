#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions, clippy::redundant_pub_crate)]

//! Batch filesystem maintenance: keyword moves, batch renames, empty-folder cleanup.
//!
//! Every operation runs walk, match, plan and execute in that order. Plans are
//! pure data, so a preview reports exactly what a real run would do on the same
//! tree.
//!
//! Layout: `walker.rs` (deterministic traversal), `matcher.rs` (keyword and
//! emptiness predicates), `rename.rs` (name derivation), `plan.rs` (pure plan
//! builders), `executor.rs` (apply or preview), `service.rs` (facade),
//! `model/` (requests, plans, reports).

pub mod error;
pub mod executor;
pub mod matcher;
pub mod model;
pub mod paths;
pub mod plan;
pub mod rename;
pub mod service;
mod validate;
pub mod walker;

pub use error::{FsOpsError, FsOpsResult};
pub use executor::Executor;
pub use model::{
    Action, ActionOutcome, DeleteRequest, ExecutionReport, FsRequest, FsResponse,
    ListSubfoldersRequest, MoveOptions, MoveRequest, OperationKind, Plan, RenameRequest,
    ReportSummary, SkipReason,
};
pub use rename::RenameRule;
pub use service::FsOpsService;
pub use walker::TreeWalker;
