//! Route handlers.

/// `POST /api/download`.
pub mod acquire;
/// Folder listing and the mutating filesystem operations.
pub mod fsops;
