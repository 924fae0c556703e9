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

//! HTTP surface of the Reshelf server.
//!
//! Layout: `http/router.rs` (routes and middleware), `http/handlers/`
//! (endpoint handlers), `http/errors.rs` (status mapping), `models.rs` (JSON
//! bodies), `state.rs` (shared handler state), `error.rs` (server failures).

pub mod error;
pub mod http;
pub mod models;
pub mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use state::ApiState;
