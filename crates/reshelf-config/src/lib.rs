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

//! Environment-backed configuration for the Reshelf server.
//!
//! Layout: `model.rs` (typed configuration), `loader.rs` (environment
//! lookup), `validate.rs` (parsing helpers), `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{AcquireSettings, LogFormatChoice, ServerConfig};
