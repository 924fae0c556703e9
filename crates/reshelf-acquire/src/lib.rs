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
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Forwarding of magnet links to an external download server.
//!
//! The default [`HttpAcquirer`] speaks the qBittorrent Web API add endpoint;
//! the submit path is configurable for compatible servers.

pub mod client;
pub mod error;
pub mod request;

pub use client::{Acquirer, HttpAcquirer};
pub use error::{AcquireError, AcquireResult};
pub use request::AcquireRequest;
