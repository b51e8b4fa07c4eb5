//! Unpack database distribution tarballs into a sandbox binary directory.
//!
//! - `unpack/` - Request model, resolvers, conflict guard and the coordinator
//! - `cli/` - The `dbsandbox` command line
//! - `config.rs` - Flag labels, defaults and environment lookups
//! - `error.rs` - [`UnpackError`] and its exit code mapping
//! - `logging.rs` - Tracing subscriber setup

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod unpack;

pub use error::{ErrorKind, UnpackError};
