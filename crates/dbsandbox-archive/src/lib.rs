//! Tarball extraction with path sanitization, and shell tarball merging.
//!
//! # Architecture
//!
//! - `detect.rs` - Gzip magic check
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract.rs` - Streaming `.tar.gz` extraction
//! - `merge.rs` - Merging a shell tarball into an unpacked server tree
//! - `options.rs` / `report.rs` - Shared types

pub use error::{Error, PathList, Result};
pub use extract::{extract_archive, extract_from_reader};
pub use merge::merge_shell;
pub use options::{ExtractOptions, InvalidVerbosity, Progress, Verbosity};
pub use report::ArchiveReport;
pub use sanitize::{SanitizedPath, sanitize_path, sanitize_symlink_target};

mod detect;
mod error;
mod extract;
mod merge;
pub mod options;
mod report;
mod sanitize;
