//! Version handling for database distribution tarballs.
//!
//! - `sniff.rs` - Pull a `major.minor.rev` triple out of a file name
//! - `version.rs` - Strict triple parsing and the version-to-port mapping

pub use self::sniff::detect_version;
pub use self::version::{Version, VersionError, version_to_port};

mod sniff;
mod version;
