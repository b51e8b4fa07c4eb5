use std::path::PathBuf;

use dbsandbox_version::VersionError;

use crate::config::{
    ARCHIVE_SUFFIX, SANDBOX_BINARY_LABEL, SHELL_LABEL, TARGET_SERVER_LABEL, UNPACK_VERSION_LABEL,
    display_home,
};

/// Broad failure classes, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Conflict,
    Extraction,
    Merge,
    Rename,
}

#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
    #[error(
        "directory {} does not exist. You should create it or provide an alternate base directory using --{}",
        display_home(.0),
        SANDBOX_BINARY_LABEL
    )]
    MissingBaseDir(PathBuf),

    #[error("option --{} ('{target}') can only be used with --{}", TARGET_SERVER_LABEL, SHELL_LABEL)]
    InvalidFlagCombination { target: String },

    #[error(
        "no version was detected from tarball name '{filename}'. Flag --{} becomes mandatory",
        UNPACK_VERSION_LABEL
    )]
    MissingVersion { filename: String },

    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: VersionError,
    },

    #[error("tarball extension must be {}: '{filename}'", ARCHIVE_SUFFIX)]
    UnsupportedArchiveFormat { filename: String },

    #[error("'{name}' is not usable as an installation directory name")]
    InvalidDirectoryName { name: String },

    #[error("destination directory {} exists already", display_home(.0))]
    DestinationExists(PathBuf),

    #[error("error while unpacking tarball {}: {source}", display_home(.archive))]
    Extraction {
        archive: PathBuf,
        source: dbsandbox_archive::Error,
    },

    #[error(
        "error while merging shell tarball {} into {}: {source}",
        display_home(.archive),
        display_home(.destination)
    )]
    Merge {
        archive: PathBuf,
        destination: PathBuf,
        source: dbsandbox_archive::Error,
    },

    #[error(
        "error renaming directory {} to {}: {source}",
        display_home(.from),
        display_home(.to)
    )]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: dbsandbox_fs::Error,
    },
}

impl UnpackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingBaseDir(_)
            | Self::InvalidFlagCombination { .. }
            | Self::MissingVersion { .. }
            | Self::InvalidVersion { .. }
            | Self::UnsupportedArchiveFormat { .. }
            | Self::InvalidDirectoryName { .. } => ErrorKind::Usage,
            Self::DestinationExists(_) => ErrorKind::Conflict,
            Self::Extraction { .. } => ErrorKind::Extraction,
            Self::Merge { .. } => ErrorKind::Merge,
            Self::Rename { .. } => ErrorKind::Rename,
        }
    }

    /// Process exit status for this failure. Every kind is fatal with status 1.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage
            | ErrorKind::Conflict
            | ErrorKind::Extraction
            | ErrorKind::Merge
            | ErrorKind::Rename => 1,
        }
    }
}
